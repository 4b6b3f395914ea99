//! Explicit session state for the REST surface.
//!
//! Accounts and live tokens sit behind one injectable store instead of
//! ambient globals: routers receive an `Arc<SessionStore>` and every
//! authenticated request resolves its bearer token here. Tokens are opaque
//! handles minted from a seeded hash, not self-describing JWTs; losing the
//! store invalidates every session, which is the intended lifecycle for a
//! process-local deployment.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Deserialize;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone)]
struct Account {
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    role: String,
    salt: String,
    password_digest: String,
}

/// Identity attached to an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub username: String,
    pub email: String,
    pub role: String,
}

/// Result of a successful login or registration.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub user: SessionUser,
}

/// Name fields stored alongside the credentials, exposed for the profile
/// endpoints.
#[derive(Debug, Clone)]
pub struct AccountNames {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Username already exists")]
    DuplicateUsername,
    #[error("Email already exists")]
    DuplicateEmail,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Password must contain at least one uppercase letter and one special character")]
    WeakPassword,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Invalid current password")]
    WrongPassword,
}

pub struct SessionStore {
    seed: String,
    nonce: u128,
    counter: AtomicU64,
    accounts: Mutex<HashMap<String, Account>>,
    tokens: Mutex<HashMap<String, String>>,
}

impl SessionStore {
    pub fn new(seed: &str) -> Self {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();

        Self {
            seed: seed.to_string(),
            nonce,
            counter: AtomicU64::new(1),
            accounts: Mutex::new(HashMap::new()),
            tokens: Mutex::new(HashMap::new()),
        }
    }

    /// Create an account and immediately open a session for it.
    pub fn register(&self, request: RegisterRequest) -> Result<IssuedSession, AuthError> {
        let username = request.user_name.trim().to_string();
        if username.is_empty() {
            return Err(AuthError::MissingField("userName"));
        }
        if !valid_email(&request.email) {
            return Err(AuthError::InvalidEmail);
        }
        if !strong_password(&request.password) {
            return Err(AuthError::WeakPassword);
        }

        let mut accounts = self.accounts.lock().expect("account mutex poisoned");
        if accounts.contains_key(&username) {
            return Err(AuthError::DuplicateUsername);
        }
        if accounts
            .values()
            .any(|account| account.email.eq_ignore_ascii_case(&request.email))
        {
            return Err(AuthError::DuplicateEmail);
        }

        let salt = self.mint(&username, "salt");
        let account = Account {
            username: username.clone(),
            email: request.email.trim().to_string(),
            first_name: request.first_name,
            last_name: request.last_name,
            role: "USER".to_string(),
            password_digest: digest(&salt, &request.password),
            salt,
        };
        let user = SessionUser {
            username: account.username.clone(),
            email: account.email.clone(),
            role: account.role.clone(),
        };
        accounts.insert(username.clone(), account);
        drop(accounts);

        Ok(self.open_session(user))
    }

    pub fn login(&self, username: &str, password: &str) -> Result<IssuedSession, AuthError> {
        let accounts = self.accounts.lock().expect("account mutex poisoned");
        let account = accounts
            .get(username.trim())
            .ok_or(AuthError::InvalidCredentials)?;
        if digest(&account.salt, password) != account.password_digest {
            return Err(AuthError::InvalidCredentials);
        }
        let user = SessionUser {
            username: account.username.clone(),
            email: account.email.clone(),
            role: account.role.clone(),
        };
        drop(accounts);

        Ok(self.open_session(user))
    }

    /// Resolve a bearer token to its session identity.
    pub fn resolve(&self, token: &str) -> Option<SessionUser> {
        let tokens = self.tokens.lock().expect("token mutex poisoned");
        let username = tokens.get(token)?.clone();
        drop(tokens);

        let accounts = self.accounts.lock().expect("account mutex poisoned");
        accounts.get(&username).map(|account| SessionUser {
            username: account.username.clone(),
            email: account.email.clone(),
            role: account.role.clone(),
        })
    }

    /// Drop a live session. Resolving the token afterwards fails.
    pub fn revoke(&self, token: &str) {
        let mut tokens = self.tokens.lock().expect("token mutex poisoned");
        tokens.remove(token);
    }

    pub fn names(&self, username: &str) -> Option<AccountNames> {
        let accounts = self.accounts.lock().expect("account mutex poisoned");
        accounts.get(username).map(|account| AccountNames {
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
        })
    }

    pub fn update_names(&self, username: &str, first_name: &str, last_name: &str) {
        let mut accounts = self.accounts.lock().expect("account mutex poisoned");
        if let Some(account) = accounts.get_mut(username) {
            account.first_name = first_name.to_string();
            account.last_name = last_name.to_string();
        }
    }

    pub fn change_password(
        &self,
        username: &str,
        current: &str,
        replacement: &str,
    ) -> Result<(), AuthError> {
        if !strong_password(replacement) {
            return Err(AuthError::WeakPassword);
        }

        let mut accounts = self.accounts.lock().expect("account mutex poisoned");
        let account = accounts
            .get_mut(username)
            .ok_or(AuthError::InvalidCredentials)?;
        if digest(&account.salt, current) != account.password_digest {
            return Err(AuthError::WrongPassword);
        }
        account.password_digest = digest(&account.salt, replacement);
        Ok(())
    }

    fn open_session(&self, user: SessionUser) -> IssuedSession {
        let token = self.mint(&user.username, "token");
        let mut tokens = self.tokens.lock().expect("token mutex poisoned");
        tokens.insert(token.clone(), user.username.clone());
        drop(tokens);

        IssuedSession { token, user }
    }

    fn mint(&self, username: &str, purpose: &str) -> String {
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed);
        let mut hasher = Sha256::new();
        hasher.update(self.seed.as_bytes());
        hasher.update(self.nonce.to_le_bytes());
        hasher.update(purpose.as_bytes());
        hasher.update(username.as_bytes());
        hasher.update(sequence.to_le_bytes());
        hex(&hasher.finalize())
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex(&hasher.finalize())
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

fn valid_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

fn strong_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| !c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            user_name: username.to_string(),
            password: "Tajne!Haslo1".to_string(),
            first_name: "Jan".to_string(),
            last_name: "Kowalski".to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn register_then_login_round_trips() {
        let store = SessionStore::new("test-seed");
        let issued = store
            .register(request("jkowalski", "jan@example.com"))
            .expect("registration succeeds");
        assert_eq!(issued.user.role, "USER");

        let session = store
            .login("jkowalski", "Tajne!Haslo1")
            .expect("login succeeds");
        assert_eq!(store.resolve(&session.token), Some(session.user.clone()));
        assert_ne!(issued.token, session.token);
    }

    #[test]
    fn duplicate_username_and_email_are_rejected() {
        let store = SessionStore::new("test-seed");
        store
            .register(request("jkowalski", "jan@example.com"))
            .expect("first registration succeeds");

        assert!(matches!(
            store.register(request("jkowalski", "inny@example.com")),
            Err(AuthError::DuplicateUsername)
        ));
        assert!(matches!(
            store.register(request("anowak", "JAN@example.com")),
            Err(AuthError::DuplicateEmail)
        ));
    }

    #[test]
    fn weak_passwords_and_bad_emails_are_rejected() {
        let store = SessionStore::new("test-seed");

        let mut weak = request("anowak", "anna@example.com");
        weak.password = "krotkie".to_string();
        assert!(matches!(store.register(weak), Err(AuthError::WeakPassword)));

        assert!(matches!(
            store.register(request("anowak", "anna-example.com")),
            Err(AuthError::InvalidEmail)
        ));
    }

    #[test]
    fn revoked_tokens_stop_resolving() {
        let store = SessionStore::new("test-seed");
        let issued = store
            .register(request("jkowalski", "jan@example.com"))
            .expect("registration succeeds");

        store.revoke(&issued.token);
        assert_eq!(store.resolve(&issued.token), None);
        assert_eq!(store.resolve("nie-taki-token"), None);
    }

    #[test]
    fn password_change_requires_the_current_password() {
        let store = SessionStore::new("test-seed");
        store
            .register(request("jkowalski", "jan@example.com"))
            .expect("registration succeeds");

        assert!(matches!(
            store.change_password("jkowalski", "zle-haslo", "Nowe!Haslo2"),
            Err(AuthError::WrongPassword)
        ));

        store
            .change_password("jkowalski", "Tajne!Haslo1", "Nowe!Haslo2")
            .expect("password change succeeds");
        assert!(store.login("jkowalski", "Tajne!Haslo1").is_err());
        assert!(store.login("jkowalski", "Nowe!Haslo2").is_ok());
    }
}
