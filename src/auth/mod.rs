mod router;
pub mod session;

pub use router::{auth_router, query_param, CurrentUser};
pub use session::{AuthError, IssuedSession, RegisterRequest, SessionStore, SessionUser};
