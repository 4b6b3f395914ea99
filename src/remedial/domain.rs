//! Remedial actions: tracked follow-up tasks loosely linked to assessment
//! findings. Status history, comments, and attachments are append-only; the
//! exposed operations never edit or remove an entry once recorded.

use std::sync::Mutex;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionPriority {
    High,
    Medium,
    Low,
}

impl ActionPriority {
    /// Fixed sort rank: High before Medium before Low.
    pub const fn rank(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "Wysoki",
            Self::Medium => "Średni",
            Self::Low => "Niski",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionStatus {
    New,
    InProgress,
    Done,
}

impl ActionStatus {
    /// Fixed sort rank: New before InProgress before Done.
    pub const fn rank(self) -> u8 {
        match self {
            Self::New => 1,
            Self::InProgress => 2,
            Self::Done => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "Nowe",
            Self::InProgress => "W trakcie",
            Self::Done => "Zakończone",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: u64,
    pub name: String,
    pub kind: String,
    pub uploaded_at: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub status: ActionStatus,
    pub date: NaiveDate,
    pub actor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionComment {
    pub id: u64,
    pub text: String,
    pub date: NaiveDate,
    pub actor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemedialAction {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub priority: ActionPriority,
    pub status: ActionStatus,
    pub due_date: NaiveDate,
    pub assigned_to: String,
    pub area: String,
    pub risk_level: String,
    pub gdpr_articles: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub status_history: Vec<StatusChange>,
    #[serde(default)]
    pub comments: Vec<ActionComment>,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
}

impl RemedialAction {
    /// Move the action to a new status, appending to the history log.
    pub fn change_status(&mut self, status: ActionStatus, date: NaiveDate, actor: &str) {
        self.status = status;
        self.updated_at = date;
        self.status_history.push(StatusChange {
            status,
            date,
            actor: actor.to_string(),
        });
    }

    pub fn add_comment(&mut self, text: &str, date: NaiveDate, actor: &str) {
        let id = self.comments.last().map_or(1, |comment| comment.id + 1);
        self.comments.push(ActionComment {
            id,
            text: text.to_string(),
            date,
            actor: actor.to_string(),
        });
        self.updated_at = date;
    }

    pub fn add_attachment(&mut self, name: &str, kind: &str, date: NaiveDate) {
        let id = self.attachments.last().map_or(1, |attachment| attachment.id + 1);
        self.attachments.push(Attachment {
            id,
            name: name.to_string(),
            kind: kind.to_string(),
            uploaded_at: date,
        });
        self.updated_at = date;
    }
}

/// Process-local action list shared by the report endpoints.
pub struct RemedialCatalog {
    actions: Mutex<Vec<RemedialAction>>,
}

impl RemedialCatalog {
    pub fn seeded() -> Self {
        Self {
            actions: Mutex::new(seed_actions()),
        }
    }

    pub fn actions(&self) -> Vec<RemedialAction> {
        self.actions.lock().expect("catalog mutex poisoned").clone()
    }

    pub fn change_status(
        &self,
        id: u64,
        status: ActionStatus,
        date: NaiveDate,
        actor: &str,
    ) -> bool {
        let mut guard = self.actions.lock().expect("catalog mutex poisoned");
        match guard.iter_mut().find(|action| action.id == id) {
            Some(action) => {
                action.change_status(status, date, actor);
                true
            }
            None => false,
        }
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid seed date")
}

/// Starter catalog shown until a real finding pipeline feeds the list.
pub fn seed_actions() -> Vec<RemedialAction> {
    vec![
        RemedialAction {
            id: 1,
            title: "Aktualizacja polityki prywatności".to_string(),
            description: "Aktualizacja polityki prywatności zgodnie z wymogami RODO, w szczególności w zakresie informacji o prawach podmiotów danych.".to_string(),
            priority: ActionPriority::High,
            status: ActionStatus::InProgress,
            due_date: date(2025, 5, 15),
            assigned_to: "Jan Kowalski".to_string(),
            area: "Prawa podmiotów".to_string(),
            risk_level: "Wysoki".to_string(),
            gdpr_articles: vec!["12".to_string(), "13".to_string(), "14".to_string()],
            attachments: vec![Attachment {
                id: 1,
                name: "polityka_prywatnosci_draft.docx".to_string(),
                kind: "document".to_string(),
                uploaded_at: date(2025, 4, 5),
            }],
            status_history: vec![
                StatusChange {
                    status: ActionStatus::New,
                    date: date(2025, 4, 1),
                    actor: "System".to_string(),
                },
                StatusChange {
                    status: ActionStatus::InProgress,
                    date: date(2025, 4, 10),
                    actor: "Jan Kowalski".to_string(),
                },
            ],
            comments: vec![ActionComment {
                id: 1,
                text: "Rozpoczęto prace nad aktualizacją polityki".to_string(),
                date: date(2025, 4, 10),
                actor: "Jan Kowalski".to_string(),
            }],
            created_at: date(2025, 4, 1),
            updated_at: date(2025, 4, 10),
        },
        RemedialAction {
            id: 2,
            title: "Wdrożenie mechanizmu zgód marketingowych".to_string(),
            description: "Implementacja mechanizmu zbierania i zarządzania zgodami na działania marketingowe zgodnie z wymogami RODO.".to_string(),
            priority: ActionPriority::Medium,
            status: ActionStatus::New,
            due_date: date(2025, 6, 1),
            assigned_to: "Anna Nowak".to_string(),
            area: "Zgody i podstawy prawne".to_string(),
            risk_level: "Średni".to_string(),
            gdpr_articles: vec!["6".to_string(), "7".to_string()],
            attachments: Vec::new(),
            status_history: vec![StatusChange {
                status: ActionStatus::New,
                date: date(2025, 4, 5),
                actor: "System".to_string(),
            }],
            comments: Vec::new(),
            created_at: date(2025, 4, 5),
            updated_at: date(2025, 4, 5),
        },
        RemedialAction {
            id: 3,
            title: "Audyt bezpieczeństwa systemów IT".to_string(),
            description: "Przeprowadzenie kompleksowego audytu bezpieczeństwa systemów IT przetwarzających dane osobowe.".to_string(),
            priority: ActionPriority::High,
            status: ActionStatus::Done,
            due_date: date(2025, 4, 30),
            assigned_to: "Piotr Wiśniewski".to_string(),
            area: "Bezpieczeństwo danych".to_string(),
            risk_level: "Wysoki".to_string(),
            gdpr_articles: vec!["32".to_string()],
            attachments: vec![Attachment {
                id: 1,
                name: "raport_audytu_it.pdf".to_string(),
                kind: "document".to_string(),
                uploaded_at: date(2025, 4, 12),
            }],
            status_history: vec![
                StatusChange {
                    status: ActionStatus::New,
                    date: date(2025, 3, 15),
                    actor: "System".to_string(),
                },
                StatusChange {
                    status: ActionStatus::InProgress,
                    date: date(2025, 3, 20),
                    actor: "Piotr Wiśniewski".to_string(),
                },
                StatusChange {
                    status: ActionStatus::Done,
                    date: date(2025, 4, 12),
                    actor: "Piotr Wiśniewski".to_string(),
                },
            ],
            comments: vec![
                ActionComment {
                    id: 1,
                    text: "Rozpoczęto audyt systemów".to_string(),
                    date: date(2025, 3, 20),
                    actor: "Piotr Wiśniewski".to_string(),
                },
                ActionComment {
                    id: 2,
                    text: "Audyt zakończony, raport załączony".to_string(),
                    date: date(2025, 4, 12),
                    actor: "Piotr Wiśniewski".to_string(),
                },
            ],
            created_at: date(2025, 3, 15),
            updated_at: date(2025, 4, 12),
        },
    ]
}
