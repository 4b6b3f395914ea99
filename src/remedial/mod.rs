pub mod domain;
pub mod export;
pub mod filter;

pub use domain::{
    ActionComment, ActionPriority, ActionStatus, Attachment, RemedialAction, RemedialCatalog,
    StatusChange,
};
pub use filter::{ActionFilter, ActionSort, SortDirection, SortKey};
