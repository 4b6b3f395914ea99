mod router;
mod service;
pub mod views;

pub use router::{reports_router, ReportsState};
pub use service::{ReportExportError, ReportService};
