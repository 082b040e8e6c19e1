pub mod api;
pub mod orchestrator;
pub mod picker;
pub mod validation;

pub use orchestrator::{DialogMode, LeaveOrchestrator, Notifier, SubmitOutcome};
pub use validation::LeaveDraft;
