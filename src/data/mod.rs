pub mod app_settings;
pub mod ledger;
pub mod leave_event;
pub mod leave_type;
pub mod owner;
pub mod persistence;

pub use app_settings::AppSettings;
pub use ledger::LedgerApi;
pub use leave_event::{LeaveCache, LeaveEvent, LeaveEventData};
pub use leave_type::LeaveType;
pub use owner::{Owner, OwnerData, OwnerDirectory};
pub use persistence::Persistable;
