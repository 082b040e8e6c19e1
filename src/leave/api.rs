use crate::data::leave_type::LeaveType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Timestamp layout used for `startDate` / `endDate` on the wire.
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Body sent to the agency API when booking leave.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeaveRequest {
    pub user_id: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub pay_rate: f64,
    pub event_type: LeaveType,
    pub color: String,
    pub agency_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CreatedLeave {
    pub id: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("ledger I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode request: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Persistence collaborator for leave events.
pub trait LeaveApi: Send + Sync {
    fn create_leave_event(&self, request: &CreateLeaveRequest) -> Result<CreatedLeave, ApiError>;
    fn update_leave_event(&self, id: &str, request: &CreateLeaveRequest) -> Result<(), ApiError>;
    fn delete_leave_event(&self, id: &str) -> Result<(), ApiError>;
}
