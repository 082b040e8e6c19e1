use crate::data::leave_event::{LeaveCache, LeaveEvent};
use crate::data::owner::OwnerDirectory;
use crate::leave::api::{ApiError, CreateLeaveRequest, LeaveApi, ISO_FORMAT};
use crate::leave::validation::{LeaveDraft, ValidLeave, ValidationErrors};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// User-facing notification sink.
pub trait Notifier {
    fn success(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// Whether the dialog is booking new leave or editing an existing record.
#[derive(Clone, Debug, PartialEq)]
pub enum DialogMode {
    New,
    Edit(LeaveEvent),
}

/// The effect a submission will have, decided before any outbound call.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitPlan {
    Create {
        request: CreateLeaveRequest,
        record: LeaveEvent,
    },
    Update {
        request: CreateLeaveRequest,
        record: LeaveEvent,
    },
    Delete {
        id: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    Created { id: String },
    Updated { id: String },
    Deleted { id: String },
    Invalid(ValidationErrors),
    Failed,
}

impl SubmitOutcome {
    pub fn closes_dialog(&self) -> bool {
        matches!(
            self,
            SubmitOutcome::Created { .. } | SubmitOutcome::Updated { .. } | SubmitOutcome::Deleted { .. }
        )
    }
}

/// Result of the outbound step: the server id for creates, `None` otherwise.
pub type DispatchResult = Result<Option<String>, ApiError>;

/// Turns validated drafts into create/update/delete effects against the
/// agency API and the shared cache.
#[derive(Clone)]
pub struct LeaveOrchestrator {
    api: Arc<dyn LeaveApi>,
    agency_id: String,
    sync_edits: bool,
}

impl LeaveOrchestrator {
    pub fn new(api: Arc<dyn LeaveApi>, agency_id: &str, sync_edits: bool) -> Self {
        LeaveOrchestrator {
            api,
            agency_id: agency_id.to_string(),
            sync_edits,
        }
    }

    /// Validates the draft and decides between create and update.
    pub fn prepare_save(
        &self,
        mode: &DialogMode,
        draft: &LeaveDraft,
        owners: &impl OwnerDirectory,
    ) -> Result<SubmitPlan, ValidationErrors> {
        let valid = draft.validate(owners)?;
        let request = self.build_request(&valid);
        Ok(match mode {
            DialogMode::New => {
                let temp_id = format!("tmp-{}", uuid::Uuid::new_v4());
                SubmitPlan::Create {
                    request,
                    record: record_from(&temp_id, valid),
                }
            }
            DialogMode::Edit(existing) => SubmitPlan::Update {
                request,
                record: record_from(&existing.id, valid),
            },
        })
    }

    pub fn prepare_delete(&self, existing: &LeaveEvent) -> SubmitPlan {
        SubmitPlan::Delete {
            id: existing.id.clone(),
        }
    }

    /// Whether `plan` needs the agency API at all.
    pub fn is_remote(&self, plan: &SubmitPlan) -> bool {
        matches!(plan, SubmitPlan::Create { .. }) || self.sync_edits
    }

    /// Performs the outbound call for `plan`. Safe to run off the UI thread
    /// on a clone of the orchestrator.
    pub fn dispatch(&self, plan: &SubmitPlan) -> DispatchResult {
        match plan {
            SubmitPlan::Create { request, .. } => {
                self.api.create_leave_event(request).map(|c| Some(c.id))
            }
            SubmitPlan::Update { request, record } if self.sync_edits => self
                .api
                .update_leave_event(&record.id, request)
                .map(|_| None),
            SubmitPlan::Delete { id } if self.sync_edits => {
                self.api.delete_leave_event(id).map(|_| None)
            }
            SubmitPlan::Update { .. } | SubmitPlan::Delete { .. } => Ok(None),
        }
    }

    /// Applies a dispatch result to the cache and reports it.
    pub fn settle(
        &self,
        plan: SubmitPlan,
        result: DispatchResult,
        cache: &mut impl LeaveCache,
        notifier: &mut impl Notifier,
    ) -> SubmitOutcome {
        match (plan, result) {
            (SubmitPlan::Create { record, .. }, Ok(server_id)) => {
                let id = server_id.unwrap_or_else(|| record.id.clone());
                cache.append(record.with_id(&id));
                info!(%id, "leave event added to cache");
                notifier.success("Leave event created successfully");
                SubmitOutcome::Created { id }
            }
            (SubmitPlan::Update { record, .. }, Ok(_)) => {
                let id = record.id.clone();
                if cache.replace(&id, record) {
                    info!(%id, "leave event updated in cache");
                    notifier.success("Leave event updated successfully");
                    SubmitOutcome::Updated { id }
                } else {
                    warn!(%id, "update target no longer cached");
                    notifier.error("Leave event no longer exists");
                    SubmitOutcome::Failed
                }
            }
            (SubmitPlan::Delete { id }, Ok(_)) => {
                if cache.remove(&id) {
                    info!(%id, "leave event removed from cache");
                    notifier.success("Leave event deleted successfully");
                    SubmitOutcome::Deleted { id }
                } else {
                    warn!(%id, "delete target no longer cached");
                    notifier.error("Leave event no longer exists");
                    SubmitOutcome::Failed
                }
            }
            (plan, Err(e)) => {
                let action = match plan {
                    SubmitPlan::Create { .. } => "create",
                    SubmitPlan::Update { .. } => "update",
                    SubmitPlan::Delete { .. } => "delete",
                };
                error!(error = %e, action, "leave event request failed");
                notifier.error(&format!("Failed to {} leave event", action));
                SubmitOutcome::Failed
            }
        }
    }

    /// Validate, dispatch and settle in one go.
    pub fn submit(
        &self,
        mode: &DialogMode,
        draft: &LeaveDraft,
        owners: &impl OwnerDirectory,
        cache: &mut impl LeaveCache,
        notifier: &mut impl Notifier,
    ) -> SubmitOutcome {
        let plan = match self.prepare_save(mode, draft, owners) {
            Ok(plan) => plan,
            Err(errors) => {
                debug!(%errors, "draft rejected");
                return SubmitOutcome::Invalid(errors);
            }
        };
        let result = self.dispatch(&plan);
        self.settle(plan, result, cache, notifier)
    }

    pub fn delete(
        &self,
        existing: &LeaveEvent,
        cache: &mut impl LeaveCache,
        notifier: &mut impl Notifier,
    ) -> SubmitOutcome {
        let plan = self.prepare_delete(existing);
        let result = self.dispatch(&plan);
        self.settle(plan, result, cache, notifier)
    }

    fn build_request(&self, valid: &ValidLeave) -> CreateLeaveRequest {
        CreateLeaveRequest {
            user_id: valid.user_id.clone(),
            start_date: iso(valid.start_date),
            end_date: iso(valid.end_date),
            notes: valid.notes.clone(),
            pay_rate: valid.pay_rate.unwrap_or(0.0),
            event_type: valid.leave_type,
            color: valid.leave_type.color().to_string(),
            agency_id: self.agency_id.clone(),
        }
    }
}

fn iso(date: chrono::NaiveDate) -> String {
    date.and_time(chrono::NaiveTime::MIN).format(ISO_FORMAT).to_string()
}

fn record_from(id: &str, valid: ValidLeave) -> LeaveEvent {
    LeaveEvent::new(
        id,
        &valid.user_id,
        valid.leave_type,
        valid.start_date,
        valid.end_date,
        valid.notes,
        valid.pay_rate,
    )
}
