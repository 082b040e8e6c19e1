use crate::data::leave_type::LeaveType;
use crate::data::owner::OwnerDirectory;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Form controls, in on-screen order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    UserId,
    LeaveType,
    StartDate,
    EndDate,
    Notes,
    PayRate,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormField::UserId => "userId",
            FormField::LeaveType => "leaveType",
            FormField::StartDate => "startDate",
            FormField::EndDate => "endDate",
            FormField::Notes => "notes",
            FormField::PayRate => "payRate",
        };
        f.write_str(name)
    }
}

/// In-progress form state. `pay_rate` holds the raw text typed by the user.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LeaveDraft {
    pub user_id: String,
    pub leave_type: Option<LeaveType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub notes: String,
    pub pay_rate: String,
}

/// A draft that passed every rule.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidLeave {
    pub user_id: String,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: Option<String>,
    pub pay_rate: Option<f64>,
}

/// Per-field messages, rendered next to the control they belong to.
#[derive(Clone, Debug, Default, PartialEq, Error)]
#[error("{}", summary(.0))]
pub struct ValidationErrors(BTreeMap<FormField, String>);

fn summary(errors: &BTreeMap<FormField, String>) -> String {
    errors
        .iter()
        .map(|(field, msg)| format!("{}: {}", field, msg))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn add(&mut self, field: FormField, message: &str) {
        self.0.entry(field).or_insert_with(|| message.to_string());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn clear(&mut self, field: FormField) {
        self.0.remove(&field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.0.keys().copied()
    }
}

impl LeaveDraft {
    /// Checks every rule and collects all violations.
    pub fn validate(&self, owners: &impl OwnerDirectory) -> Result<ValidLeave, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let user_id = self.user_id.trim();
        if user_id.is_empty() {
            errors.add(FormField::UserId, "Please select a staff member or client");
        } else if !owners.contains(user_id) {
            errors.add(FormField::UserId, "Unknown staff member or client");
        }

        if self.leave_type.is_none() {
            errors.add(FormField::LeaveType, "Leave type is required");
        }
        if self.start_date.is_none() {
            errors.add(FormField::StartDate, "Start date is required");
        }
        if self.end_date.is_none() {
            errors.add(FormField::EndDate, "End date is required");
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                errors.add(FormField::EndDate, "End date cannot be before start date");
            }
        }

        let pay_rate = match parse_pay_rate(&self.pay_rate) {
            Ok(rate) => rate,
            Err(msg) => {
                errors.add(FormField::PayRate, msg);
                None
            }
        };

        match (self.leave_type, self.start_date, self.end_date) {
            (Some(leave_type), Some(start_date), Some(end_date)) if errors.is_empty() => {
                let notes = self.notes.trim();
                Ok(ValidLeave {
                    user_id: user_id.to_string(),
                    leave_type,
                    start_date,
                    end_date,
                    notes: (!notes.is_empty()).then(|| notes.to_string()),
                    pay_rate,
                })
            }
            _ => Err(errors),
        }
    }
}

fn parse_pay_rate(raw: &str) -> Result<Option<f64>, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let value: f64 = raw.parse().map_err(|_| "Pay rate must be a number")?;
    if !value.is_finite() {
        return Err("Pay rate must be a number");
    }
    if value < 0.0 {
        return Err("Pay rate cannot be negative");
    }
    Ok(Some(value))
}
