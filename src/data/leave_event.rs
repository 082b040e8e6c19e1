use crate::data::leave_type::LeaveType;
use crate::data::persistence::{Format, Persistable};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One absence record as held by the shared cache.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaveEvent {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Mirror of `start` for single-date views.
    pub date: NaiveDateTime,
    pub leave_type: LeaveType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_rate: Option<f64>,
    pub color: String,
}

impl LeaveEvent {
    /// Builds a record with title, color and `date` derived from the inputs.
    pub fn new(
        id: &str,
        user_id: &str,
        leave_type: LeaveType,
        start: NaiveDate,
        end: NaiveDate,
        notes: Option<String>,
        pay_rate: Option<f64>,
    ) -> Self {
        let start = start.and_time(chrono::NaiveTime::MIN);
        let end = end.and_time(chrono::NaiveTime::MIN);
        LeaveEvent {
            id: id.to_string(),
            title: leave_type.label(),
            start,
            end,
            date: start,
            leave_type,
            notes,
            user_id: user_id.to_string(),
            pay_rate,
            color: leave_type.color().to_string(),
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start_date() <= day && day <= self.end_date()
    }

    /// Same record under a different id; used when the server assigns one.
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }
}

/// The process-wide store of known leave events. Each call is applied
/// immediately and is visible to every reader.
pub trait LeaveCache {
    fn get(&self, id: &str) -> Option<&LeaveEvent>;
    fn append(&mut self, record: LeaveEvent);
    /// Returns false when no record has that id.
    fn replace(&mut self, id: &str, record: LeaveEvent) -> bool;
    /// Returns false when no record has that id.
    fn remove(&mut self, id: &str) -> bool;
}

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct LeaveEventData {
    pub events: Vec<LeaveEvent>,
}

impl Persistable for LeaveEventData {
    fn filename() -> &'static str {
        "leave_events.json"
    }
    fn format() -> Format {
        Format::Json
    }
}

impl LeaveCache for LeaveEventData {
    fn get(&self, id: &str) -> Option<&LeaveEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    fn append(&mut self, record: LeaveEvent) {
        self.events.push(record);
    }

    fn replace(&mut self, id: &str, record: LeaveEvent) -> bool {
        match self.events.iter_mut().find(|e| e.id == id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    fn remove(&mut self, id: &str) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        self.events.len() != before
    }
}

impl LeaveEventData {
    /// Events ordered by start date, for list views.
    pub fn sorted(&self) -> Vec<&LeaveEvent> {
        let mut out: Vec<&LeaveEvent> = self.events.iter().collect();
        out.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
        out
    }

    /// Days in `from..=to` keyed to the events covering them. Only the window
    /// is expanded, however long an event runs.
    pub fn day_map(&self, from: NaiveDate, to: NaiveDate) -> HashMap<NaiveDate, Vec<&LeaveEvent>> {
        let mut map: HashMap<NaiveDate, Vec<&LeaveEvent>> = HashMap::new();
        for ev in &self.events {
            let mut current = ev.start_date().max(from);
            let last = ev.end_date().min(to);
            while current <= last {
                map.entry(current).or_default().push(ev);
                match current.succ_opt() {
                    Some(next) => current = next,
                    None => break,
                }
            }
        }
        map
    }
}
