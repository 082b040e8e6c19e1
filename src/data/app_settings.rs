use crate::data::persistence::{Format, Persistable};
use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppSettings {
    /// Sent as `agencyId` on every create request.
    pub agency_id: String,
    /// Earliest date either calendar lets the user pick.
    #[serde(default = "default_cutoff")]
    pub cutoff_date: NaiveDate,
    /// When true, edits and deletes are sent to the agency API as well as
    /// applied to the local cache.
    #[serde(default)]
    pub sync_edits: bool,
}

fn default_cutoff() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            agency_id: "default-agency".to_string(),
            cutoff_date: default_cutoff(),
            sync_edits: false,
        }
    }
}

/// Wrapper that reads the `settings` key from config.yaml.
#[derive(Serialize, Deserialize, Default, Debug)]
struct SettingsWrapper {
    #[serde(default)]
    settings: AppSettings,
}

impl Persistable for SettingsWrapper {
    fn filename() -> &'static str {
        "config.yaml"
    }
    fn format() -> Format {
        Format::Yaml
    }
}

impl AppSettings {
    pub fn load() -> Result<Self> {
        Ok(SettingsWrapper::load()?.settings)
    }

    pub fn load_from(dir: &Path) -> Result<Self> {
        Ok(SettingsWrapper::load_from(dir)?.settings)
    }

    pub fn save_to(&self, dir: &Path) -> Result<()> {
        SettingsWrapper {
            settings: self.clone(),
        }
        .save_to(dir)
    }
}
