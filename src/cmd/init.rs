use crate::data::{AppSettings, LeaveEventData, Owner, OwnerData, Persistable};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn run() -> Result<()> {
    let dir = crate::data::persistence::get_data_dir()?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create data directory {}", dir.display()))?;
    run_in_dir(&dir)?;
    println!("Data files initialized successfully.");
    Ok(())
}

/// Writes all default data files into `dir`. Exposed for unit testing.
pub(crate) fn run_in_dir(dir: &Path) -> Result<()> {
    AppSettings::default().save_to(dir)?;
    sample_owners().save_to(dir)?;
    LeaveEventData::default().save_to(dir)?;
    Ok(())
}

fn sample_owners() -> OwnerData {
    let mut data = OwnerData::default();
    data.add(Owner::new("cw-001", "Amara Okafor"));
    data.add(Owner::new("cw-002", "Tomasz Nowak"));
    data.add(Owner::new("cw-003", "Priya Raman"));
    data.add(Owner::new("cl-100", "Edith Marsh"));
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::OwnerDirectory;
    use tempfile::TempDir;

    #[test]
    fn test_run_in_dir_creates_all_files() {
        let tmp = TempDir::new().unwrap();
        run_in_dir(tmp.path()).unwrap();
        assert!(tmp.path().join("config.yaml").exists(), "config.yaml missing");
        assert!(tmp.path().join("owners.yaml").exists(), "owners.yaml missing");
        assert!(
            tmp.path().join("leave_events.json").exists(),
            "leave_events.json missing"
        );
    }

    #[test]
    fn test_leave_events_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        run_in_dir(tmp.path()).unwrap();
        let data = LeaveEventData::load_from(tmp.path()).unwrap();
        assert!(data.events.is_empty(), "leave events should be empty on init");
    }

    #[test]
    fn test_config_yaml_has_settings_section() {
        let tmp = TempDir::new().unwrap();
        run_in_dir(tmp.path()).unwrap();
        let content = fs::read_to_string(tmp.path().join("config.yaml")).unwrap();
        assert!(content.contains("settings"), "config.yaml missing 'settings' key");
        assert!(content.contains("agency_id"), "config.yaml missing 'agency_id'");
        let settings = AppSettings::load_from(tmp.path()).unwrap();
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn test_owners_file_has_sample_people() {
        let tmp = TempDir::new().unwrap();
        run_in_dir(tmp.path()).unwrap();
        let owners = OwnerData::load_from(tmp.path()).unwrap();
        assert_eq!(owners.owners.len(), 4);
        assert_eq!(owners.display_name("cl-100"), Some("Edith Marsh"));
    }
}
