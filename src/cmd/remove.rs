use crate::cmd::{orchestrator_for, ConsoleNotifier};
use crate::data::{AppSettings, LeaveCache, LeaveEventData, Persistable};
use crate::leave::SubmitOutcome;
use anyhow::{bail, Result};
use std::io::Write;
use std::path::Path;

pub fn run(id: &str) -> Result<()> {
    let dir = crate::data::persistence::get_data_dir()?;
    let outcome = run_in_dir(&dir, id, std::io::stdout(), std::io::stderr())?;
    if !outcome.closes_dialog() {
        bail!("leave event {} was not deleted", id);
    }
    Ok(())
}

pub(crate) fn run_in_dir<O: Write, E: Write>(
    dir: &Path,
    id: &str,
    out: O,
    err: E,
) -> Result<SubmitOutcome> {
    let settings = AppSettings::load_from(dir)?;
    let mut leave_data = LeaveEventData::load_from(dir)?;
    let mut notifier = ConsoleNotifier { out, err };

    let Some(existing) = leave_data.get(id).cloned() else {
        writeln!(notifier.err, "Error: no leave event with id {}", id)?;
        return Ok(SubmitOutcome::Failed);
    };
    let orchestrator = orchestrator_for(&settings, dir);
    let outcome = orchestrator.delete(&existing, &mut leave_data, &mut notifier);
    if outcome.closes_dialog() {
        leave_data.save_to(dir)?;
    }
    Ok(outcome)
}
