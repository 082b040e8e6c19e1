use crate::cmd::{orchestrator_for, ConsoleNotifier};
use crate::data::{AppSettings, LeaveEventData, OwnerData, Persistable};
use crate::leave::{DialogMode, LeaveDraft, SubmitOutcome};
use anyhow::{bail, Result};
use std::io::Write;
use std::path::Path;

pub fn run(draft: LeaveDraft) -> Result<()> {
    let dir = crate::data::persistence::get_data_dir()?;
    let outcome = run_in_dir(&dir, &draft, std::io::stdout(), std::io::stderr())?;
    if !outcome.closes_dialog() {
        bail!("leave event was not created");
    }
    Ok(())
}

/// Books `draft` as new leave against the data files in `dir`.
pub(crate) fn run_in_dir<O: Write, E: Write>(
    dir: &Path,
    draft: &LeaveDraft,
    out: O,
    err: E,
) -> Result<SubmitOutcome> {
    let settings = AppSettings::load_from(dir)?;
    let owners = OwnerData::load_from(dir)?;
    let mut leave_data = LeaveEventData::load_from(dir)?;
    let orchestrator = orchestrator_for(&settings, dir);
    let mut notifier = ConsoleNotifier { out, err };

    let outcome = orchestrator.submit(
        &DialogMode::New,
        draft,
        &owners,
        &mut leave_data,
        &mut notifier,
    );
    match &outcome {
        SubmitOutcome::Created { id } => {
            leave_data.save_to(dir)?;
            writeln!(notifier.out, "  id: {}", id)?;
        }
        SubmitOutcome::Invalid(errors) => {
            writeln!(notifier.err, "{} field(s) need attention:", errors.len())?;
            for field in errors.fields() {
                writeln!(
                    notifier.err,
                    "  {}: {}",
                    field,
                    errors.get(field).unwrap_or_default()
                )?;
            }
        }
        _ => {}
    }
    Ok(outcome)
}
