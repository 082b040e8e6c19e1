use crate::data::{LeaveEventData, OwnerData, OwnerDirectory, Persistable};
use anyhow::Result;

pub fn run() -> Result<()> {
    let leave_data = LeaveEventData::load()?;
    let owners = OwnerData::load()?;
    write_leaves(&leave_data, &owners, &mut std::io::stdout())
}

pub(crate) fn write_leaves<W: std::io::Write>(
    data: &LeaveEventData,
    owners: &OwnerData,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "Leave events")?;
    writeln!(out, "---")?;
    writeln!(
        out,
        "  {:<4} {:<42} {:<20} {:<20} {:<12} {:<12} {}",
        "#", "Id", "Owner", "Type", "Start", "End", "Days"
    )?;
    let events = data.sorted();
    for (i, ev) in events.iter().enumerate() {
        let owner = owners.display_name(&ev.user_id).unwrap_or(&ev.user_id);
        let days = (ev.end_date() - ev.start_date()).num_days() + 1;
        writeln!(
            out,
            "  {:<4} {:<42} {:<20} {:<20} {:<12} {:<12} {}",
            i + 1,
            ev.id,
            owner,
            ev.title,
            ev.start_date().format("%Y-%m-%d"),
            ev.end_date().format("%Y-%m-%d"),
            days
        )?;
        if let Some(notes) = &ev.notes {
            writeln!(out, "       {}", notes)?;
        }
    }
    writeln!(out, "---")?;
    writeln!(out, "Total: {} leave event(s)", events.len())?;
    Ok(())
}
