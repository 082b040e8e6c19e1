use crate::data::ledger::LedgerEntry;
use crate::data::LedgerApi;
use anyhow::Result;

pub fn run() -> Result<()> {
    let dir = crate::data::persistence::get_data_dir()?;
    write_ledger(&LedgerApi::new(&dir), &mut std::io::stdout())
}

/// Lists every request sent to the agency journal, oldest first.
pub(crate) fn write_ledger<W: std::io::Write>(ledger: &LedgerApi, out: &mut W) -> Result<()> {
    let entries = ledger.entries()?;
    writeln!(out, "Agency ledger ({})", ledger.path().display())?;
    writeln!(out, "---")?;
    writeln!(
        out,
        "  {:<4} {:<20} {:<8} {:<42} {}",
        "#", "At", "Op", "Id", "Detail"
    )?;
    for (i, entry) in entries.iter().enumerate() {
        let (op, id, at, detail) = match entry {
            LedgerEntry::Create { id, at, request } => ("create", id, at, describe(request)),
            LedgerEntry::Update { id, at, request } => ("update", id, at, describe(request)),
            LedgerEntry::Delete { id, at } => ("delete", id, at, String::new()),
        };
        writeln!(
            out,
            "  {:<4} {:<20} {:<8} {:<42} {}",
            i + 1,
            at.format("%Y-%m-%d %H:%M:%S"),
            op,
            id,
            detail
        )?;
    }
    writeln!(out, "---")?;
    writeln!(out, "Total: {} entr(ies)", entries.len())?;
    Ok(())
}

fn describe(request: &crate::leave::api::CreateLeaveRequest) -> String {
    format!(
        "{} {} {}..{}",
        request.user_id,
        request.event_type,
        request.start_date.get(..10).unwrap_or(&request.start_date),
        request.end_date.get(..10).unwrap_or(&request.end_date)
    )
}
