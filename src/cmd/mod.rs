pub mod add;
pub mod init;
pub mod leaves;
pub mod ledger;
pub mod owners;
pub mod remove;
pub mod root;

use crate::data::{AppSettings, LedgerApi};
use crate::leave::{LeaveOrchestrator, Notifier};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Orchestrator wired to the ledger in `dir`.
pub(crate) fn orchestrator_for(settings: &AppSettings, dir: &Path) -> LeaveOrchestrator {
    LeaveOrchestrator::new(
        Arc::new(LedgerApi::new(dir)),
        &settings.agency_id,
        settings.sync_edits,
    )
}

/// Prints successes to `out` and errors to `err`.
pub(crate) struct ConsoleNotifier<O: Write, E: Write> {
    pub out: O,
    pub err: E,
}

impl<O: Write, E: Write> Notifier for ConsoleNotifier<O, E> {
    fn success(&mut self, message: &str) {
        let _ = writeln!(self.out, "{}", message);
    }

    fn error(&mut self, message: &str) {
        let _ = writeln!(self.err, "Error: {}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_notifier_splits_streams() {
        let mut n = ConsoleNotifier {
            out: Vec::new(),
            err: Vec::new(),
        };
        n.success("Leave event created successfully");
        n.error("Failed to create leave event");
        assert_eq!(
            String::from_utf8(n.out).unwrap(),
            "Leave event created successfully\n"
        );
        assert_eq!(
            String::from_utf8(n.err).unwrap(),
            "Error: Failed to create leave event\n"
        );
    }
}
