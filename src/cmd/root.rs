use crate::cmd::orchestrator_for;
use crate::data::{persistence::get_data_dir, AppSettings, LeaveEventData, OwnerData, Persistable};
use crate::ui::app::{run_app, App};
use crate::ui::{restore_terminal, setup_terminal};
use anyhow::Result;
use chrono::Local;
use tracing::info;

pub fn run() -> Result<()> {
    let dir = get_data_dir()?;
    let settings = AppSettings::load()?;
    let owners = OwnerData::load()?;
    let mut leave_data = LeaveEventData::load()?;
    let orchestrator = orchestrator_for(&settings, &dir);

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::event::DisableMouseCapture
        );
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    info!(
        events = leave_data.events.len(),
        owners = owners.owners.len(),
        "dashboard started"
    );

    let today = Local::now().date_naive();
    let mut app = App::new(&mut leave_data, &owners, settings, orchestrator, today);

    let result = run_app(&mut terminal, &mut app);

    restore_terminal(&mut terminal)?;

    // A request still in flight settles into the cache before saving.
    app.finish_pending();
    drop(app);

    leave_data.save()?;
    info!("dashboard closed");

    result
}
