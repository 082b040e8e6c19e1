use crate::calc::calendar_grid::{
    add_months, build_month_grid, first_of_month, month_name, DayCell, GridRequest, WEEKDAY_HEADER,
};
use crate::data::{AppSettings, LeaveEvent, LeaveEventData, LeaveType, OwnerData, OwnerDirectory};
use crate::leave::api::ApiError;
use crate::leave::orchestrator::{DispatchResult, LeaveOrchestrator, Notifier, SubmitOutcome, SubmitPlan};
use crate::ui::hex_color;
use crate::ui::leave_dialog::{DialogAction, LeaveDialog};
use crate::ui::Tui;
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration as StdDuration;
use tracing::{debug, info};

/// Last notification, shown under the leave table until the next keypress.
#[derive(Default, Debug)]
pub struct StatusLine {
    pub message: Option<(String, Color)>,
}

impl Notifier for StatusLine {
    fn success(&mut self, message: &str) {
        self.message = Some((message.to_string(), Color::Green));
    }

    fn error(&mut self, message: &str) {
        self.message = Some((message.to_string(), Color::Red));
    }
}

/// An outbound call running on a worker thread.
struct PendingSubmit {
    plan: SubmitPlan,
    /// Generation of the dialog that issued the call.
    generation: u64,
    rx: Receiver<DispatchResult>,
}

pub struct App<'a> {
    leave_data: &'a mut LeaveEventData,
    owners: &'a OwnerData,
    settings: AppSettings,
    orchestrator: LeaveOrchestrator,
    today: NaiveDate,
    view_month: NaiveDate,
    list_cursor: usize,
    dialog: Option<LeaveDialog>,
    dialog_generation: u64,
    pending: Option<PendingSubmit>,
    status: StatusLine,
}

impl<'a> App<'a> {
    pub fn new(
        leave_data: &'a mut LeaveEventData,
        owners: &'a OwnerData,
        settings: AppSettings,
        orchestrator: LeaveOrchestrator,
        today: NaiveDate,
    ) -> Self {
        App {
            leave_data,
            owners,
            settings,
            orchestrator,
            today,
            view_month: first_of_month(today),
            list_cursor: 0,
            dialog: None,
            dialog_generation: 0,
            pending: None,
            status: StatusLine::default(),
        }
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Returns true when the app should exit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        self.status.message = None;

        if let Some(dialog) = self.dialog.as_mut() {
            let action = dialog.handle_key(code, modifiers, self.owners);
            self.apply(action);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                if self.list_cursor > 0 {
                    self.list_cursor -= 1;
                    self.follow_selection();
                }
            }
            KeyCode::Down => {
                if self.list_cursor + 1 < self.leave_data.events.len() {
                    self.list_cursor += 1;
                    self.follow_selection();
                }
            }
            KeyCode::Char('n') => self.open_new(),
            KeyCode::Enter | KeyCode::Char('e') => self.open_edit(),
            KeyCode::Char('[') | KeyCode::Left => {
                self.view_month = add_months(self.view_month, -1);
            }
            KeyCode::Char(']') | KeyCode::Right => {
                self.view_month = add_months(self.view_month, 1);
            }
            KeyCode::Char('t') => self.view_month = first_of_month(self.today),
            _ => {}
        }
        false
    }

    pub fn handle_pointer_down(&mut self, column: u16, row: u16) {
        if let Some(dialog) = self.dialog.as_mut() {
            let action = dialog.handle_pointer_down(column, row);
            self.apply(action);
        }
    }

    fn apply(&mut self, action: DialogAction) {
        match action {
            DialogAction::None => {}
            DialogAction::Submit => self.submit_dialog(),
            DialogAction::Delete => self.delete_dialog(),
            DialogAction::Close => self.close_dialog(),
        }
    }

    fn open_new(&mut self) {
        self.dialog_generation += 1;
        self.dialog = Some(LeaveDialog::new_leave(
            self.today,
            self.settings.cutoff_date,
            self.dialog_generation,
        ));
    }

    fn open_edit(&mut self) {
        let Some(event) = self.selected_event().cloned() else {
            return;
        };
        self.dialog_generation += 1;
        self.dialog = Some(LeaveDialog::edit(
            event,
            self.today,
            self.settings.cutoff_date,
            self.dialog_generation,
        ));
    }

    fn close_dialog(&mut self) {
        if let Some(mut dialog) = self.dialog.take() {
            dialog.picker.reset();
        }
    }

    fn selected_event(&self) -> Option<&LeaveEvent> {
        self.leave_data.sorted().get(self.list_cursor).copied()
    }

    fn follow_selection(&mut self) {
        if let Some(start) = self.selected_event().map(|e| e.start_date()) {
            self.view_month = first_of_month(start);
        }
    }

    // ── Submission ────────────────────────────────────────────────────────────

    fn submit_dialog(&mut self) {
        if self.pending.is_some() {
            self.status.error("Another request is still in progress");
            return;
        }
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        if dialog.submitting {
            return;
        }
        match self
            .orchestrator
            .prepare_save(&dialog.mode, &dialog.draft, self.owners)
        {
            Ok(plan) => {
                dialog.errors = Default::default();
                let generation = dialog.generation;
                self.start(plan, generation);
            }
            Err(errors) => {
                debug!(%errors, "dialog draft rejected");
                dialog.errors = errors;
            }
        }
    }

    fn delete_dialog(&mut self) {
        if self.pending.is_some() {
            self.status.error("Another request is still in progress");
            return;
        }
        let Some(dialog) = self.dialog.as_ref() else {
            return;
        };
        let Some(existing) = dialog.editing().filter(|_| !dialog.submitting) else {
            return;
        };
        let plan = self.orchestrator.prepare_delete(existing);
        let generation = dialog.generation;
        self.start(plan, generation);
    }

    /// Local plans settle at once; remote ones run on a worker thread and
    /// settle from `poll_pending`.
    fn start(&mut self, plan: SubmitPlan, generation: u64) {
        if !self.orchestrator.is_remote(&plan) {
            let result = self.orchestrator.dispatch(&plan);
            self.finish(plan, result, generation);
            return;
        }
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.submitting = true;
        }
        let (tx, rx) = mpsc::channel();
        let orchestrator = self.orchestrator.clone();
        let outbound = plan.clone();
        thread::spawn(move || {
            let _ = tx.send(orchestrator.dispatch(&outbound));
        });
        info!(generation, "leave request dispatched");
        self.pending = Some(PendingSubmit {
            plan,
            generation,
            rx,
        });
    }

    /// Settles a finished outbound call, if any. Called once per frame.
    pub fn poll_pending(&mut self) {
        let Some(pending) = self.pending.as_ref() else {
            return;
        };
        let result = match pending.rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(worker_gone()),
        };
        if let Some(pending) = self.pending.take() {
            self.finish(pending.plan, result, pending.generation);
        }
    }

    /// Blocks until an outstanding call finishes; used before exit so the
    /// result still reaches the cache.
    pub fn finish_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            let result = pending.rx.recv().unwrap_or_else(|_| Err(worker_gone()));
            self.finish(pending.plan, result, pending.generation);
        }
    }

    fn finish(&mut self, plan: SubmitPlan, result: DispatchResult, generation: u64) {
        let outcome = self
            .orchestrator
            .settle(plan, result, &mut *self.leave_data, &mut self.status);

        let issuer_open = self.dialog.as_ref().is_some_and(|d| d.generation == generation);
        if issuer_open {
            if outcome.closes_dialog() {
                self.close_dialog();
            } else if let Some(dialog) = self.dialog.as_mut() {
                dialog.submitting = false;
            }
        }

        if let SubmitOutcome::Created { id } | SubmitOutcome::Updated { id } = &outcome {
            if let Some(pos) = self.leave_data.sorted().iter().position(|e| &e.id == id) {
                self.list_cursor = pos;
            }
        }
        self.list_cursor = self
            .list_cursor
            .min(self.leave_data.events.len().saturating_sub(1));
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(9), // month overview (title, header, 6 weeks, padding)
                Constraint::Min(5),    // leave table
                Constraint::Length(1), // status
                Constraint::Length(1), // key hints
            ])
            .split(f.area());

        self.render_overview(f, chunks[0]);
        self.render_table(f, chunks[1]);
        self.render_status(f, chunks[2]);
        f.render_widget(
            Paragraph::new(Span::styled(
                "↑↓=select  n=new  Enter/e=edit  [ ]=month  t=today  q=quit",
                Style::default().fg(Color::DarkGray),
            )),
            chunks[3],
        );

        if let Some(dialog) = self.dialog.as_mut() {
            dialog.render(f, self.owners);
        }
    }

    fn render_overview(&self, f: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(21),
                Constraint::Length(4),
                Constraint::Min(0),
            ])
            .split(area);

        let selected = self.selected_event();
        let cells = build_month_grid(&GridRequest {
            reference: self.view_month,
            today: self.today,
            selected: None,
            cutoff: self.settings.cutoff_date,
            min_date: None,
        });
        let day_map = match (cells.first(), cells.last()) {
            (Some(first), Some(last)) => self.leave_data.day_map(first.date, last.date),
            _ => Default::default(),
        };

        let title = format!(
            "{} {}",
            month_name(self.view_month.month()),
            self.view_month.year()
        );
        let mut lines = vec![
            Line::from(Span::styled(
                format!("{:^21}", title),
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )),
            Line::from(WEEKDAY_HEADER),
        ];
        for week in cells.chunks(7) {
            let mut spans = Vec::new();
            for cell in week {
                let leave = day_map
                    .get(&cell.date)
                    .and_then(|evs| evs.first())
                    .map(|ev| ev.leave_type);
                let in_selected = selected.is_some_and(|ev| ev.covers(cell.date));
                spans.push(Span::styled(
                    format!("{:2}", cell.day),
                    overview_day_style(cell, leave, in_selected),
                ));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }
        f.render_widget(Paragraph::new(lines), columns[0]);

        let half = LeaveType::ALL.len().div_ceil(2);
        let legend: Vec<Line> = (0..half)
            .map(|i| {
                let mut spans = Vec::new();
                for t in [LeaveType::ALL.get(i), LeaveType::ALL.get(i + half)]
                    .into_iter()
                    .flatten()
                {
                    spans.push(Span::styled("■ ", Style::default().fg(hex_color(t.color()))));
                    spans.push(Span::raw(format!("{:<22}", t.label())));
                }
                Line::from(spans)
            })
            .collect();
        let mut legend_lines = vec![Line::from(""), Line::from("")];
        legend_lines.extend(legend);
        f.render_widget(Paragraph::new(legend_lines), columns[2]);
    }

    fn render_table(&self, f: &mut Frame, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let header = Row::new(vec![
            Cell::from("#").style(bold),
            Cell::from("Owner").style(bold),
            Cell::from("Type").style(bold),
            Cell::from("Start").style(bold),
            Cell::from("End").style(bold),
            Cell::from("Days").style(bold),
            Cell::from("Notes").style(bold),
        ]);

        let events = self.leave_data.sorted();
        let rows: Vec<Row> = events
            .iter()
            .enumerate()
            .map(|(i, ev)| {
                let owner = self
                    .owners
                    .display_name(&ev.user_id)
                    .unwrap_or(&ev.user_id)
                    .to_string();
                let days = (ev.end_date() - ev.start_date()).num_days() + 1;
                Row::new(vec![
                    Cell::from(format!("{}", i + 1)),
                    Cell::from(owner),
                    Cell::from(ev.title.clone()).style(Style::default().fg(hex_color(&ev.color))),
                    Cell::from(ev.start_date().format("%Y-%m-%d").to_string()),
                    Cell::from(ev.end_date().format("%Y-%m-%d").to_string()),
                    Cell::from(days.to_string()),
                    Cell::from(ev.notes.clone().unwrap_or_default()),
                ])
            })
            .collect();

        let mut table_state = TableState::default();
        if !events.is_empty() {
            table_state.select(Some(self.list_cursor));
        }

        let table = Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Length(22),
                Constraint::Length(20),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Length(5),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Leave events ({}) ", events.len())),
        )
        .row_highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

        f.render_stateful_widget(table, area, &mut table_state);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let line = match (&self.status.message, &self.pending) {
            (Some((msg, color)), _) => Line::from(Span::styled(msg.clone(), Style::default().fg(*color))),
            (None, Some(_)) => Line::from(Span::styled("Saving…", Style::default().fg(Color::Yellow))),
            (None, None) => Line::from(""),
        };
        f.render_widget(Paragraph::new(line), area);
    }
}

fn worker_gone() -> ApiError {
    ApiError::Rejected("request worker stopped without a response".to_string())
}

/// Style for one day in the month overview.
pub(crate) fn overview_day_style(cell: &DayCell, leave: Option<LeaveType>, in_selected: bool) -> Style {
    if in_selected {
        let bg = leave.map(|t| hex_color(t.color())).unwrap_or(Color::White);
        Style::default()
            .fg(Color::Black)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else if let Some(t) = leave {
        let mut s = Style::default()
            .fg(hex_color(t.color()))
            .add_modifier(Modifier::BOLD);
        if cell.is_today {
            s = s.add_modifier(Modifier::REVERSED);
        }
        if !cell.is_current_month {
            s = s.add_modifier(Modifier::DIM);
        }
        s
    } else if cell.is_today {
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else if !cell.is_current_month {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default()
    }
}

// ── App event loop ────────────────────────────────────────────────────────────

pub fn run_app(terminal: &mut Tui, app: &mut App) -> Result<()> {
    loop {
        app.poll_pending();
        terminal.draw(|f| app.render(f))?;
        if event::poll(StdDuration::from_millis(16))? {
            match event::read()? {
                CEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key.code, key.modifiers) {
                        break;
                    }
                }
                CEvent::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => {
                    app.handle_pointer_down(mouse.column, mouse.row);
                }
                _ => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::owner::Owner;
    use crate::leave::orchestrator::testing::RecordingApi;
    use crate::leave::validation::FormField;
    use crate::data::LeaveCache;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn owners() -> OwnerData {
        OwnerData {
            owners: vec![
                Owner::new("cw-001", "Amara Okafor"),
                Owner::new("cw-002", "Tomasz Nowak"),
            ],
        }
    }

    fn annual(id: &str, start: NaiveDate, end: NaiveDate) -> LeaveEvent {
        LeaveEvent::new(id, "cw-001", LeaveType::AnnualLeave, start, end, None, None)
    }

    fn make_app<'a>(
        leave_data: &'a mut LeaveEventData,
        owners: &'a OwnerData,
        api: Arc<RecordingApi>,
        sync_edits: bool,
    ) -> App<'a> {
        let orchestrator = LeaveOrchestrator::new(api, "agency-7", sync_edits);
        App::new(
            leave_data,
            owners,
            AppSettings::default(),
            orchestrator,
            d(2024, 3, 15),
        )
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(code, KeyModifiers::empty())
    }

    fn ctrl_s(app: &mut App) {
        app.handle_key(KeyCode::Char('s'), KeyModifiers::CONTROL);
    }

    fn wait_for_pending(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.pending.is_some() && Instant::now() < deadline {
            app.poll_pending();
            thread::sleep(Duration::from_millis(5));
        }
        assert!(app.pending.is_none(), "request did not settle");
    }

    #[test]
    fn test_q_and_ctrl_c_quit() {
        let mut data = LeaveEventData::default();
        let owners = owners();
        let mut app = make_app(&mut data, &owners, Arc::new(RecordingApi::default()), false);
        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL));
    }

    #[test]
    fn test_q_inside_dialog_is_text_not_quit() {
        let mut data = LeaveEventData::default();
        let owners = owners();
        let mut app = make_app(&mut data, &owners, Arc::new(RecordingApi::default()), false);
        press(&mut app, KeyCode::Char('n'));
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert!(app.dialog.is_some());
    }

    #[test]
    fn test_new_dialog_opens_and_escape_closes() {
        let mut data = LeaveEventData::default();
        let owners = owners();
        let mut app = make_app(&mut data, &owners, Arc::new(RecordingApi::default()), false);
        press(&mut app, KeyCode::Char('n'));
        assert!(app.dialog.as_ref().is_some_and(|d| !d.is_edit()));
        press(&mut app, KeyCode::Esc);
        assert!(app.dialog.is_none());
    }

    #[test]
    fn test_create_runs_off_thread_and_lands_in_cache() {
        let mut data = LeaveEventData::default();
        let owners = owners();
        let api = Arc::new(RecordingApi::default());
        {
            let mut app = make_app(&mut data, &owners, api.clone(), false);
            press(&mut app, KeyCode::Char('n'));
            for c in "tomasz".chars() {
                press(&mut app, KeyCode::Char(c));
            }
            ctrl_s(&mut app);
            assert!(app.dialog.as_ref().is_some_and(|d| d.submitting));

            // A second save while in flight is ignored.
            ctrl_s(&mut app);

            wait_for_pending(&mut app);
            assert!(app.dialog.is_none());
            assert_eq!(
                app.status.message,
                Some(("Leave event created successfully".to_string(), Color::Green))
            );
        }
        assert_eq!(api.creates.lock().unwrap().len(), 1);
        assert_eq!(data.events.len(), 1);
        assert_eq!(data.events[0].id, "srv-42");
        assert_eq!(data.events[0].user_id, "cw-002");
        assert_eq!(data.events[0].start_date(), d(2024, 3, 15));
    }

    #[test]
    fn test_invalid_draft_shows_errors_without_calling_api() {
        let mut data = LeaveEventData::default();
        let owners = owners();
        let api = Arc::new(RecordingApi::default());
        let mut app = make_app(&mut data, &owners, api.clone(), false);
        press(&mut app, KeyCode::Char('n'));
        if let Some(dialog) = app.dialog.as_mut() {
            dialog.draft.user_id = "cw-001".to_string();
            dialog.draft.start_date = Some(d(2024, 3, 10));
            dialog.draft.end_date = Some(d(2024, 3, 9));
        }
        ctrl_s(&mut app);
        let dialog = app.dialog.as_ref().unwrap();
        assert_eq!(
            dialog.errors.get(FormField::EndDate),
            Some("End date cannot be before start date")
        );
        assert!(app.pending.is_none());
        assert_eq!(api.call_count(), 0);
    }

    #[test]
    fn test_failed_create_keeps_dialog_open() {
        let mut data = LeaveEventData::default();
        let owners = owners();
        let mut app = make_app(&mut data, &owners, Arc::new(RecordingApi::failing()), false);
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('a'));
        ctrl_s(&mut app);
        wait_for_pending(&mut app);
        let dialog = app.dialog.as_ref().unwrap();
        assert!(!dialog.submitting);
        assert_eq!(dialog.draft.user_id, "cw-001");
        assert_eq!(
            app.status.message,
            Some(("Failed to create leave event".to_string(), Color::Red))
        );
        assert!(app.leave_data.events.is_empty());
    }

    #[test]
    fn test_edit_saves_locally_and_closes() {
        let mut data = LeaveEventData {
            events: vec![annual("srv-1", d(2024, 4, 1), d(2024, 4, 3))],
        };
        let owners = owners();
        let api = Arc::new(RecordingApi::default());
        {
            let mut app = make_app(&mut data, &owners, api.clone(), false);
            press(&mut app, KeyCode::Enter);
            assert!(app.dialog.as_ref().is_some_and(|d| d.is_edit()));
            if let Some(dialog) = app.dialog.as_mut() {
                dialog.draft.notes = "half day on the 3rd".to_string();
            }
            ctrl_s(&mut app);
            assert!(app.pending.is_none());
            assert!(app.dialog.is_none());
        }
        assert_eq!(api.call_count(), 0);
        assert_eq!(
            data.get("srv-1").and_then(|e| e.notes.as_deref()),
            Some("half day on the 3rd")
        );
    }

    #[test]
    fn test_delete_from_edit_dialog() {
        let mut data = LeaveEventData {
            events: vec![
                annual("srv-1", d(2024, 4, 1), d(2024, 4, 3)),
                annual("srv-2", d(2024, 5, 1), d(2024, 5, 1)),
            ],
        };
        let owners = owners();
        {
            let mut app = make_app(&mut data, &owners, Arc::new(RecordingApi::default()), false);
            press(&mut app, KeyCode::Down);
            press(&mut app, KeyCode::Char('e'));
            if let Some(dialog) = app.dialog.as_mut() {
                dialog.focus = crate::ui::leave_dialog::Focus::Delete;
            }
            press(&mut app, KeyCode::Enter);
            assert!(app.dialog.is_none());
            assert_eq!(app.list_cursor, 0);
        }
        assert_eq!(data.events.len(), 1);
        assert_eq!(data.events[0].id, "srv-1");
    }

    #[test]
    fn test_sync_edits_dispatches_update_off_thread() {
        let mut data = LeaveEventData {
            events: vec![annual("srv-1", d(2024, 4, 1), d(2024, 4, 3))],
        };
        let owners = owners();
        let api = Arc::new(RecordingApi::default());
        {
            let mut app = make_app(&mut data, &owners, api.clone(), true);
            press(&mut app, KeyCode::Enter);
            ctrl_s(&mut app);
            assert!(app.pending.is_some());
            wait_for_pending(&mut app);
            assert!(app.dialog.is_none());
        }
        assert_eq!(*api.updates.lock().unwrap(), vec!["srv-1".to_string()]);
    }

    #[test]
    fn test_late_result_does_not_close_newer_dialog() {
        let mut data = LeaveEventData::default();
        let owners = owners();
        {
            let mut app = make_app(&mut data, &owners, Arc::new(RecordingApi::default()), false);
            press(&mut app, KeyCode::Char('n'));
            press(&mut app, KeyCode::Char('a'));
            ctrl_s(&mut app);
            press(&mut app, KeyCode::Esc);
            press(&mut app, KeyCode::Char('n'));
            let newer = app.dialog.as_ref().map(|d| d.generation);
            wait_for_pending(&mut app);
            assert_eq!(app.dialog.as_ref().map(|d| d.generation), newer);
            assert!(app.dialog.as_ref().is_some_and(|d| !d.submitting));
        }
        assert_eq!(data.events.len(), 1);
    }

    #[test]
    fn test_finish_pending_settles_before_exit() {
        let mut data = LeaveEventData::default();
        let owners = owners();
        {
            let mut app = make_app(&mut data, &owners, Arc::new(RecordingApi::default()), false);
            press(&mut app, KeyCode::Char('n'));
            press(&mut app, KeyCode::Char('a'));
            ctrl_s(&mut app);
            app.finish_pending();
            assert!(app.pending.is_none());
        }
        assert_eq!(data.events.len(), 1);
    }

    #[test]
    fn test_month_navigation_and_selection_follow() {
        let mut data = LeaveEventData {
            events: vec![
                annual("srv-1", d(2024, 3, 1), d(2024, 3, 2)),
                annual("srv-2", d(2024, 6, 10), d(2024, 6, 12)),
            ],
        };
        let owners = owners();
        let mut app = make_app(&mut data, &owners, Arc::new(RecordingApi::default()), false);
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.view_month, d(2024, 4, 1));
        press(&mut app, KeyCode::Char('['));
        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.view_month, d(2024, 2, 1));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.view_month, d(2024, 6, 1));
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.view_month, d(2024, 3, 1));
    }

    #[test]
    fn test_render_lists_events_and_dialog() {
        let mut data = LeaveEventData {
            events: vec![annual("srv-1", d(2024, 3, 4), d(2024, 3, 6))],
        };
        let owners = owners();
        let mut app = make_app(&mut data, &owners, Arc::new(RecordingApi::default()), false);
        press(&mut app, KeyCode::Char('n'));
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Amara Okafor"));
        assert!(text.contains("March 2024"));
        assert!(text.contains("New Leave"));
    }

    #[test]
    fn test_render_overview_with_unbounded_leave() {
        let mut data = LeaveEventData {
            events: vec![annual("srv-1", d(1900, 1, 1), d(9999, 12, 31))],
        };
        let owners = owners();
        let mut app = make_app(&mut data, &owners, Arc::new(RecordingApi::default()), false);
        press(&mut app, KeyCode::Char('t'));
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let green = Color::Rgb(0x4C, 0xAF, 0x50);
        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("March 2024"));
        assert!(buffer.content().iter().any(|c| c.bg == green));
    }

    #[test]
    fn test_overview_style_marks_leave_days() {
        let cell = DayCell {
            date: d(2024, 3, 4),
            day: 4,
            month: 3,
            year: 2024,
            is_current_month: true,
            is_today: false,
            is_selected: false,
            is_disabled: false,
        };
        assert_eq!(overview_day_style(&cell, None, false), Style::default());
        assert_eq!(
            overview_day_style(&cell, Some(LeaveType::SickLeave), false),
            Style::default()
                .fg(Color::Rgb(0xF4, 0x43, 0x36))
                .add_modifier(Modifier::BOLD)
        );
        assert_eq!(
            overview_day_style(&cell, Some(LeaveType::SickLeave), true).bg,
            Some(Color::Rgb(0xF4, 0x43, 0x36))
        );
    }
}
