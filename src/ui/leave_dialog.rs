use crate::calc::calendar_grid::{month_name, DayCell, WEEKDAY_HEADER};
use crate::data::leave_event::LeaveEvent;
use crate::data::leave_type::LeaveType;
use crate::data::owner::{OwnerData, OwnerDirectory};
use crate::leave::orchestrator::DialogMode;
use crate::leave::picker::{DateField, DatePicker};
use crate::leave::validation::{FormField, LeaveDraft, ValidationErrors};
use crate::ui::{centered, contains, hex_color};
use chrono::{Datelike, NaiveDate};
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const DIALOG_WIDTH: u16 = 64;
const DIALOG_HEIGHT: u16 = 17;
const FORM_ROWS: usize = 15;
const LABEL_WIDTH: u16 = 12;
const TRIGGER_WIDTH: u16 = 13;
const CELL_WIDTH: u16 = 3;
// 7 cells of 3 columns plus borders; title, weekday header and 6 weeks.
const POPOVER_WIDTH: u16 = 23;
const POPOVER_HEIGHT: u16 = 9;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Owner,
    LeaveType,
    StartDate,
    EndDate,
    Notes,
    PayRate,
    Save,
    Delete,
    Cancel,
}

const FOCUS_ORDER: [Focus; 9] = [
    Focus::Owner,
    Focus::LeaveType,
    Focus::StartDate,
    Focus::EndDate,
    Focus::Notes,
    Focus::PayRate,
    Focus::Save,
    Focus::Delete,
    Focus::Cancel,
];

/// What the dialog asks its owner to do after an input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogAction {
    None,
    Submit,
    Delete,
    Close,
}

/// Screen areas from the last render, used for pointer hit-testing.
#[derive(Clone, Copy, Debug, Default)]
struct HitAreas {
    start_trigger: Rect,
    end_trigger: Rect,
    popover: Option<Rect>,
    save: Rect,
    delete: Option<Rect>,
    cancel: Rect,
}

/// Modal form for booking, editing or deleting one leave event.
pub struct LeaveDialog {
    pub mode: DialogMode,
    pub draft: LeaveDraft,
    pub errors: ValidationErrors,
    pub picker: DatePicker,
    pub focus: Focus,
    pub owner_query: String,
    owner_cursor: usize,
    /// Set while a request is outstanding; Save and Delete are inert.
    pub submitting: bool,
    /// Identifies this opening of the dialog.
    pub generation: u64,
    today: NaiveDate,
    cutoff: NaiveDate,
    hit: HitAreas,
}

impl LeaveDialog {
    pub fn new_leave(today: NaiveDate, cutoff: NaiveDate, generation: u64) -> Self {
        let draft = LeaveDraft {
            leave_type: Some(LeaveType::AnnualLeave),
            start_date: Some(today),
            end_date: Some(today),
            ..LeaveDraft::default()
        };
        Self::with_draft(DialogMode::New, draft, today, cutoff, generation)
    }

    pub fn edit(event: LeaveEvent, today: NaiveDate, cutoff: NaiveDate, generation: u64) -> Self {
        let draft = LeaveDraft {
            user_id: event.user_id.clone(),
            leave_type: Some(event.leave_type),
            start_date: Some(event.start_date()),
            end_date: Some(event.end_date()),
            notes: event.notes.clone().unwrap_or_default(),
            pay_rate: event.pay_rate.map(|r| r.to_string()).unwrap_or_default(),
        };
        Self::with_draft(DialogMode::Edit(event), draft, today, cutoff, generation)
    }

    fn with_draft(
        mode: DialogMode,
        draft: LeaveDraft,
        today: NaiveDate,
        cutoff: NaiveDate,
        generation: u64,
    ) -> Self {
        LeaveDialog {
            mode,
            draft,
            errors: ValidationErrors::default(),
            picker: DatePicker::new(today),
            focus: Focus::Owner,
            owner_query: String::new(),
            owner_cursor: 0,
            submitting: false,
            generation,
            today,
            cutoff,
            hit: HitAreas::default(),
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, DialogMode::Edit(_))
    }

    pub fn editing(&self) -> Option<&LeaveEvent> {
        match &self.mode {
            DialogMode::Edit(ev) => Some(ev),
            DialogMode::New => None,
        }
    }

    // ── Keyboard ──────────────────────────────────────────────────────────────

    pub fn handle_key(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        owners: &OwnerData,
    ) -> DialogAction {
        if code == KeyCode::Char('s') && modifiers.contains(KeyModifiers::CONTROL) {
            self.picker.escape();
            return self.submit_action();
        }

        if self.picker.is_open() {
            self.handle_popover_key(code);
            return DialogAction::None;
        }

        match code {
            KeyCode::Esc => return DialogAction::Close,
            KeyCode::Tab => {
                self.step_focus(true);
                return DialogAction::None;
            }
            KeyCode::BackTab => {
                self.step_focus(false);
                return DialogAction::None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Owner => self.handle_owner_key(code, owners),
            Focus::LeaveType => match code {
                KeyCode::Left => self.cycle_leave_type(false),
                KeyCode::Right | KeyCode::Char(' ') => self.cycle_leave_type(true),
                _ => {}
            },
            Focus::StartDate | Focus::EndDate => {
                if matches!(code, KeyCode::Enter | KeyCode::Char(' ')) {
                    let field = if self.focus == Focus::StartDate {
                        DateField::Start
                    } else {
                        DateField::End
                    };
                    self.toggle_popover(field);
                }
            }
            Focus::Notes => {
                if edit_text(&mut self.draft.notes, code) {
                    self.errors.clear(FormField::Notes);
                }
            }
            Focus::PayRate => {
                if edit_text(&mut self.draft.pay_rate, code) {
                    self.errors.clear(FormField::PayRate);
                }
            }
            Focus::Save if code == KeyCode::Enter => return self.submit_action(),
            Focus::Delete if code == KeyCode::Enter => return self.delete_action(),
            Focus::Cancel if code == KeyCode::Enter => return DialogAction::Close,
            Focus::Save | Focus::Delete | Focus::Cancel => {}
        }
        DialogAction::None
    }

    fn handle_popover_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.picker.escape(),
            KeyCode::Left => self.picker.move_cursor(-1),
            KeyCode::Right => self.picker.move_cursor(1),
            KeyCode::Up => self.picker.move_cursor(-7),
            KeyCode::Down => self.picker.move_cursor(7),
            KeyCode::PageUp | KeyCode::Char('<') => self.picker.prev_month(),
            KeyCode::PageDown | KeyCode::Char('>') => self.picker.next_month(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let cursor = self.picker.view().cursor;
                self.commit_day(cursor);
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.picker.pointer_down_outside();
                self.step_focus(code == KeyCode::Tab);
            }
            _ => {}
        }
    }

    fn handle_owner_key(&mut self, code: KeyCode, owners: &OwnerData) {
        match code {
            KeyCode::Char(c) => {
                self.owner_query.push(c);
                self.owner_cursor = 0;
                self.pick_owner(owners);
            }
            KeyCode::Backspace => {
                self.owner_query.pop();
                self.owner_cursor = 0;
                if !self.owner_query.is_empty() {
                    self.pick_owner(owners);
                }
            }
            KeyCode::Down => {
                if self.owner_cursor + 1 < owners.search(&self.owner_query).len() {
                    self.owner_cursor += 1;
                    self.pick_owner(owners);
                }
            }
            KeyCode::Up => {
                if self.owner_cursor > 0 {
                    self.owner_cursor -= 1;
                    self.pick_owner(owners);
                }
            }
            KeyCode::Enter if !self.owner_query.is_empty() => self.pick_owner(owners),
            _ => {}
        }
    }

    fn pick_owner(&mut self, owners: &OwnerData) {
        if let Some(owner) = owners.search(&self.owner_query).get(self.owner_cursor) {
            self.draft.user_id = owner.id.clone();
            self.errors.clear(FormField::UserId);
        }
    }

    fn cycle_leave_type(&mut self, forward: bool) {
        self.draft.leave_type = Some(match self.draft.leave_type {
            Some(t) if forward => t.next(),
            Some(t) => t.prev(),
            None => LeaveType::AnnualLeave,
        });
        self.errors.clear(FormField::LeaveType);
    }

    fn step_focus(&mut self, forward: bool) {
        let order: Vec<Focus> = FOCUS_ORDER
            .into_iter()
            .filter(|f| *f != Focus::Delete || self.is_edit())
            .collect();
        let len = order.len();
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = if forward {
            order[(idx + 1) % len]
        } else {
            order[(idx + len - 1) % len]
        };
    }

    fn submit_action(&self) -> DialogAction {
        if self.submitting {
            DialogAction::None
        } else {
            DialogAction::Submit
        }
    }

    fn delete_action(&self) -> DialogAction {
        if self.submitting || !self.is_edit() {
            DialogAction::None
        } else {
            DialogAction::Delete
        }
    }

    // ── Date popovers ─────────────────────────────────────────────────────────

    fn toggle_popover(&mut self, field: DateField) {
        let anchor = match field {
            DateField::Start => self.draft.start_date,
            DateField::End => self.draft.end_date.or(self.draft.start_date),
        }
        .unwrap_or(self.today);
        self.picker.click_trigger(field, anchor);
    }

    fn is_day_disabled(&self, field: DateField, date: NaiveDate) -> bool {
        date < self.cutoff
            || (field == DateField::End && self.draft.start_date.is_some_and(|s| date < s))
    }

    /// Commits `date` to the open popover's field unless the day is disabled.
    fn commit_day(&mut self, date: NaiveDate) {
        let Some(field) = self.picker.open_field() else {
            return;
        };
        if self.is_day_disabled(field, date) {
            return;
        }
        match self.picker.select_day(date) {
            Some((DateField::Start, d)) => {
                self.draft.start_date = Some(d);
                self.errors.clear(FormField::StartDate);
                self.errors.clear(FormField::EndDate);
            }
            Some((DateField::End, d)) => {
                self.draft.end_date = Some(d);
                self.errors.clear(FormField::EndDate);
            }
            None => {}
        }
    }

    fn grid(&self) -> Vec<DayCell> {
        self.picker.grid(
            self.today,
            self.cutoff,
            self.draft.start_date,
            self.draft.end_date,
        )
    }

    // ── Pointer ───────────────────────────────────────────────────────────────

    pub fn handle_pointer_down(&mut self, column: u16, row: u16) -> DialogAction {
        if let Some(popover) = self.hit.popover.filter(|_| self.picker.is_open()) {
            if contains(popover, column, row) {
                if let Some(date) = self.cell_at(popover, column, row) {
                    self.commit_day(date);
                }
                return DialogAction::None;
            }
        }
        if contains(self.hit.start_trigger, column, row) {
            self.focus = Focus::StartDate;
            self.toggle_popover(DateField::Start);
            return DialogAction::None;
        }
        if contains(self.hit.end_trigger, column, row) {
            self.focus = Focus::EndDate;
            self.toggle_popover(DateField::End);
            return DialogAction::None;
        }

        if self.picker.is_open() {
            self.picker.pointer_down_outside();
        }

        if contains(self.hit.save, column, row) {
            return self.submit_action();
        }
        if self.hit.delete.is_some_and(|r| contains(r, column, row)) {
            return self.delete_action();
        }
        if contains(self.hit.cancel, column, row) {
            return DialogAction::Close;
        }
        DialogAction::None
    }

    fn cell_at(&self, popover: Rect, column: u16, row: u16) -> Option<NaiveDate> {
        let origin_x = popover.x + 1;
        let origin_y = popover.y + 2;
        if column < origin_x || row < origin_y {
            return None;
        }
        let col = (column - origin_x) / CELL_WIDTH;
        let week = row - origin_y;
        if col >= 7 || week >= 6 {
            return None;
        }
        self.grid()
            .get((week * 7 + col) as usize)
            .map(|cell| cell.date)
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    pub fn render(&mut self, f: &mut Frame, owners: &OwnerData) {
        let area = centered(f.area(), DIALOG_WIDTH, DIALOG_HEIGHT);
        let title = if self.is_edit() { " Edit Leave " } else { " New Leave " };
        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(area);
        f.render_widget(Clear, area);
        f.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1); FORM_ROWS])
            .split(inner);

        let owner_text = match owners.display_name(&self.draft.user_id) {
            Some(name) => format!("{} ({})", name, self.draft.user_id),
            None => "(none selected)".to_string(),
        };
        let mut search = vec![Span::raw(format!(
            "{:w$}search: {}",
            "",
            self.owner_query,
            w = LABEL_WIDTH as usize
        ))];
        if self.focus == Focus::Owner {
            let matches = owners.search(&self.owner_query).len();
            search.push(Span::raw("_"));
            search.push(Span::styled(
                format!("   ↑↓ {}/{}", (self.owner_cursor + 1).min(matches), matches),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let (type_text, swatch) = match self.draft.leave_type {
            Some(t) => (t.label(), hex_color(t.color())),
            None => ("(choose)".to_string(), Color::Reset),
        };

        let lines: [Line; FORM_ROWS] = [
            Line::from(vec![self.label("Owner", Focus::Owner), Span::raw(owner_text)]),
            Line::from(search),
            self.error_line(FormField::UserId),
            Line::from(vec![
                self.label("Leave type", Focus::LeaveType),
                Span::raw(format!("◀ {} ▶ ", type_text)),
                Span::styled("■■", Style::default().fg(swatch)),
            ]),
            self.error_line(FormField::LeaveType),
            Line::from(vec![
                self.label("Start date", Focus::StartDate),
                self.trigger(self.draft.start_date, DateField::Start),
            ]),
            self.error_line(FormField::StartDate),
            Line::from(vec![
                self.label("End date", Focus::EndDate),
                self.trigger(self.draft.end_date, DateField::End),
            ]),
            self.error_line(FormField::EndDate),
            Line::from(vec![
                self.label("Notes", Focus::Notes),
                Span::raw(self.text_value(&self.draft.notes, Focus::Notes)),
            ]),
            Line::from(vec![
                self.label("Pay rate", Focus::PayRate),
                Span::raw(self.text_value(&self.draft.pay_rate, Focus::PayRate)),
                Span::styled("  per hour", Style::default().fg(Color::DarkGray)),
            ]),
            self.error_line(FormField::PayRate),
            Line::from(""),
            self.buttons(),
            self.hint(),
        ];
        for (line, rect) in lines.into_iter().zip(rows.iter()) {
            f.render_widget(Paragraph::new(line), *rect);
        }

        let trigger_at = |r: Rect| Rect {
            x: r.x + LABEL_WIDTH,
            y: r.y,
            width: TRIGGER_WIDTH.min(r.width.saturating_sub(LABEL_WIDTH)),
            height: r.height,
        };
        self.hit.start_trigger = trigger_at(rows[5]);
        self.hit.end_trigger = trigger_at(rows[7]);
        let buttons = rows[13];
        self.hit.save = Rect { width: 8, ..buttons };
        self.hit.delete = self.is_edit().then(|| Rect {
            x: buttons.x + 10,
            width: 10,
            ..buttons
        });
        self.hit.cancel = Rect {
            x: buttons.x + 22,
            width: 10,
            ..buttons
        };

        self.render_popover(f);
    }

    fn render_popover(&mut self, f: &mut Frame) {
        let Some(field) = self.picker.open_field() else {
            self.hit.popover = None;
            return;
        };
        let trigger = match field {
            DateField::Start => self.hit.start_trigger,
            DateField::End => self.hit.end_trigger,
        };
        // Beside the trigger, so both triggers stay clickable.
        let screen = f.area();
        let y = trigger
            .y
            .min((screen.y + screen.height).saturating_sub(POPOVER_HEIGHT));
        let x = (trigger.x + trigger.width + 1)
            .min((screen.x + screen.width).saturating_sub(POPOVER_WIDTH));
        let rect = Rect {
            x,
            y,
            width: POPOVER_WIDTH,
            height: POPOVER_HEIGHT,
        }
        .intersection(screen);
        self.hit.popover = Some(rect);

        let view = self.picker.view();
        let title = format!(
            " {} {} ",
            month_name(view.view_month.month()),
            view.view_month.year()
        );
        let mut lines = vec![Line::from(Span::styled(
            WEEKDAY_HEADER,
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        for week in self.grid().chunks(7) {
            let mut spans = Vec::new();
            for cell in week {
                spans.push(Span::styled(
                    format!("{:2}", cell.day),
                    day_cell_style(cell, cell.date == view.cursor),
                ));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }
        f.render_widget(Clear, rect);
        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)),
            rect,
        );
    }

    fn label(&self, text: &str, focus: Focus) -> Span<'static> {
        let style = if self.focus == focus {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Span::styled(format!("{:<w$}", text, w = LABEL_WIDTH as usize), style)
    }

    fn trigger(&self, value: Option<NaiveDate>, field: DateField) -> Span<'static> {
        let text = match value {
            Some(d) => format!("[{}]", d.format("%Y-%m-%d")),
            None => "[pick a date]".to_string(),
        };
        let style = if self.picker.open_field() == Some(field) {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default().fg(Color::Cyan)
        };
        Span::styled(text, style)
    }

    fn text_value(&self, value: &str, focus: Focus) -> String {
        if self.focus == focus {
            format!("{}_", value)
        } else {
            value.to_string()
        }
    }

    fn error_line(&self, field: FormField) -> Line<'static> {
        match self.errors.get(field) {
            Some(msg) => Line::from(Span::styled(
                format!("{:w$}{}", "", msg, w = LABEL_WIDTH as usize),
                Style::default().fg(Color::Red),
            )),
            None => Line::from(""),
        }
    }

    fn buttons(&self) -> Line<'static> {
        let button = |text: &str, focus: Focus, enabled: bool| {
            let mut style = if enabled {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            if self.focus == focus {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Span::styled(text.to_string(), style)
        };
        let mut spans = vec![button("[ Save ]", Focus::Save, !self.submitting), Span::raw("  ")];
        if self.is_edit() {
            spans.push(button("[ Delete ]", Focus::Delete, !self.submitting));
        } else {
            spans.push(Span::raw(" ".repeat(10)));
        }
        spans.push(Span::raw("  "));
        spans.push(button("[ Cancel ]", Focus::Cancel, true));
        if self.submitting {
            spans.push(Span::styled("  saving…", Style::default().fg(Color::Yellow)));
        }
        Line::from(spans)
    }

    fn hint(&self) -> Line<'static> {
        let text = if self.picker.is_open() {
            "←→↑↓ move  PgUp/PgDn month  Enter pick  Esc close"
        } else {
            "Tab next  Enter open/press  Ctrl+S save  Esc cancel"
        };
        Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
    }
}

fn edit_text(buf: &mut String, code: KeyCode) -> bool {
    match code {
        KeyCode::Char(c) => {
            buf.push(c);
            true
        }
        KeyCode::Backspace => {
            buf.pop();
            true
        }
        _ => false,
    }
}

/// Style for one popover day cell.
pub(crate) fn day_cell_style(cell: &DayCell, is_cursor: bool) -> Style {
    if is_cursor {
        let bg = if cell.is_disabled { Color::DarkGray } else { Color::White };
        Style::default()
            .fg(Color::Black)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else if cell.is_disabled {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else if cell.is_selected {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else if cell.is_today {
        Style::default().add_modifier(Modifier::REVERSED)
    } else if !cell.is_current_month {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default()
    }
}
