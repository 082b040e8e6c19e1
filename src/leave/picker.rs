use crate::calc::calendar_grid::{add_months, build_month_grid, first_of_month, DayCell, GridRequest};
use chrono::{Duration, NaiveDate};

/// Which popover, if any, is showing. At most one is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PickerState {
    #[default]
    Closed,
    StartOpen,
    EndOpen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateField {
    Start,
    End,
}

impl DateField {
    fn open_state(self) -> PickerState {
        match self {
            DateField::Start => PickerState::StartOpen,
            DateField::End => PickerState::EndOpen,
        }
    }
}

/// Navigation position inside one popover.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PopoverView {
    pub view_month: NaiveDate,
    pub cursor: NaiveDate,
}

impl PopoverView {
    fn at(date: NaiveDate) -> Self {
        PopoverView {
            view_month: first_of_month(date),
            cursor: date,
        }
    }
}

/// Start/end date-range picker: two trigger controls and their popovers.
#[derive(Clone, Debug)]
pub struct DatePicker {
    state: PickerState,
    view: PopoverView,
}

impl DatePicker {
    pub fn new(today: NaiveDate) -> Self {
        DatePicker {
            state: PickerState::Closed,
            view: PopoverView::at(today),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> PickerState {
        self.state
    }

    pub fn open_field(&self) -> Option<DateField> {
        match self.state {
            PickerState::Closed => None,
            PickerState::StartOpen => Some(DateField::Start),
            PickerState::EndOpen => Some(DateField::End),
        }
    }

    pub fn is_open(&self) -> bool {
        self.state != PickerState::Closed
    }

    pub fn view(&self) -> PopoverView {
        self.view
    }

    /// Trigger click. Opens `field`'s popover (closing the other one) and
    /// positions it on `anchor`, the field's current value or a fallback day.
    /// Clicking the trigger of the popover already open closes it.
    pub fn click_trigger(&mut self, field: DateField, anchor: NaiveDate) {
        let target = field.open_state();
        if self.state == target {
            self.state = PickerState::Closed;
        } else {
            self.state = target;
            self.view = PopoverView::at(anchor);
        }
    }

    /// Day click. Returns the field to commit `date` to and closes the popover.
    pub fn select_day(&mut self, date: NaiveDate) -> Option<(DateField, NaiveDate)> {
        let field = self.open_field()?;
        self.state = PickerState::Closed;
        Some((field, date))
    }

    /// Pointer-down that landed outside both popovers.
    pub fn pointer_down_outside(&mut self) {
        self.state = PickerState::Closed;
    }

    pub fn escape(&mut self) {
        self.state = PickerState::Closed;
    }

    /// Called when the parent dialog closes.
    pub fn reset(&mut self) {
        self.state = PickerState::Closed;
    }

    pub fn prev_month(&mut self) {
        self.shift_months(-1);
    }

    pub fn next_month(&mut self) {
        self.shift_months(1);
    }

    fn shift_months(&mut self, months: i32) {
        self.view.view_month = add_months(self.view.view_month, months);
        self.view.cursor = add_months(self.view.cursor, months);
    }

    /// Moves the keyboard cursor, following it into adjacent months.
    pub fn move_cursor(&mut self, days: i64) {
        if let Some(next) = self.view.cursor.checked_add_signed(Duration::days(days)) {
            self.view.cursor = next;
            self.view.view_month = first_of_month(next);
        }
    }

    /// Grid for the open popover. The end calendar disables days before `start`.
    pub fn grid(
        &self,
        today: NaiveDate,
        cutoff: NaiveDate,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Vec<DayCell> {
        let (selected, min_date) = match self.open_field() {
            Some(DateField::End) => (end, start),
            _ => (start, None),
        };
        build_month_grid(&GridRequest {
            reference: self.view.view_month,
            today,
            selected,
            cutoff,
            min_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn picker() -> DatePicker {
        DatePicker::new(d(2024, 3, 15))
    }

    #[test]
    fn test_starts_closed() {
        assert_eq!(picker().state(), PickerState::Closed);
    }

    #[test]
    fn test_opening_end_closes_start() {
        let mut p = picker();
        p.click_trigger(DateField::Start, d(2024, 3, 15));
        assert_eq!(p.state(), PickerState::StartOpen);
        p.click_trigger(DateField::End, d(2024, 3, 15));
        assert_eq!(p.state(), PickerState::EndOpen);
        p.click_trigger(DateField::Start, d(2024, 3, 15));
        assert_eq!(p.state(), PickerState::StartOpen);
    }

    #[test]
    fn test_clicking_open_trigger_again_closes() {
        let mut p = picker();
        p.click_trigger(DateField::End, d(2024, 3, 15));
        p.click_trigger(DateField::End, d(2024, 3, 15));
        assert_eq!(p.state(), PickerState::Closed);
    }

    #[test]
    fn test_select_day_in_start_commits_to_start_and_closes() {
        let mut p = picker();
        p.click_trigger(DateField::Start, d(2024, 3, 15));
        assert_eq!(
            p.select_day(d(2024, 3, 10)),
            Some((DateField::Start, d(2024, 3, 10)))
        );
        assert_eq!(p.state(), PickerState::Closed);
    }

    #[test]
    fn test_select_day_in_end_commits_to_end_and_closes() {
        let mut p = picker();
        p.click_trigger(DateField::End, d(2024, 3, 15));
        assert_eq!(
            p.select_day(d(2024, 3, 12)),
            Some((DateField::End, d(2024, 3, 12)))
        );
        assert_eq!(p.state(), PickerState::Closed);
    }

    #[test]
    fn test_select_day_while_closed_is_noop() {
        let mut p = picker();
        assert_eq!(p.select_day(d(2024, 3, 12)), None);
    }

    #[test]
    fn test_outside_pointer_and_escape_close_either_popover() {
        let mut p = picker();
        p.click_trigger(DateField::Start, d(2024, 3, 15));
        p.pointer_down_outside();
        assert_eq!(p.state(), PickerState::Closed);
        p.click_trigger(DateField::End, d(2024, 3, 15));
        p.escape();
        assert_eq!(p.state(), PickerState::Closed);
    }

    #[test]
    fn test_trigger_positions_view_on_anchor() {
        let mut p = picker();
        p.click_trigger(DateField::Start, d(2023, 12, 24));
        assert_eq!(p.view().view_month, d(2023, 12, 1));
        assert_eq!(p.view().cursor, d(2023, 12, 24));
    }

    #[test]
    fn test_cursor_follows_into_next_month() {
        let mut p = picker();
        p.click_trigger(DateField::Start, d(2024, 1, 30));
        p.move_cursor(7);
        assert_eq!(p.view().cursor, d(2024, 2, 6));
        assert_eq!(p.view().view_month, d(2024, 2, 1));
    }

    #[test]
    fn test_month_navigation_wraps_year() {
        let mut p = picker();
        p.click_trigger(DateField::Start, d(2024, 12, 31));
        p.next_month();
        assert_eq!(p.view().view_month, d(2025, 1, 1));
        assert_eq!(p.view().cursor, d(2025, 1, 31));
        p.prev_month();
        p.prev_month();
        assert_eq!(p.view().view_month, d(2024, 11, 1));
        assert_eq!(p.view().cursor, d(2024, 11, 30));
    }

    #[test]
    fn test_end_grid_disables_days_before_start() {
        let mut p = picker();
        p.click_trigger(DateField::End, d(2024, 3, 15));
        let cells = p.grid(d(2024, 3, 15), d(1900, 1, 1), Some(d(2024, 3, 10)), None);
        for c in &cells {
            assert_eq!(c.is_disabled, c.date < d(2024, 3, 10));
        }
    }

    #[test]
    fn test_start_grid_ignores_end_value() {
        let mut p = picker();
        p.click_trigger(DateField::Start, d(2024, 3, 15));
        let cells = p.grid(
            d(2024, 3, 15),
            d(1900, 1, 1),
            Some(d(2024, 3, 10)),
            Some(d(2024, 3, 5)),
        );
        assert!(cells.iter().all(|c| !c.is_disabled));
        assert!(cells.iter().any(|c| c.is_selected && c.date == d(2024, 3, 10)));
    }
}
