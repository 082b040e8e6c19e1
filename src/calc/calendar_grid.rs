use chrono::{Datelike, NaiveDate};

/// Six Sunday-first weeks.
pub const GRID_CELLS: usize = 42;
pub const WEEKDAY_HEADER: &str = "Su Mo Tu We Th Fr Sa";

/// Inputs for one month grid.
#[derive(Clone, Copy, Debug)]
pub struct GridRequest {
    /// Any day in the month to show.
    pub reference: NaiveDate,
    pub today: NaiveDate,
    /// The field's current value, highlighted if visible.
    pub selected: Option<NaiveDate>,
    /// Fixed earliest selectable date.
    pub cutoff: NaiveDate,
    /// Extra lower bound; the end-date calendar passes the chosen start date.
    pub min_date: Option<NaiveDate>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub day: u32,
    pub month: u32,
    pub year: i32,
    pub is_current_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    pub is_disabled: bool,
}

/// Builds the 42 cells for the reference month in reading order: trailing
/// days of the previous month, every day of the month, then leading days of
/// the next month.
pub fn build_month_grid(req: &GridRequest) -> Vec<DayCell> {
    let first = first_of_month(req.reference);
    let offset = first.weekday().num_days_from_sunday() as usize;
    let len = days_in_month(first.year(), first.month()) as usize;
    let prev = add_months(first, -1);
    let prev_len = days_in_month(prev.year(), prev.month()) as usize;
    let next = add_months(first, 1);

    (0..GRID_CELLS)
        .map(|i| {
            let (date, is_current_month) = if i < offset {
                (with_day(prev, (prev_len - offset + i + 1) as u32), false)
            } else if i < offset + len {
                (with_day(first, (i - offset + 1) as u32), true)
            } else {
                (with_day(next, (i - offset - len + 1) as u32), false)
            };
            let is_disabled =
                date < req.cutoff || req.min_date.is_some_and(|min| date < min);
            DayCell {
                date,
                day: date.day(),
                month: date.month(),
                year: date.year(),
                is_current_month,
                is_today: date == req.today,
                is_selected: req.selected == Some(date),
                is_disabled,
            }
        })
        .collect()
}

/// Counts of (previous-month, current-month, next-month) cells.
#[cfg(test)]
pub fn partition(cells: &[DayCell]) -> (usize, usize, usize) {
    let current = cells.iter().filter(|c| c.is_current_month).count();
    let leading = cells.iter().take_while(|c| !c.is_current_month).count();
    (leading, current, cells.len() - leading - current)
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn with_day(month_anchor: NaiveDate, day: u32) -> NaiveDate {
    month_anchor.with_day(day).unwrap_or(month_anchor)
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(a), Some(b)) => b.signed_duration_since(a).num_days() as u32,
        _ => 0,
    }
}

/// Shifts by whole months, clamping the day to the target month's length.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let total = date.month0() as i32 + months;
    let new_year = date.year() + total.div_euclid(12);
    let new_month = total.rem_euclid(12) as u32 + 1;
    let new_day = date.day().min(days_in_month(new_year, new_month));
    NaiveDate::from_ymd_opt(new_year, new_month, new_day).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn req(reference: NaiveDate) -> GridRequest {
        GridRequest {
            reference,
            today: d(2024, 3, 15),
            selected: None,
            cutoff: d(1900, 1, 1),
            min_date: None,
        }
    }

    #[test]
    fn test_every_month_has_42_cells_and_true_day_count() {
        for year in [1999, 2000, 2023, 2024, 2100] {
            for month in 1..=12 {
                let cells = build_month_grid(&req(d(year, month, 1)));
                assert_eq!(cells.len(), GRID_CELLS);
                let (lead, current, trail) = partition(&cells);
                assert_eq!(lead + current + trail, GRID_CELLS);
                assert_eq!(current as u32, days_in_month(year, month), "{}-{}", year, month);
            }
        }
    }

    #[test]
    fn test_leading_cells_match_first_weekday() {
        // 2024-03-01 is a Friday.
        let cells = build_month_grid(&req(d(2024, 3, 20)));
        let (lead, _, trail) = partition(&cells);
        assert_eq!(lead, 5);
        assert_eq!(trail, 42 - 5 - 31);
        assert_eq!(cells[0].date, d(2024, 2, 25));
        assert_eq!(cells[5].date, d(2024, 3, 1));
        assert_eq!(cells[41].date, d(2024, 4, 6));
    }

    #[test]
    fn test_month_starting_sunday_has_no_leading_days() {
        // 2023-10-01 is a Sunday.
        let cells = build_month_grid(&req(d(2023, 10, 1)));
        assert!(cells[0].is_current_month);
        assert_eq!(cells[0].day, 1);
    }

    #[test]
    fn test_cells_are_consecutive_days() {
        let cells = build_month_grid(&req(d(2024, 2, 1)));
        for pair in cells.windows(2) {
            assert_eq!(pair[0].date.succ_opt().unwrap(), pair[1].date);
        }
    }

    #[test]
    fn test_january_rolls_back_into_december() {
        // 2025-01-01 is a Wednesday.
        let cells = build_month_grid(&req(d(2025, 1, 9)));
        assert_eq!(cells[0].date, d(2024, 12, 29));
        assert_eq!(cells[0].year, 2024);
        assert!(!cells[0].is_current_month);
    }

    #[test]
    fn test_december_rolls_into_january() {
        let cells = build_month_grid(&req(d(2024, 12, 5)));
        let last = cells[41];
        assert_eq!(last.year, 2025);
        assert_eq!(last.month, 1);
        assert!(!last.is_current_month);
    }

    #[test]
    fn test_leap_february() {
        let cells = build_month_grid(&req(d(2024, 2, 10)));
        assert!(cells.iter().any(|c| c.is_current_month && c.day == 29));
        let cells = build_month_grid(&req(d(2023, 2, 10)));
        assert!(!cells.iter().any(|c| c.is_current_month && c.day == 29));
    }

    #[test]
    fn test_today_and_selected_flags() {
        let mut r = req(d(2024, 3, 1));
        r.selected = Some(d(2024, 3, 20));
        let cells = build_month_grid(&r);
        let today: Vec<_> = cells.iter().filter(|c| c.is_today).collect();
        let selected: Vec<_> = cells.iter().filter(|c| c.is_selected).collect();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].date, d(2024, 3, 15));
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].date, d(2024, 3, 20));
    }

    #[test]
    fn test_dates_before_cutoff_are_disabled() {
        let cells = build_month_grid(&req(d(1900, 1, 15)));
        for c in &cells {
            assert_eq!(c.is_disabled, c.date < d(1900, 1, 1), "{}", c.date);
        }
        assert!(cells[0].is_disabled);
    }

    #[test]
    fn test_cutoff_applies_even_with_earlier_min_date() {
        let mut r = req(d(1900, 1, 15));
        r.min_date = Some(d(1850, 1, 1));
        let cells = build_month_grid(&r);
        assert!(cells.iter().filter(|c| c.date < d(1900, 1, 1)).all(|c| c.is_disabled));
    }

    #[test]
    fn test_min_date_disables_earlier_days() {
        let mut r = req(d(2024, 3, 1));
        r.min_date = Some(d(2024, 3, 10));
        let cells = build_month_grid(&r);
        for c in &cells {
            assert_eq!(c.is_disabled, c.date < d(2024, 3, 10), "{}", c.date);
        }
    }

    #[test]
    fn test_add_months_clamps_and_wraps() {
        assert_eq!(add_months(d(2025, 1, 31), 1), d(2025, 2, 28));
        assert_eq!(add_months(d(2024, 11, 15), 3), d(2025, 2, 15));
        assert_eq!(add_months(d(2025, 1, 15), -1), d(2024, 12, 15));
        assert_eq!(add_months(d(2024, 3, 31), -13), d(2023, 2, 28));
    }

    #[test]
    fn test_days_in_month_values() {
        assert_eq!(days_in_month(2025, 1), 31);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 12), 31);
    }

    #[test]
    fn test_month_name_known_values() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(13), "Unknown");
    }
}
