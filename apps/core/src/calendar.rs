use chrono::{Datelike, NaiveDate};

pub const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCell {
    Blank,
    Day { day: u32, today: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub title: String,
    /// Leading blanks then one cell per day, Sunday-first.
    pub cells: Vec<DayCell>,
}

/// Month shown by the calendar command. `month` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthView {
    year: i32,
    month: u32,
}

impl MonthView {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn title(&self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                month: self.month - 1,
                ..self
            }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                month: self.month + 1,
                ..self
            }
        }
    }

    pub fn days_in_month(&self) -> u32 {
        let next = self.next();
        match (
            NaiveDate::from_ymd_opt(self.year, self.month, 1),
            NaiveDate::from_ymd_opt(next.year, next.month, 1),
        ) {
            (Some(first), Some(following)) => (following - first).num_days() as u32,
            _ => 0,
        }
    }

    pub fn grid(&self, today: NaiveDate) -> MonthGrid {
        let leading = NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|first| first.weekday().num_days_from_sunday())
            .unwrap_or(0);
        let days = self.days_in_month();
        let is_current = Self::containing(today) == *self;

        let mut cells = Vec::with_capacity((leading + days) as usize);
        cells.extend((0..leading).map(|_| DayCell::Blank));
        cells.extend((1..=days).map(|day| DayCell::Day {
            day,
            today: is_current && today.day() == day,
        }));

        MonthGrid {
            title: self.title(),
            cells,
        }
    }
}

pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|index| MONTH_NAMES.get(index as usize))
        .copied()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn grid_starts_on_weekday_of_first() {
        // 1 October 2026 is a Thursday.
        let grid = MonthView::new(2026, 10).unwrap().grid(date(2026, 10, 18));
        assert_eq!(grid.title, "October 2026");
        assert_eq!(&grid.cells[..4], &[DayCell::Blank; 4]);
        assert_eq!(grid.cells[4], DayCell::Day { day: 1, today: false });
        assert_eq!(grid.cells.len(), 4 + 31);
    }

    #[test]
    fn today_is_flagged_only_in_its_month() {
        let today = date(2026, 10, 18);
        let current = MonthView::containing(today).grid(today);
        let flagged: Vec<_> = current
            .cells
            .iter()
            .filter(|cell| matches!(cell, DayCell::Day { today: true, .. }))
            .collect();
        assert_eq!(flagged, vec![&DayCell::Day { day: 18, today: true }]);

        let other = MonthView::containing(today).next().grid(today);
        assert!(!other
            .cells
            .iter()
            .any(|cell| matches!(cell, DayCell::Day { today: true, .. })));
    }

    #[test]
    fn navigation_wraps_years() {
        let january = MonthView::new(2026, 1).unwrap();
        assert_eq!(january.previous(), MonthView::new(2025, 12).unwrap());
        assert_eq!(january.previous().next(), january);
        assert_eq!(MonthView::new(2026, 12).unwrap().next(), MonthView::new(2027, 1).unwrap());
    }

    #[test]
    fn leap_february_has_29_days() {
        assert_eq!(MonthView::new(2028, 2).unwrap().days_in_month(), 29);
        assert_eq!(MonthView::new(2026, 2).unwrap().days_in_month(), 28);
    }

    #[test]
    fn rejects_invalid_month() {
        assert!(MonthView::new(2026, 0).is_none());
        assert!(MonthView::new(2026, 13).is_none());
        assert_eq!(month_name(0), "");
    }
}
