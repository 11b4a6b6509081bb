//! The half-open month window used by the dashboard, score page and exports.

use time::{Date, Month, OffsetDateTime};

use crate::Error;

/// A half-open date range covering one calendar month: `[start, next)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    /// The first day of the month.
    pub start: Date,
    /// The first day of the following month.
    pub next: Date,
}

impl MonthWindow {
    /// The month window containing `date`.
    pub fn containing(date: Date) -> Self {
        let start = date
            .replace_day(1)
            .expect("day 1 is valid for every month");

        let next = match start.month() {
            Month::December => Date::from_calendar_date(start.year() + 1, Month::January, 1),
            month => Date::from_calendar_date(start.year(), month.next(), 1),
        }
        .expect("day 1 is valid for every month");

        Self { start, next }
    }

    /// The month window for the current UTC month.
    pub fn current() -> Self {
        Self::containing(OffsetDateTime::now_utc().date())
    }

    /// The month window for a year and month number (1-12).
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if the month number is out of range or
    /// the year cannot be represented.
    pub fn from_year_month(year: i32, month: u8) -> Result<Self, Error> {
        let tag = format!("{year:04}-{month:02}");
        let month = Month::try_from(month).map_err(|_| Error::InvalidMonth(tag.clone()))?;
        let start =
            Date::from_calendar_date(year, month, 1).map_err(|_| Error::InvalidMonth(tag))?;

        Ok(Self::containing(start))
    }

    /// Parse a `YYYY-MM` month tag, e.g. "2025-11".
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if the tag is not of the form `YYYY-MM`.
    pub fn parse(tag: &str) -> Result<Self, Error> {
        let error = || Error::InvalidMonth(tag.to_owned());
        let (year, month) = tag.split_once('-').ok_or_else(error)?;
        let year: i32 = year.parse().map_err(|_| error())?;
        let month: u8 = month.parse().map_err(|_| error())?;

        Self::from_year_month(year, month)
    }

    /// Parse an optional `YYYY-MM` month tag, falling back to the current
    /// month when the tag is missing or invalid.
    pub fn parse_or_current(tag: Option<&str>) -> Self {
        match tag {
            Some(tag) => Self::parse(tag).unwrap_or_else(|_| Self::current()),
            None => Self::current(),
        }
    }

    /// The `YYYY-MM` tag for this window.
    pub fn tag(&self) -> String {
        format!("{:04}-{:02}", self.start.year(), self.start.month() as u8)
    }

    /// The number of calendar days in the month.
    pub fn day_count(&self) -> u8 {
        self.start.month().length(self.start.year())
    }

    /// Every calendar day in the month, in order.
    pub fn days(&self) -> impl Iterator<Item = Date> + use<> {
        let next = self.next;
        std::iter::successors(Some(self.start), move |day| {
            day.next_day().filter(|day| *day < next)
        })
    }

    /// The window for the previous month.
    pub fn previous(&self) -> Self {
        let last_of_previous = self
            .start
            .previous_day()
            .expect("the supported date range does not start mid-month");
        Self::containing(last_of_previous)
    }

    /// The window for the following month.
    pub fn following(&self) -> Self {
        Self::containing(self.next)
    }

    /// A human-readable label, e.g. "November 2025".
    pub fn label(&self) -> String {
        format!("{} {}", self.start.month(), self.start.year())
    }
}

#[cfg(test)]
mod month_window_tests {
    use time::macros::date;

    use crate::Error;

    use super::MonthWindow;

    #[test]
    fn window_is_half_open() {
        let window = MonthWindow::containing(date!(2025 - 11 - 15));

        assert_eq!(window.start, date!(2025 - 11 - 01));
        assert_eq!(window.next, date!(2025 - 12 - 01));
    }

    #[test]
    fn window_wraps_december() {
        let window = MonthWindow::containing(date!(2025 - 12 - 31));

        assert_eq!(window.start, date!(2025 - 12 - 01));
        assert_eq!(window.next, date!(2026 - 01 - 01));
    }

    #[test]
    fn parses_month_tag() {
        let window = MonthWindow::parse("2025-02").unwrap();

        assert_eq!(window.start, date!(2025 - 02 - 01));
        assert_eq!(window.next, date!(2025 - 03 - 01));
        assert_eq!(window.tag(), "2025-02");
    }

    #[test]
    fn rejects_bad_month_tags() {
        for tag in ["", "2025", "2025-13", "2025-00", "202A-01", "2025-1x"] {
            assert_eq!(
                MonthWindow::parse(tag),
                Err(Error::InvalidMonth(tag.to_owned())),
                "want InvalidMonth for {tag:?}"
            );
        }
    }

    #[test]
    fn parse_or_current_falls_back() {
        let current = MonthWindow::current();

        assert_eq!(MonthWindow::parse_or_current(None), current);
        assert_eq!(MonthWindow::parse_or_current(Some("not-a-month")), current);
        assert_eq!(
            MonthWindow::parse_or_current(Some("2024-06")),
            MonthWindow::parse("2024-06").unwrap()
        );
    }

    #[test]
    fn days_covers_whole_month() {
        let window = MonthWindow::parse("2024-02").unwrap();
        let days: Vec<_> = window.days().collect();

        // 2024 is a leap year.
        assert_eq!(days.len(), 29);
        assert_eq!(window.day_count(), 29);
        assert_eq!(days[0], date!(2024 - 02 - 01));
        assert_eq!(days[28], date!(2024 - 02 - 29));
    }

    #[test]
    fn previous_and_following_wrap_year() {
        let window = MonthWindow::parse("2025-01").unwrap();

        assert_eq!(window.previous().tag(), "2024-12");
        assert_eq!(window.following().tag(), "2025-02");
    }
}
