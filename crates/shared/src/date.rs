use time::{Date, Duration, OffsetDateTime};

pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Renders a date as ISO 8601 `YYYY-MM-DD`.
pub fn iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// First day of the date's month as `YYYY-MM-01`.
/// Usage counters are keyed by this value.
pub fn month_key(date: Date) -> String {
    format!("{:04}-{:02}-01", date.year(), u8::from(date.month()))
}

pub fn add_days(date: Date, days: i64) -> Date {
    date + Duration::days(days)
}

pub fn parse_iso_date(value: &str) -> Option<Date> {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    Date::parse(value, &format).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn iso_date_pads_month_and_day() {
        assert_eq!(iso_date(date!(2026 - 02 - 03)), "2026-02-03");
    }

    #[test]
    fn month_key_is_first_of_month() {
        assert_eq!(month_key(date!(2026 - 02 - 28)), "2026-02-01");
        assert_eq!(month_key(date!(2026 - 12 - 01)), "2026-12-01");
    }

    #[test]
    fn add_days_crosses_month_boundaries() {
        assert_eq!(add_days(date!(2026 - 01 - 29), 6), date!(2026 - 02 - 04));
    }

    #[test]
    fn parse_round_trips_iso_dates() {
        let parsed = parse_iso_date("2026-08-07").unwrap();
        assert_eq!(iso_date(parsed), "2026-08-07");

        assert!(parse_iso_date("not a date").is_none());
        assert!(parse_iso_date("2026-13-01").is_none());
    }
}
