use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};

/// Calendar week bounds for the week `week_offset` weeks away from the week
/// containing `now`: Sunday 00:00:00.000 through Saturday 23:59:59.999, both
/// inclusive. Plain day arithmetic, so month and year boundaries fall out
/// correctly.
pub fn week_window(now: DateTime<Utc>, week_offset: i64) -> (DateTime<Utc>, DateTime<Utc>) {
    let days_from_sunday = now.weekday().num_days_from_sunday() as i64;
    let sunday = now.date_naive() - Duration::days(days_from_sunday - week_offset * 7);

    let week_start = sunday.and_time(NaiveTime::MIN).and_utc();
    let week_end = week_start + Duration::days(7) - Duration::milliseconds(1);
    (week_start, week_end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_midweek_window() {
        // Wednesday 2023-11-29 belongs to the Sunday 11-26 .. Saturday 12-02 week.
        let (start, end) = week_window(utc(2023, 11, 29, 15, 30, 0), 0);
        assert_eq!(start, utc(2023, 11, 26, 0, 0, 0));
        assert_eq!(end.to_rfc3339(), "2023-12-02T23:59:59.999+00:00");
    }

    #[test]
    fn test_sunday_and_saturday_edges() {
        let (start, _) = week_window(utc(2023, 11, 26, 0, 0, 0), 0);
        assert_eq!(start, utc(2023, 11, 26, 0, 0, 0));

        let (start, end) = week_window(utc(2023, 12, 2, 23, 59, 59), 0);
        assert_eq!(start, utc(2023, 11, 26, 0, 0, 0));
        assert!(end > utc(2023, 12, 2, 23, 59, 58));
    }

    #[test]
    fn test_offset_crosses_year_boundary() {
        // Tuesday 2024-01-02; the previous week starts on Sunday 2023-12-24.
        let (start, end) = week_window(utc(2024, 1, 2, 12, 0, 0), -1);
        assert_eq!(start, utc(2023, 12, 24, 0, 0, 0));
        assert_eq!(end.to_rfc3339(), "2023-12-30T23:59:59.999+00:00");
    }

    #[test]
    fn test_future_offset() {
        let (start, _) = week_window(utc(2023, 11, 29, 8, 0, 0), 2);
        assert_eq!(start, utc(2023, 12, 10, 0, 0, 0));
    }

    #[test]
    fn test_window_spans_exactly_one_week() {
        let (start, end) = week_window(utc(2024, 2, 29, 6, 0, 0), 0);
        assert_eq!(end - start, Duration::days(7) - Duration::milliseconds(1));
    }
}
