use chrono::NaiveDate;

/// Current date in the viewer's locale, read from the browser clock.
pub fn today_local() -> NaiveDate {
    use js_sys::Date;
    let now = Date::new_0();
    let year = now.get_full_year() as i32;
    let month = now.get_month() + 1; // JavaScript months are 0-indexed
    let day = now.get_date();

    // Browser clock gave an invalid date; fall back to a fixed month.
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(2025, 10, 1).unwrap_or_default())
}

/// Whether a calendar day is today in the viewer's locale.
pub fn is_today(date: NaiveDate) -> bool {
    date == today_local()
}
