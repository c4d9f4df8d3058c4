use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use setrack_core::{AppError, AppResult};

/// UTC midnight-to-midnight bounds of one calendar day.
pub fn day_bounds(date: NaiveDate) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start = Utc
        .from_local_datetime(&date.and_hms_opt(0, 0, 0).ok_or_else(invalid_date)?)
        .single()
        .ok_or_else(invalid_date)?;

    Ok((start, start + Duration::days(1)))
}

/// First-of-month to first-of-next-month bounds in UTC.
pub fn month_bounds(year: i32, month: u32) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start_date = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        AppError::Validation(format!("invalid month {year}-{month:02}"))
    })?;
    let end_date = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid_date)?;

    let (start, _) = day_bounds(start_date)?;
    let (end, _) = day_bounds(end_date)?;
    Ok((start, end))
}

/// First-of-year to first-of-next-year bounds in UTC.
pub fn year_bounds(year: i32) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start_date =
        NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| {
            AppError::Validation(format!("invalid year {year}"))
        })?;
    let end_date = NaiveDate::from_ymd_opt(year + 1, 1, 1).ok_or_else(invalid_date)?;

    let (start, _) = day_bounds(start_date)?;
    let (end, _) = day_bounds(end_date)?;
    Ok((start, end))
}

fn invalid_date() -> AppError {
    AppError::Validation("date is out of representable range".to_owned())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{day_bounds, month_bounds, year_bounds};

    #[test]
    fn day_bounds_cover_exactly_one_day() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 15);
        let Some(date) = date else {
            panic!("valid date literal");
        };
        let Ok((start, end)) = day_bounds(date) else {
            panic!("bounds for valid date");
        };

        assert_eq!(start.to_rfc3339(), "2026-03-15T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2026-03-16T00:00:00+00:00");
    }

    #[test]
    fn december_rolls_into_next_year() {
        let Ok((start, end)) = month_bounds(2025, 12) else {
            panic!("bounds for valid month");
        };

        assert_eq!(start.to_rfc3339(), "2025-12-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2026-01-01T00:00:00+00:00");
    }

    #[test]
    fn year_bounds_span_the_full_year() {
        let Ok((start, end)) = year_bounds(2026) else {
            panic!("bounds for valid year");
        };

        assert_eq!(start.to_rfc3339(), "2026-01-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2027-01-01T00:00:00+00:00");
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(month_bounds(2026, 13).is_err());
    }
}
