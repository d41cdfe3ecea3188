//! Calendar helpers for the daily ledger.
//!
//! The projection indexes its per-day arrays by day offset from the horizon
//! start, so day differences are computed with Rata Die day numbers instead of
//! building a `jiff::Span` for every occurrence. Month stepping clamps the day
//! of month to the target month's length (Jan 31 + 1 month = Feb 28/29).

use jiff::civil::Date;

/// Leap year check in the proleptic Gregorian calendar.
#[inline]
pub fn is_leap_year(year: i16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Days in `month` of `year` without constructing a `Date`.
#[inline]
pub fn days_in_month(year: i16, month: i8) -> i8 {
    const DAYS: [i8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS[(month - 1) as usize]
    }
}

/// Calendar quarter index (0..=3) of a date.
#[inline]
pub fn quarter(d: Date) -> i8 {
    (d.month() - 1) / 3
}

/// Convert a civil date to a Rata Die day number (days since 0001-01-01).
#[inline]
fn rata_die(d: Date) -> i32 {
    let y = d.year() as i32;
    let m = d.month() as i32;
    let day = d.day() as i32;

    // March = month 1 so February closes the computational year
    let a = (14 - m) / 12;
    let y2 = y - a;
    let m2 = m + 12 * a - 3;

    day + (153 * m2 + 2) / 5 + 365 * y2 + y2 / 4 - y2 / 100 + y2 / 400 - 306
}

/// Number of days from `d1` to `d2` (positive when `d2 > d1`).
#[inline]
pub fn fast_days_between(d1: Date, d2: Date) -> i32 {
    rata_die(d2) - rata_die(d1)
}

/// Add `n` days to a date.
#[inline]
pub fn add_days(d: Date, n: i32) -> Date {
    rd_to_date(rata_die(d) + n)
}

/// [`add_days`] that returns `None` past the end of the calendar.
#[inline]
pub fn checked_add_days(d: Date, n: i32) -> Option<Date> {
    if d.year() == 9999 || d.year() == -9999 {
        return d.checked_add(jiff::Span::new().days(n)).ok();
    }
    Some(add_days(d, n))
}

/// Add `n` calendar months, clamping the day to the length of the target month.
///
/// Returns `None` when the result falls outside the representable year range.
#[inline]
pub fn add_months(d: Date, n: i32) -> Option<Date> {
    let zero_based = d.year() as i32 * 12 + (d.month() as i32 - 1) + n;
    let year = zero_based.div_euclid(12);
    let month = (zero_based.rem_euclid(12) + 1) as i8;
    let year = i16::try_from(year).ok()?;
    let day = d.day().min(days_in_month(year, month));
    Date::new(year, month, day).ok()
}

/// Inverse of `rata_die()`.
#[inline]
fn rd_to_date(rd: i32) -> Date {
    let z = rd + 306;
    let h = 100 * z - 25;
    let a = h / 3_652_425;
    let b = a - a / 4;
    let y = (100 * b + h) / 36_525;
    let c = b + z - 365 * y - y / 4;
    let m = (5 * c + 456) / 153;
    let day = c - (153 * m - 457) / 5;

    let (year, month) = if m > 12 { (y + 1, m - 12) } else { (y, m) };

    jiff::civil::date(year as i16, month as i8, day as i8)
}
