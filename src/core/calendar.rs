//! Business-day sequences, due dates, and AU fiscal periods.
//!
//! All functions are pure. Business days are Monday–Friday; no holiday
//! calendar is applied. The AU fiscal year runs 1 July – 30 June, and
//! quarter `Qn YYYY` is named after the calendar year in which the fiscal
//! year starts (Q1 2024 = Jul–Sep 2024, Q3 2024 = Jan–Mar 2025).

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use super::catalog::Vendor;
use super::error::SynthError;
use super::types::DateRange;

/// First month of the AU fiscal year.
pub const FISCAL_YEAR_START_MONTH: u32 = 7;

/// Whether `date` falls on Monday–Friday.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Every calendar date in `[start, end]`, ascending. Empty when `start > end`.
pub fn all_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Every Monday–Friday date in `[start, end]`, ascending.
///
/// An empty result means no valid issue date exists; callers treat that as
/// a hard failure.
pub fn business_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_business_day(*d))
        .collect()
}

/// Due date for a bill from `vendor` issued on `issue`.
pub fn due_date(issue: NaiveDate, vendor: &Vendor) -> Result<NaiveDate, SynthError> {
    vendor.payment_terms.due_date(issue)
}

/// Last day (28–31) of the given month.
pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|first| first.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

/// `(year, month)` of the calendar month after `date`.
pub(crate) fn next_month(date: NaiveDate) -> (i32, u32) {
    if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    }
}

fn month_range(year: i32, month: u32) -> Option<DateRange> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = NaiveDate::from_ymd_opt(year, month, last_day_of_month(year, month))?;
    Some(DateRange::new(start, end))
}

fn quarter_range(start_year: i32, start_month: u32) -> Option<DateRange> {
    let start = NaiveDate::from_ymd_opt(start_year, start_month, 1)?;
    let end_month = start_month + 2;
    let end = NaiveDate::from_ymd_opt(
        start_year,
        end_month,
        last_day_of_month(start_year, end_month),
    )?;
    Some(DateRange::new(start, end))
}

/// Date window of AU fiscal quarter `quarter` (1–4) of the fiscal year
/// starting in July of `year`.
pub fn au_fiscal_quarter(quarter: u32, year: i32) -> Result<DateRange, SynthError> {
    let range = match quarter {
        1 => quarter_range(year, 7),
        2 => quarter_range(year, 10),
        3 => quarter_range(year + 1, 1),
        4 => quarter_range(year + 1, 4),
        _ => {
            return Err(SynthError::Plan(format!(
                "fiscal quarter must be 1-4, got {quarter}"
            )));
        }
    };
    range.ok_or_else(|| SynthError::Plan(format!("Q{quarter} {year} is out of range")))
}

/// AU fiscal quarter containing `date`, with the fiscal-year label
/// (the calendar year the fiscal year starts in).
pub fn au_quarter_of(date: NaiveDate) -> (u32, i32) {
    match date.month() {
        7..=9 => (1, date.year()),
        10..=12 => (2, date.year()),
        1..=3 => (3, date.year() - 1),
        _ => (4, date.year() - 1),
    }
}

/// The AU fiscal quarter before the one containing `today`.
pub fn previous_au_quarter(today: NaiveDate) -> Result<DateRange, SynthError> {
    let (quarter, fy) = au_quarter_of(today);
    let (quarter, fy) = if quarter == 1 {
        (4, fy - 1)
    } else {
        (quarter - 1, fy)
    };
    au_fiscal_quarter(quarter, fy)
}

/// The calendar month containing `today`.
pub fn current_month(today: NaiveDate) -> Result<DateRange, SynthError> {
    month_range(today.year(), today.month())
        .ok_or_else(|| SynthError::Plan(format!("no month window for {today}")))
}

/// The calendar month before the one containing `today`.
pub fn previous_month(today: NaiveDate) -> Result<DateRange, SynthError> {
    let (year, month) = if today.month() == 1 {
        (today.year() - 1, 12)
    } else {
        (today.year(), today.month() - 1)
    };
    month_range(year, month)
        .ok_or_else(|| SynthError::Plan(format!("no previous month for {today}")))
}

/// Monday–Sunday week before the week containing `today`.
pub fn previous_week(today: NaiveDate) -> DateRange {
    let week_start = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    let end = week_start - Duration::days(1);
    DateRange::new(end - Duration::days(6), end)
}
