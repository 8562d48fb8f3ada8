//! Date-window arithmetic for analytics and budget queries
//!
//! All constructors take `now` explicitly so window edges are
//! deterministic under test; request handlers pass the server-local
//! current instant.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Inclusive date window; `start == None` means unbounded below
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateWindow {
    pub start: Option<NaiveDateTime>,
    pub end: NaiveDateTime,
}

impl DateWindow {
    /// Check if a datetime falls within the window (inclusive both ends)
    pub fn contains(&self, date: &NaiveDateTime) -> bool {
        match self.start {
            Some(start) => *date >= start && *date <= self.end,
            None => *date <= self.end,
        }
    }
}

/// Reporting period for the category breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakdownPeriod {
    /// Rolling window of the last 7 days
    Week,
    /// Current calendar month to date
    Month,
    /// Current calendar year to date
    Year,
}

impl Default for BreakdownPeriod {
    fn default() -> Self {
        BreakdownPeriod::Month
    }
}

impl BreakdownPeriod {
    /// Parse a period string; unrecognized values fall back to Month
    pub fn parse_lenient(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "week" => BreakdownPeriod::Week,
            "year" => BreakdownPeriod::Year,
            _ => BreakdownPeriod::Month,
        }
    }

    /// Compute the query window for this period, ending at `now`
    pub fn window(&self, now: NaiveDateTime) -> DateWindow {
        let start = match self {
            // Rolling 7x24h, not aligned to calendar weeks
            BreakdownPeriod::Week => now - Duration::days(7),
            BreakdownPeriod::Month => first_of_month(now.date()).and_hms_opt(0, 0, 0).unwrap(),
            BreakdownPeriod::Year => NaiveDate::from_ymd_opt(now.year(), 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        };
        DateWindow {
            start: Some(start),
            end: now,
        }
    }
}

impl std::fmt::Display for BreakdownPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BreakdownPeriod::Week => write!(f, "week"),
            BreakdownPeriod::Month => write!(f, "month"),
            BreakdownPeriod::Year => write!(f, "year"),
        }
    }
}

/// First calendar day of the month containing `date`
fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap()
}

/// Last calendar day of the month containing `date`
fn last_of_month(date: NaiveDate) -> NaiveDate {
    let (next_year, next_month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .pred_opt()
        .unwrap()
}

/// Window for the monthly trend: `months` whole months back from the
/// current month, pinned to day 1 at midnight, through `now`.
///
/// Month subtraction normalizes across year boundaries: March minus 6
/// months lands in September of the previous year. `months` has no
/// upper bound; a start that would fall before the representable date
/// range degrades to an unbounded window.
pub fn trend_window(now: NaiveDateTime, months: u32) -> DateWindow {
    let total = i64::from(now.year()) * 12 + i64::from(now.month0()) - i64::from(months);
    let year = total.div_euclid(12);
    let month0 = total.rem_euclid(12) as u32;
    let start = i32::try_from(year)
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, month0 + 1, 1))
        .map(|d| d.and_hms_opt(0, 0, 0).unwrap());
    DateWindow { start, end: now }
}

/// Window covering the current calendar day, 00:00:00 to 23:59:59.999
pub fn today_window(now: NaiveDateTime) -> DateWindow {
    let day = now.date();
    DateWindow {
        start: Some(day.and_hms_opt(0, 0, 0).unwrap()),
        end: day.and_hms_milli_opt(23, 59, 59, 999).unwrap(),
    }
}

/// Window from the first of the current month through `now`
pub fn month_to_date_window(now: NaiveDateTime) -> DateWindow {
    DateWindow {
        start: Some(first_of_month(now.date()).and_hms_opt(0, 0, 0).unwrap()),
        end: now,
    }
}

/// Window from January 1 of the current year through `now`
pub fn year_to_date_window(now: NaiveDateTime) -> DateWindow {
    DateWindow {
        start: Some(
            NaiveDate::from_ymd_opt(now.year(), 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        ),
        end: now,
    }
}

/// Window covering the whole current calendar month, first day 00:00
/// through last day 23:59:59.999 (budget evaluation window)
pub fn calendar_month_window(now: NaiveDateTime) -> DateWindow {
    let day = now.date();
    DateWindow {
        start: Some(first_of_month(day).and_hms_opt(0, 0, 0).unwrap()),
        end: last_of_month(day).and_hms_milli_opt(23, 59, 59, 999).unwrap(),
    }
}

/// All-time window with no lower bound, ending at `now`
pub fn all_time_window(now: NaiveDateTime) -> DateWindow {
    DateWindow {
        start: None,
        end: now,
    }
}

/// Three-letter month abbreviation (1-based month number)
pub fn month_abbrev(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    NAMES[(month as usize - 1).min(11)]
}

// ==================== Tests ====================
