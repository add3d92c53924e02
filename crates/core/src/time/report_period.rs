use anyhow::Context;
use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// A-share disclosures key off the exchange's local calendar (CST, UTC+8).
pub const CST_OFFSET_SECS: i32 = 8 * 3600;

/// Resolves the fiscal reporting period (a quarter-end date).
///
/// An explicit argument wins and is parsed as `YYYY-MM-DD`. Otherwise the
/// latest period whose disclosure window is open is derived from the current
/// CST month: annual forecasts trickle in through April, Q1 through July,
/// and so on.
pub fn resolve_report_date(
    report_date_arg: Option<&str>,
    now_utc: DateTime<Utc>,
) -> anyhow::Result<NaiveDate> {
    if let Some(s) = report_date_arg {
        return NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid report date: {s}"));
    }

    let cst = chrono::FixedOffset::east_opt(CST_OFFSET_SECS).context("invalid CST offset")?;
    let today = now_utc.with_timezone(&cst).date_naive();

    let (year, month, day) = match today.month() {
        1..=4 => (today.year() - 1, 12, 31),
        5..=7 => (today.year(), 3, 31),
        8..=10 => (today.year(), 6, 30),
        _ => (today.year(), 9, 30),
    };

    NaiveDate::from_ymd_opt(year, month, day)
        .with_context(|| format!("invalid report date {year}-{month:02}-{day:02}"))
}
