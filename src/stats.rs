use crate::models::{month_short, MonthTable, Series, SeriesPoint, YearTable};
use crate::wrangling::mean;

/// Which line of a table a summary describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The historical `Average` line.
    AllTime,
    /// The line for the selected year.
    Current,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary<'a> {
    pub average: f64,
    pub max: (&'a SeriesPoint, f64),
    pub min: (&'a SeriesPoint, f64),
}

/// Mean, maximum and minimum over the non-null points of a line. Ties keep
/// the earliest point.
pub fn summarize(series: &Series) -> Option<Summary<'_>> {
    let mut values = series.values();
    let first = values.next()?;
    let (max, min) = values.fold((first, first), |(max, min), candidate| {
        let max = if candidate.1 > max.1 { candidate } else { max };
        let min = if candidate.1 < min.1 { candidate } else { min };
        (max, min)
    });
    let average = mean(series.values().map(|(_, value)| value))?;
    Some(Summary { average, max, min })
}

pub fn year_stats(table: &YearTable, scope: Scope) -> String {
    let (series, prefix) = match scope {
        Scope::AllTime => (&table.average, "Historical".to_string()),
        Scope::Current => (&table.current, format!("Year {}", table.year)),
    };
    let Some(summary) = summarize(series) else {
        return "No data for this year".to_string();
    };

    format!(
        "{prefix} Ave : {},  Max : {}({}),  Min : {}({})",
        rounded(summary.average),
        rounded(summary.max.1),
        month_short(summary.max.0.key),
        rounded(summary.min.1),
        month_short(summary.min.0.key),
    )
}

pub fn month_stats(table: &MonthTable, scope: Scope) -> String {
    let short = month_short(table.month);
    let (series, prefix) = match scope {
        Scope::AllTime => (&table.average, "Historical".to_string()),
        Scope::Current => (&table.current, format!("{short} {}", table.year)),
    };
    let Some(summary) = summarize(series) else {
        return "No data for this month".to_string();
    };

    format!(
        "{prefix} Ave : {},  Max : {}({short} {}),  Min : {}({short} {})",
        rounded(summary.average),
        rounded(summary.max.1),
        summary.max.0.key,
        rounded(summary.min.1),
        summary.min.0.key,
    )
}

fn rounded(value: f64) -> i64 {
    value.round_ties_even() as i64
}
