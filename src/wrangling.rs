//! Slices the reservation table by hotel type, year and month and reshapes
//! the result into plot-ready tables.

use crate::models::{
    month_short, Booking, CountryCount, HotelType, Metric, MonthTable, Series, SeriesPoint,
    StayBucket, YearTable,
};
use crate::storage::Dataset;
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashMap};

pub const AVERAGE_LINE: &str = "Average";
pub const TOP_COUNTRIES: usize = 10;

pub fn year_data(dataset: &Dataset, hotel: HotelType, metric: Metric, year: i32) -> YearTable {
    let mut groups: BTreeMap<(i32, u32), Vec<&Booking>> = BTreeMap::new();
    for booking in dataset.bookings.iter().filter(|b| hotel.matches(b)) {
        groups
            .entry((booking.arrival.year(), booking.arrival.month()))
            .or_default()
            .push(booking);
    }
    let aggregates = aggregate_groups(metric, groups);

    let mut average = Vec::with_capacity(12);
    let mut current = Vec::with_capacity(12);
    for month in 1..=12u32 {
        let label = month_short(month).to_string();
        let across_years = aggregates
            .iter()
            .filter(|((_, m), _)| *m == month)
            .filter_map(|(_, value)| *value);
        average.push(SeriesPoint {
            key: month,
            label: label.clone(),
            value: mean(across_years),
            note: None,
        });
        current.push(SeriesPoint {
            key: month,
            label,
            value: aggregates.get(&(year, month)).copied().flatten(),
            note: None,
        });
    }

    YearTable {
        year,
        average: Series {
            name: AVERAGE_LINE.to_string(),
            points: average,
        },
        current: Series {
            name: year.to_string(),
            points: current,
        },
    }
}

pub fn month_data(
    dataset: &Dataset,
    hotel: HotelType,
    metric: Metric,
    year: i32,
    month: u32,
) -> MonthTable {
    let mut groups: BTreeMap<(i32, u32), Vec<&Booking>> = BTreeMap::new();
    for booking in dataset
        .bookings
        .iter()
        .filter(|b| hotel.matches(b) && b.arrival.month() == month)
    {
        groups
            .entry((booking.arrival.year(), booking.arrival.day()))
            .or_default()
            .push(booking);
    }
    let aggregates = aggregate_groups(metric, groups);

    let last_day = dataset
        .years
        .iter()
        .copied()
        .chain(std::iter::once(year))
        .filter_map(|y| days_in_month(y, month))
        .max()
        .unwrap_or(31);

    let mut average = Vec::with_capacity(last_day as usize);
    let mut current = Vec::with_capacity(last_day as usize);
    for day in 1..=last_day {
        let across_years = aggregates
            .iter()
            .filter(|((_, d), _)| *d == day)
            .filter_map(|(_, value)| *value);
        average.push(SeriesPoint {
            key: day,
            label: day.to_string(),
            value: mean(across_years),
            note: None,
        });
        current.push(SeriesPoint {
            key: day,
            label: day.to_string(),
            value: aggregates.get(&(year, day)).copied().flatten(),
            note: NaiveDate::from_ymd_opt(year, month, day)
                .map(|date| date.format("%A").to_string()),
        });
    }

    MonthTable {
        year,
        month,
        average: Series {
            name: AVERAGE_LINE.to_string(),
            points: average,
        },
        current: Series {
            name: year.to_string(),
            points: current,
        },
    }
}

pub fn country_counts(
    dataset: &Dataset,
    hotel: HotelType,
    year: i32,
    month: u32,
) -> Vec<CountryCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for booking in selected(dataset, hotel, year, month) {
        if let Some(country) = booking.country.as_deref() {
            *counts.entry(country).or_default() += 1;
        }
    }

    let mut ranked: Vec<CountryCount> = counts
        .into_iter()
        .map(|(country, count)| CountryCount {
            country: country.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.country.cmp(&b.country)));
    ranked.truncate(TOP_COUNTRIES);
    ranked
}

pub fn stay_lengths(dataset: &Dataset, hotel: HotelType, year: i32, month: u32) -> Vec<StayBucket> {
    let mut buckets: BTreeMap<u32, u64> = BTreeMap::new();
    let mut total = 0u64;
    for booking in selected(dataset, hotel, year, month) {
        *buckets.entry(booking.total_nights).or_default() += 1;
        total += 1;
    }

    buckets
        .into_iter()
        .map(|(nights, count)| StayBucket {
            nights,
            percent: count as f64 * 100.0 / total as f64,
        })
        .collect()
}

fn selected(
    dataset: &Dataset,
    hotel: HotelType,
    year: i32,
    month: u32,
) -> impl Iterator<Item = &Booking> {
    dataset.bookings.iter().filter(move |b| {
        hotel.matches(b) && b.arrival.year() == year && b.arrival.month() == month
    })
}

/// Reservations are counted per group; every other metric is averaged over
/// the non-null values.
fn aggregate_groups<K: Ord>(
    metric: Metric,
    groups: BTreeMap<K, Vec<&Booking>>,
) -> BTreeMap<K, Option<f64>> {
    groups
        .into_iter()
        .map(|(key, rows)| {
            let value = if metric.is_count() {
                Some(rows.len() as f64)
            } else {
                mean(rows.iter().filter_map(|b| metric.value(b)))
            };
            (key, value)
        })
        .collect()
}

pub(crate) fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next - first).num_days() as u32)
}
