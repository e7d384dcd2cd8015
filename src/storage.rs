use crate::errors::DataError;
use crate::models::{month_from_name, Booking, HotelKind};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::{env, io::Read, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// Immutable reservation table shared by every view.
#[derive(Debug, Default)]
pub struct Dataset {
    pub bookings: Vec<Booking>,
    pub years: Vec<i32>,
}

impl Dataset {
    pub fn new(bookings: Vec<Booking>) -> Self {
        let mut years: Vec<i32> = bookings.iter().map(|booking| booking.arrival.year()).collect();
        years.sort_unstable();
        years.dedup();
        Self { bookings, years }
    }
}

#[derive(Debug, Deserialize)]
struct BookingRow {
    hotel: String,
    arrival_date_year: i32,
    arrival_date_month: String,
    arrival_date_day_of_month: u32,
    stays_in_weekend_nights: u32,
    stays_in_week_nights: u32,
    adults: u32,
    #[serde(deserialize_with = "csv::invalid_option")]
    children: Option<f64>,
    babies: u32,
    #[serde(default)]
    country: Option<String>,
    booking_changes: u32,
    adr: f64,
    required_car_parking_spaces: u32,
    total_of_special_requests: u32,
}

impl BookingRow {
    fn into_booking(self) -> Option<Booking> {
        let hotel = HotelKind::from_label(&self.hotel)?;
        let month = month_from_name(&self.arrival_date_month)?;
        let arrival =
            NaiveDate::from_ymd_opt(self.arrival_date_year, month, self.arrival_date_day_of_month)?;
        let country = self
            .country
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty() && c != "NULL");

        Some(Booking {
            hotel,
            arrival,
            adr: self.adr,
            adults: self.adults,
            children: self.children,
            babies: self.babies,
            parking_spaces: self.required_car_parking_spaces,
            booking_changes: self.booking_changes,
            special_requests: self.total_of_special_requests,
            country,
            total_nights: self.stays_in_weekend_nights + self.stays_in_week_nights,
        })
    }
}

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("HOTEL_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/hotel_bookings.csv")
}

pub fn parse_bookings<R: Read>(reader: R) -> Result<Vec<Booking>, DataError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut bookings = Vec::new();

    for (line, row) in csv_reader.deserialize::<BookingRow>().enumerate() {
        let row = row?;
        match row.into_booking() {
            Some(booking) => bookings.push(booking),
            None => warn!("skipping record {}: unknown hotel or invalid arrival date", line + 1),
        }
    }

    Ok(bookings)
}

pub async fn load_bookings(path: &Path) -> Result<Dataset, DataError> {
    let bytes = fs::read(path).await.map_err(|source| DataError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let bookings = parse_bookings(bytes.as_slice())?;
    let dataset = Dataset::new(bookings);
    info!(
        "loaded {} reservations spanning {:?} from {}",
        dataset.bookings.len(),
        dataset.years,
        path.display()
    );
    Ok(dataset)
}
