use chrono::{Month, NaiveDate};
use serde::{Deserialize, Serialize};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const MONTH_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Short label for a 1-based month, `"?"` when out of range.
pub fn month_short(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_SHORT.get(idx as usize))
        .copied()
        .unwrap_or("?")
}

pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .copied()
        .unwrap_or("?")
}

pub fn month_from_name(name: &str) -> Option<u32> {
    name.trim()
        .parse::<Month>()
        .ok()
        .map(|month| month.number_from_month())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotelKind {
    Resort,
    City,
}

impl HotelKind {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Resort Hotel" => Some(Self::Resort),
            "City Hotel" => Some(Self::City),
            _ => None,
        }
    }
}

/// Hotel filter picked in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HotelType {
    #[default]
    All,
    Resort,
    City,
}

impl HotelType {
    pub const ALL: [HotelType; 3] = [HotelType::All, HotelType::Resort, HotelType::City];

    pub fn matches(self, booking: &Booking) -> bool {
        match self {
            HotelType::All => true,
            HotelType::Resort => booking.hotel == HotelKind::Resort,
            HotelType::City => booking.hotel == HotelKind::City,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HotelType::All => "All Hotels",
            HotelType::Resort => "Resort Hotel",
            HotelType::City => "City Hotel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Metric {
    #[default]
    Reservations,
    #[serde(rename = "Average daily rate")]
    AverageDailyRate,
    Adults,
    Children,
    Babies,
    #[serde(rename = "Required parking spaces")]
    ParkingSpaces,
    #[serde(rename = "Booking changes")]
    BookingChanges,
    #[serde(rename = "Special requests")]
    SpecialRequests,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::Reservations,
        Metric::AverageDailyRate,
        Metric::Adults,
        Metric::Children,
        Metric::Babies,
        Metric::ParkingSpaces,
        Metric::BookingChanges,
        Metric::SpecialRequests,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Reservations => "Reservations",
            Metric::AverageDailyRate => "Average daily rate",
            Metric::Adults => "Adults",
            Metric::Children => "Children",
            Metric::Babies => "Babies",
            Metric::ParkingSpaces => "Required parking spaces",
            Metric::BookingChanges => "Booking changes",
            Metric::SpecialRequests => "Special requests",
        }
    }

    /// Reservations are counted rather than averaged.
    pub fn is_count(self) -> bool {
        self == Metric::Reservations
    }

    pub fn value(self, booking: &Booking) -> Option<f64> {
        match self {
            Metric::Reservations => None,
            Metric::AverageDailyRate => Some(booking.adr),
            Metric::Adults => Some(f64::from(booking.adults)),
            Metric::Children => booking.children,
            Metric::Babies => Some(f64::from(booking.babies)),
            Metric::ParkingSpaces => Some(f64::from(booking.parking_spaces)),
            Metric::BookingChanges => Some(f64::from(booking.booking_changes)),
            Metric::SpecialRequests => Some(f64::from(booking.special_requests)),
        }
    }
}

/// One reservation record.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub hotel: HotelKind,
    pub arrival: NaiveDate,
    pub adr: f64,
    pub adults: u32,
    pub children: Option<f64>,
    pub babies: u32,
    pub parking_spaces: u32,
    pub booking_changes: u32,
    pub special_requests: u32,
    pub country: Option<String>,
    pub total_nights: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Selection {
    pub hotel: HotelType,
    pub metric: Metric,
    pub year: i32,
    pub month: u32,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            hotel: HotelType::All,
            metric: Metric::Reservations,
            year: 2016,
            month: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesPoint {
    pub key: u32,
    pub label: String,
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn values(&self) -> impl Iterator<Item = (&SeriesPoint, f64)> {
        self.points
            .iter()
            .filter_map(|point| point.value.map(|value| (point, value)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearTable {
    pub year: i32,
    pub average: Series,
    pub current: Series,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthTable {
    pub year: i32,
    pub month: u32,
    pub average: Series,
    pub current: Series,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountryCount {
    pub country: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StayBucket {
    pub nights: u32,
    pub percent: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct YearResponse {
    pub title: String,
    pub metric: Metric,
    pub table: YearTable,
    pub stats_current: String,
    pub stats_all: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MonthResponse {
    pub title: String,
    pub metric: Metric,
    pub table: MonthTable,
    pub stats_current: String,
    pub stats_all: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountriesResponse {
    pub title: String,
    pub countries: Vec<CountryCount>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StaysResponse {
    pub title: String,
    pub stays: Vec<StayBucket>,
}

#[derive(Debug, Serialize)]
pub struct OptionEntry<T> {
    pub label: String,
    pub value: T,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub metrics: Vec<OptionEntry<Metric>>,
    pub years: Vec<i32>,
    pub months: Vec<OptionEntry<u32>>,
    pub hotels: Vec<OptionEntry<HotelType>>,
    pub default_year: i32,
    pub default_month: u32,
}
