use crate::errors::AppError;
use crate::models::{
    month_name, month_short, CountriesResponse, HotelType, Metric, MonthResponse, OptionEntry,
    OptionsResponse, Selection, StaysResponse, YearResponse, MONTH_NAMES,
};
use crate::state::AppState;
use crate::stats::{month_stats, year_stats, Scope};
use crate::ui::render_index;
use crate::wrangling::{country_counts, month_data, stay_lengths, year_data};
use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use tracing::debug;

pub async fn index() -> Html<String> {
    let defaults = Selection::default();
    Html(render_index(&defaults))
}

pub async fn get_options(State(state): State<AppState>) -> Json<OptionsResponse> {
    let defaults = Selection::default();
    Json(OptionsResponse {
        metrics: Metric::ALL
            .iter()
            .map(|metric| OptionEntry {
                label: metric.label().to_string(),
                value: *metric,
            })
            .collect(),
        years: state.data.years.clone(),
        months: MONTH_NAMES
            .iter()
            .zip(1u32..)
            .map(|(name, value)| OptionEntry {
                label: name.to_string(),
                value,
            })
            .collect(),
        hotels: HotelType::ALL
            .iter()
            .map(|hotel| OptionEntry {
                label: hotel.label().to_string(),
                value: *hotel,
            })
            .collect(),
        default_year: defaults.year,
        default_month: defaults.month,
    })
}

pub async fn get_year(
    State(state): State<AppState>,
    Query(selection): Query<Selection>,
) -> Result<Json<YearResponse>, AppError> {
    debug!(?selection, "year view");
    let table = year_data(&state.data, selection.hotel, selection.metric, selection.year);

    Ok(Json(YearResponse {
        title: format!("{} for {}", selection.metric.label(), selection.year),
        metric: selection.metric,
        stats_current: year_stats(&table, Scope::Current),
        stats_all: year_stats(&table, Scope::AllTime),
        table,
    }))
}

pub async fn get_month(
    State(state): State<AppState>,
    Query(selection): Query<Selection>,
) -> Result<Json<MonthResponse>, AppError> {
    let month = checked_month(&selection)?;
    debug!(?selection, "month view");
    let table = month_data(
        &state.data,
        selection.hotel,
        selection.metric,
        selection.year,
        month,
    );

    Ok(Json(MonthResponse {
        title: format!(
            "{} for {} {}",
            selection.metric.label(),
            month_name(month),
            selection.year
        ),
        metric: selection.metric,
        stats_current: month_stats(&table, Scope::Current),
        stats_all: month_stats(&table, Scope::AllTime),
        table,
    }))
}

pub async fn get_countries(
    State(state): State<AppState>,
    Query(selection): Query<Selection>,
) -> Result<Json<CountriesResponse>, AppError> {
    let month = checked_month(&selection)?;
    let countries = country_counts(&state.data, selection.hotel, selection.year, month);

    Ok(Json(CountriesResponse {
        title: format!("Countries of origin {} {}", month_short(month), selection.year),
        countries,
    }))
}

pub async fn get_stays(
    State(state): State<AppState>,
    Query(selection): Query<Selection>,
) -> Result<Json<StaysResponse>, AppError> {
    let month = checked_month(&selection)?;
    let stays = stay_lengths(&state.data, selection.hotel, selection.year, month);

    Ok(Json(StaysResponse {
        title: format!("Lengths of Stay {} {}", month_short(month), selection.year),
        stays,
    }))
}

fn checked_month(selection: &Selection) -> Result<u32, AppError> {
    if (1..=12).contains(&selection.month) {
        Ok(selection.month)
    } else {
        Err(AppError::bad_request("month must be between 1 and 12"))
    }
}
