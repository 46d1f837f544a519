use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use avalanche_core::avalanche::{self, RawSimulationInput, SimulationInput};
use avalanche_core::calendar::MonthStamp;
use avalanche_core::export::schedule_to_csv;
use avalanche_core::{AvalancheError, ValidationError};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Validation failures keep their kind tag so the form can react to it.
fn validation_error(e: ValidationError) -> napi::Error {
    napi::Error::from_reason(format!("{}: {}", e.kind(), e))
}

fn avalanche_error(e: AvalancheError) -> napi::Error {
    match e {
        AvalancheError::Validation(v) => validation_error(v),
        other => to_napi_error(other),
    }
}

/// Form payload: the raw numeric fields plus an optional first month.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FormPayload {
    #[serde(flatten)]
    input: RawSimulationInput,
    #[serde(default)]
    start: Option<MonthStamp>,
}

fn parse_payload(input_json: &str) -> NapiResult<(SimulationInput, MonthStamp)> {
    let payload: FormPayload = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let input = avalanche::validate_raw(&payload.input).map_err(validation_error)?;
    Ok((input, payload.start.unwrap_or_else(MonthStamp::current)))
}

// ---------------------------------------------------------------------------
// Avalanche
// ---------------------------------------------------------------------------

#[napi]
pub fn simulate_avalanche(input_json: String) -> NapiResult<String> {
    let (input, start) = parse_payload(&input_json)?;
    let output = avalanche::run_avalanche_from(&input, start).map_err(avalanche_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn validate_avalanche(input_json: String) -> NapiResult<bool> {
    parse_payload(&input_json)?;
    Ok(true)
}

#[napi]
pub fn avalanche_schedule_csv(input_json: String) -> NapiResult<String> {
    let (input, start) = parse_payload(&input_json)?;
    let output = avalanche::simulate(&input, start).map_err(avalanche_error)?;
    Ok(schedule_to_csv(&output.schedule))
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

#[napi]
pub fn lumpsum_month_index(start: String, month: String) -> NapiResult<i64> {
    let start: MonthStamp = start.parse().map_err(to_napi_error)?;
    let month: MonthStamp = month.parse().map_err(to_napi_error)?;
    Ok(start.index_of(month))
}
