//! Loan snapshots, interest rates and health ratios written by the indexers.

use std::str::FromStr;

use actix_web::{get, web, Responder};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    configuration::{AppState, State},
    error::Error,
    model::Loan_State,
    types::{LoanStateFilter, ProtocolId},
};

// =============================================================================
// Loan data by wallet
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoanDataQuery {
    protocol_name: String,
    wallet_id: String,
    start_block: Option<i64>,
    end_block: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LoanDataResponse {
    pub wallet_id: String,
    pub protocol_name: String,
    pub collateral: Map<String, Value>,
    pub debt: Map<String, Value>,
    pub deposit: Map<String, Value>,
}

fn as_map(value: Option<Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// `None` when the row holds no collateral, debt or deposit.
pub fn loan_data_response(
    wallet_id: &str,
    protocol: ProtocolId,
    row: Loan_State,
) -> Option<LoanDataResponse> {
    let collateral = as_map(row.collateral);
    let debt = as_map(row.debt);
    let deposit = as_map(row.deposit);

    if collateral.is_empty() && debt.is_empty() && deposit.is_empty() {
        return None;
    }

    Some(LoanDataResponse {
        wallet_id: wallet_id.to_owned(),
        protocol_name: protocol.to_string(),
        collateral,
        debt,
        deposit,
    })
}

#[get("/loan_data_by_wallet_id")]
pub async fn loan_data_by_wallet_id(
    state: web::Data<AppState<State>>,
    query: web::Query<LoanDataQuery>,
) -> Result<impl Responder, Error> {
    let protocol = ProtocolId::from_str(&query.protocol_name)?;

    let row = state
        .database
        .loan_state
        .get_by_wallet(
            protocol.as_str(),
            &query.wallet_id,
            query.start_block,
            query.end_block,
        )
        .await?;

    row.and_then(|row| loan_data_response(&query.wallet_id, protocol, row))
        .map(web::Json)
        .ok_or_else(|| {
            Error::NotFound(format!(
                "No data found for wallet ID '{}' in protocol '{}'.",
                query.wallet_id, query.protocol_name
            ))
        })
}

// =============================================================================
// Loan states
// =============================================================================

#[get("/loan_states")]
pub async fn loan_states(
    state: web::Data<AppState<State>>,
    query: web::Query<LoanStateFilter>,
) -> Result<impl Responder, Error> {
    let rows = state.database.loan_state.get_filtered(&query).await?;

    if rows.is_empty() {
        return Err(Error::NotFound(String::from("Loan states not found")));
    }

    Ok(web::Json(rows))
}

// =============================================================================
// Interest rate
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct InterestRateQuery {
    protocol: Option<String>,
}

fn required_protocol(value: Option<&str>) -> Result<ProtocolId, Error> {
    match value.map(str::trim).filter(|item| !item.is_empty()) {
        Some(value) => ProtocolId::from_str(value),
        None => Err(Error::MissingParams(String::from("Protocol ID is required"))),
    }
}

#[get("/interest-rate")]
pub async fn interest_rate(
    state: web::Data<AppState<State>>,
    query: web::Query<InterestRateQuery>,
) -> Result<impl Responder, Error> {
    let protocol = required_protocol(query.protocol.as_deref())?;

    let row = state
        .database
        .interest_rate
        .get_latest(protocol.as_str())
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!("No interest rate for protocol '{}'", protocol))
        })?;

    Ok(web::Json(row))
}

// =============================================================================
// Health ratio
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct HealthRatioQuery {
    user_id: Option<String>,
}

#[get("/health-ratio-per-user/{protocol}")]
pub async fn health_ratio_per_user(
    state: web::Data<AppState<State>>,
    path: web::Path<String>,
    query: web::Query<HealthRatioQuery>,
) -> Result<impl Responder, Error> {
    let protocol = required_protocol(Some(path.as_str()))?;
    let user_id = query
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .ok_or_else(|| Error::MissingParams(String::from("User ID is required")))?;

    let row = state
        .database
        .health_ratio_level
        .get_latest(protocol.as_str(), user_id)
        .await?
        .ok_or_else(|| {
            Error::NotFound(String::from(
                "Health ratio with user ID provided not found",
            ))
        })?;

    Ok(web::Json(row.value))
}
