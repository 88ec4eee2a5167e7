//! Database entities, one struct per table.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

// =============================================================================
// LOANS
// =============================================================================

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Loan_State {
    pub id: i64,
    pub protocol_id: String,
    pub block: i64,
    pub timestamp: i64,
    pub user: String,
    pub collateral: Option<Value>,
    pub debt: Option<Value>,
    pub deposit: Option<Value>,
}

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Interest_Rate {
    pub id: i64,
    pub protocol_id: String,
    pub block: i64,
    pub timestamp: i64,
    pub collateral: Option<Value>,
    pub debt: Option<Value>,
}

// =============================================================================
// VESU
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Deserialize, Serialize)]
pub struct Vesu_Position {
    pub user: String,
    pub pool_id: String,
    pub collateral_asset: String,
    pub debt_asset: String,
    pub block_number: i64,
}

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Health_Ratio_Level {
    pub timestamp: i64,
    pub user_id: String,
    pub value: BigDecimal,
    pub protocol_id: String,
}

// =============================================================================
// NOTIFICATIONS
// =============================================================================

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Notification_Data {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub email: Option<String>,
    pub wallet_id: String,
    pub telegram_id: String,
    pub ip_address: Option<String>,
    pub health_ratio_level: f64,
    pub protocol_id: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct Telegram_Log {
    pub sent_at: DateTime<Utc>,
    pub notification_data_id: Uuid,
    pub is_succesfully: bool,
    pub message: String,
}

// =============================================================================
// ORDER BOOKS
// =============================================================================

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Order_Book {
    pub token_a: String,
    pub token_b: String,
    pub timestamp: i64,
    pub block: Option<i64>,
    pub dex: String,
    pub current_price: Option<BigDecimal>,
    pub asks: Option<Value>,
    pub bids: Option<Value>,
}
