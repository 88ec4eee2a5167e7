use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use base64::DecodeError as BASE64_DECODE_ERROR;
use bigdecimal::ParseBigDecimalError as BIG_DECIMAL_ERROR;
use reqwest::Error as REQWEST_ERROR;
use serde_json::Error as JSON_ERROR;
use sqlx::error::Error as SQL_ERROR;
use std::{
    env::VarError, io::Error as IO_ERROR, num::ParseIntError,
    str::ParseBoolError as PARSE_BOOL_ERROR,
};
use teloxide::RequestError as TELEGRAM_ERROR;
use thiserror::Error;
use tokio::task::JoinError;
use tracing_subscriber::util::TryInitError as TRACING_INIT_ERROR;
use url::ParseError as URL_ERROR;
use uuid::Error as UUID_ERROR;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] IO_ERROR),

    #[error("{0}")]
    URL(#[from] URL_ERROR),

    #[error("{0}")]
    INT(#[from] ParseIntError),

    #[error("{0}")]
    SQL(#[from] SQL_ERROR),

    #[error("{0}")]
    VAR(#[from] VarError),

    #[error("{0}")]
    TokioJoinError(#[from] JoinError),

    #[error("{0}")]
    BigDecimalError(#[from] BIG_DECIMAL_ERROR),

    #[error("{0}")]
    JsonError(#[from] JSON_ERROR),

    #[error("{0}")]
    ParseBoolError(#[from] PARSE_BOOL_ERROR),

    #[error("{0}")]
    UuidError(#[from] UUID_ERROR),

    #[error("{0}")]
    Base64DecodeError(#[from] BASE64_DECODE_ERROR),

    #[error("{0}")]
    ReqwestError(#[from] REQWEST_ERROR),

    #[error("Telegram error: {0}")]
    TelegramError(#[from] TELEGRAM_ERROR),

    #[error("Tracing error: {0}")]
    TracingInitError(#[from] TRACING_INIT_ERROR),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Task message error: {0}")]
    TaskError(String),

    #[error("Protocol {name} is not supported, expected one of: {supported}")]
    UnknownProtocol { name: String, supported: String },

    #[error("Dex {name} is not supported, expected one of: {supported}")]
    UnknownDex { name: String, supported: String },

    #[error("Token not supported: {0}")]
    UnknownToken(String),

    #[error("Missing params: {0}")]
    MissingParams(String),

    #[error("{0}")]
    Validation(String),

    #[error("Current {0} is already taken")]
    DuplicateField(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Order book error: {0}")]
    OrderBook(String),

    #[error("Starknet rpc error: {0}")]
    Rpc(String),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::UnknownProtocol { .. }
            | Error::UnknownDex { .. }
            | Error::UnknownToken(_)
            | Error::MissingParams(_)
            | Error::Validation(_)
            | Error::DuplicateField(_)
            | Error::ParseBoolError(_)
            | Error::INT(_)
            | Error::UuidError(_)
            | Error::Base64DecodeError(_)
            | Error::BigDecimalError(_) => StatusCode::BAD_REQUEST,

            Error::NotFound(_) => StatusCode::NOT_FOUND,

            Error::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,

            Error::ReqwestError(_)
            | Error::TelegramError(_)
            | Error::Rpc(_) => StatusCode::BAD_GATEWAY,

            Error::Io(_)
            | Error::URL(_)
            | Error::SQL(_)
            | Error::VAR(_)
            | Error::TokioJoinError(_)
            | Error::JsonError(_)
            | Error::TracingInitError(_)
            | Error::ConfigurationError(_)
            | Error::TaskError(_)
            | Error::OrderBook(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = serde_json::json!({
            "error": status.canonical_reason().unwrap_or("Unknown"),
            "message": self.to_string(),
            "status": status.as_u16(),
        });
        HttpResponse::build(status).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let error = Error::UnknownProtocol {
            name: String::from("Aave"),
            supported: String::from("zkLend, Vesu"),
        };
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error.to_string(),
            "Protocol Aave is not supported, expected one of: zkLend, Vesu"
        );

        let error = Error::NotFound(String::from("missing"));
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);

        let error = Error::RateLimitExceeded;
        assert_eq!(error.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(error.to_string(), "Rate limit exceeded");

        let error = Error::Rpc(String::from("node down"));
        assert_eq!(error.status_code(), StatusCode::BAD_GATEWAY);

        let error = Error::TaskError(String::from("queue closed"));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_duplicate_field_message() {
        let error = Error::DuplicateField(String::from("wallet id"));
        assert_eq!(error.to_string(), "Current wallet id is already taken");
    }
}
