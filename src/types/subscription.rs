use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

use super::ProtocolId;

pub const HEALTH_RATIO_LEVEL_MIN_VALUE: f64 = 0.0;
pub const HEALTH_RATIO_LEVEL_MAX_VALUE: f64 = 10.0;
pub const TELEGRAM_ID_MIN_LENGTH: i32 = 9;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubscription {
    pub email: Option<String>,
    pub wallet_id: Option<String>,
    pub telegram_id: Option<String>,
    pub ip_address: Option<String>,
    pub health_ratio_level: Option<f64>,
    pub protocol_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidSubscription {
    pub email: Option<String>,
    pub wallet_id: String,
    pub telegram_id: Option<String>,
    pub ip_address: String,
    pub health_ratio_level: f64,
    pub protocol_id: ProtocolId,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionCreated {
    pub message: String,
    pub status: u16,
    pub id: String,
    pub telegram_link: String,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .map(|item| item.trim().to_owned())
        .filter(|item| !item.is_empty())
}

impl CreateSubscription {
    /// `client_ip` fills in the address when the form leaves it out.
    pub fn validate(
        &self,
        client_ip: Option<String>,
    ) -> Result<ValidSubscription, Error> {
        let wallet_id = non_empty(&self.wallet_id);
        let ip_address = non_empty(&self.ip_address).or(client_ip);
        let protocol_id = non_empty(&self.protocol_id);

        let (wallet_id, ip_address, protocol_id, health_ratio_level) = match (
            wallet_id,
            ip_address,
            protocol_id,
            self.health_ratio_level,
        ) {
            (Some(w), Some(ip), Some(p), Some(level)) => (w, ip, p, level),
            _ => {
                return Err(Error::MissingParams(String::from(
                    "Please provide all needed data",
                )));
            },
        };

        if !(HEALTH_RATIO_LEVEL_MIN_VALUE..=HEALTH_RATIO_LEVEL_MAX_VALUE)
            .contains(&health_ratio_level)
        {
            return Err(Error::Validation(format!(
                "Your health ratio level must be between {} and {}",
                HEALTH_RATIO_LEVEL_MIN_VALUE, HEALTH_RATIO_LEVEL_MAX_VALUE
            )));
        }

        let protocol_id = ProtocolId::from_str(&protocol_id)?;

        Ok(ValidSubscription {
            email: non_empty(&self.email),
            wallet_id,
            telegram_id: non_empty(&self.telegram_id),
            ip_address,
            health_ratio_level,
            protocol_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateSubscription {
        CreateSubscription {
            email: Some(String::from("user@example.com")),
            wallet_id: Some(String::from("0x0123")),
            telegram_id: None,
            ip_address: None,
            health_ratio_level: Some(1.5),
            protocol_id: Some(String::from("zkLend")),
        }
    }

    #[test]
    fn test_validate_fills_client_ip() {
        let valid = request()
            .validate(Some(String::from("10.0.0.1")))
            .unwrap();
        assert_eq!(valid.ip_address, "10.0.0.1");
        assert_eq!(valid.protocol_id, ProtocolId::ZkLend);
        assert_eq!(valid.telegram_id, None);
    }

    #[test]
    fn test_validate_missing_fields() {
        let mut data = request();
        data.wallet_id = Some(String::from("  "));
        let error = data.validate(Some(String::from("10.0.0.1"))).unwrap_err();
        assert_eq!(error.to_string(), "Missing params: Please provide all needed data");

        let error = request().validate(None).unwrap_err();
        assert!(matches!(error, Error::MissingParams(_)));
    }

    #[test]
    fn test_validate_health_ratio_bounds() {
        let mut data = request();
        data.health_ratio_level = Some(10.5);
        let error = data.validate(Some(String::from("10.0.0.1"))).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Your health ratio level must be between 0 and 10"
        );

        data.health_ratio_level = Some(10.0);
        assert!(data.validate(Some(String::from("10.0.0.1"))).is_ok());
    }

    #[test]
    fn test_validate_unknown_protocol() {
        let mut data = request();
        data.protocol_id = Some(String::from("Aave"));
        let error = data.validate(Some(String::from("10.0.0.1"))).unwrap_err();
        assert!(matches!(error, Error::UnknownProtocol { .. }));
    }
}
