use std::future::Future;

use actix_web::HttpRequest;
use bigdecimal::{num_bigint::BigInt, BigDecimal};
use moka::future::Cache;

use crate::error::Error;

pub fn parse_tuple_string(data: String) -> Vec<String> {
    let Some(str) = data.trim().get(1..) else {
        return Vec::new();
    };
    let splited = str.split(",(");
    let mut items: Vec<String> = Vec::new();

    for c in splited {
        if let Some(index) = c.find(')') {
            let tuple_data = &c[0..index];
            items.push(tuple_data.to_owned());
        }
    }

    items
}

/// First `x-forwarded-for` entry, otherwise the peer address.
pub fn get_client_ip(req: &HttpRequest) -> Option<String> {
    if let Some(value) = req.headers().get("x-forwarded-for") {
        if let Ok(value) = value.to_str() {
            if let Some(ip) = value.split(',').next() {
                let ip = ip.trim();
                if !ip.is_empty() {
                    return Some(ip.to_owned());
                }
            }
        }
    }

    req.peer_addr().map(|addr| addr.ip().to_string())
}

/// Runs `fetch_fn` only when `key` is missing, concurrent callers share one fetch.
pub async fn cached_fetch<T, F, Fut>(
    cache: &Cache<String, T>,
    key: &str,
    fetch_fn: F,
) -> Result<T, Error>
where
    T: Clone + Send + Sync + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    cache
        .try_get_with_by_ref(key, fetch_fn())
        .await
        .map_err(|e| Error::TaskError(e.to_string()))
}

pub fn hex_to_decimal(value: &str) -> Result<BigDecimal, Error> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    // `parse_bytes` also takes a sign and underscores.
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::Rpc(format!("Invalid felt {}", value)));
    }

    BigInt::parse_bytes(digits.as_bytes(), 16)
        .map(BigDecimal::from)
        .ok_or_else(|| Error::Rpc(format!("Invalid felt {}", value)))
}

pub fn two_pow_128() -> BigDecimal {
    let two_pow_64 = BigDecimal::from(u64::MAX) + BigDecimal::from(1);
    &two_pow_64 * &two_pow_64
}

pub fn pow10(exponent: u32) -> BigDecimal {
    let ten = BigDecimal::from(10);
    (0..exponent).fold(BigDecimal::from(1), |acc, _| acc * &ten)
}

pub fn u256_to_decimal(low: &str, high: &str) -> Result<BigDecimal, Error> {
    let low = hex_to_decimal(low)?;
    let high = hex_to_decimal(high)?;
    Ok(low + high * two_pow_128())
}

pub fn calculate_difference(a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
    (a - b).abs()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use actix_web::test::TestRequest;
    use bigdecimal::Zero;

    use super::*;

    #[test]
    fn test_parse_tuple_string() {
        let items = parse_tuple_string(String::from("(ETH,USDC),(wBTC,USDC)"));
        assert_eq!(items, vec!["ETH,USDC", "wBTC,USDC"]);
        assert!(parse_tuple_string(String::new()).is_empty());
    }

    #[test]
    fn test_get_client_ip_prefers_forwarded_header() {
        let req = TestRequest::default()
            .insert_header(("x-forwarded-for", "203.0.113.7, 10.0.0.1"))
            .to_http_request();
        assert_eq!(get_client_ip(&req).as_deref(), Some("203.0.113.7"));

        let req = TestRequest::default()
            .peer_addr("192.168.1.5:4000".parse().unwrap())
            .to_http_request();
        assert_eq!(get_client_ip(&req).as_deref(), Some("192.168.1.5"));
    }

    #[test]
    fn test_hex_to_decimal() {
        assert_eq!(hex_to_decimal("0x0").unwrap(), BigDecimal::zero());
        assert_eq!(hex_to_decimal("0xff").unwrap(), BigDecimal::from(255));
        assert_eq!(
            hex_to_decimal("0xDE0B6B3A7640000").unwrap(),
            BigDecimal::from(1_000_000_000_000_000_000_u64)
        );
        assert!(hex_to_decimal("0xzz").is_err());
        assert!(hex_to_decimal("0x").is_err());
        assert!(hex_to_decimal("0x-1").is_err());
    }

    #[test]
    fn test_u256_to_decimal() {
        let value = u256_to_decimal("0x5", "0x1").unwrap();
        let expected = BigDecimal::from_str("340282366920938463463374607431768211461").unwrap();
        assert_eq!(value, expected);
    }

    #[tokio::test]
    async fn test_cached_fetch_miss_then_hit() {
        let cache: Cache<String, u64> = Cache::new(16);

        let value = cached_fetch(&cache, "decimals", || async { Ok(18) }).await;
        assert_eq!(value.unwrap(), 18);

        let value = cached_fetch(&cache, "decimals", || async {
            Err(Error::Rpc(String::from("should not be called")))
        })
        .await;
        assert_eq!(value.unwrap(), 18);

        let value = cached_fetch(&cache, "missing", || async {
            Err(Error::Rpc(String::from("node down")))
        })
        .await;
        assert!(value.is_err());
    }

    #[test]
    fn test_pow10() {
        assert_eq!(pow10(0), BigDecimal::from(1));
        assert_eq!(pow10(6), BigDecimal::from(1_000_000));
        assert_eq!(pow10(20), BigDecimal::from_str("1e20").unwrap());
    }

    #[test]
    fn test_calculate_difference() {
        let a = BigDecimal::from_str("1.25").unwrap();
        let b = BigDecimal::from_str("1.5").unwrap();
        assert_eq!(calculate_difference(&a, &b), BigDecimal::from_str("0.25").unwrap());
    }
}
