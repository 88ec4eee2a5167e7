use bigdecimal::BigDecimal;

use crate::{error::Error, helpers::pow10};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSettings {
    pub symbol: &'static str,
    pub decimals: u32,
    pub address: &'static str,
}

impl TokenSettings {
    pub fn decimal_factor(&self) -> BigDecimal {
        pow10(self.decimals)
    }
}

pub const TOKEN_SETTINGS: [TokenSettings; 10] = [
    TokenSettings {
        symbol: "ETH",
        decimals: 18,
        address: "0x049d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7",
    },
    TokenSettings {
        symbol: "wBTC",
        decimals: 8,
        address: "0x03fe2b97c1fd336e750087d68b9b867997fd64a2661ff3ca5a7c771641e8e7ac",
    },
    TokenSettings {
        symbol: "USDC",
        decimals: 6,
        address: "0x053c91253bc9682c04929ca02ed00b3e423f6710d2ee7e0d5ebb06f3ecf368a8",
    },
    TokenSettings {
        symbol: "DAI",
        decimals: 18,
        address: "0x00da114221cb83fa859dbdb4c44beeaa0bb37c7537ad5ae66fe5e0efd20e6eb3",
    },
    TokenSettings {
        symbol: "USDT",
        decimals: 6,
        address: "0x068f5c6a61780768455de69077e07e89787839bf8166decfbf92b645209c0fb8",
    },
    TokenSettings {
        symbol: "wstETH",
        decimals: 18,
        address: "0x042b8f0484674ca266ac5d08e4ac6a3fe65bd3129795def2dca5c34ecc5f96d2",
    },
    TokenSettings {
        symbol: "LORDS",
        decimals: 18,
        address: "0x0124aeb495b947201f5fac96fd1138e326ad86195b98df6dec9009158a533b49",
    },
    TokenSettings {
        symbol: "STRK",
        decimals: 18,
        address: "0x04718f5a0fc34cc1af16a1cdee98ffb20c31f5cd61d6ab07201858f4287c938d",
    },
    TokenSettings {
        symbol: "UNO",
        decimals: 18,
        address: "0x0719b5092403233201aa822ce928bd4b551d0cdb071a724edd7dc5e5f57b7f34",
    },
    TokenSettings {
        symbol: "ZEND",
        decimals: 18,
        address: "0x00585c32b625999e6e5e78645ff8df7a9001cf5cf3eb6b80ccdd16cb64bd3a34",
    },
];

/// Lowercase hex without the `0x` prefix and leading zeros.
pub fn normalize_address(address: &str) -> String {
    let value = address.trim();
    let value = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    let value = value.trim_start_matches('0').to_lowercase();

    if value.is_empty() {
        return String::from("0");
    }

    value
}

/// `0x` prefixed address without leading zeros.
pub fn clean_address(address: &str) -> String {
    format!("0x{}", normalize_address(address))
}

pub fn find_by_address(address: &str) -> Option<&'static TokenSettings> {
    let address = normalize_address(address);
    TOKEN_SETTINGS
        .iter()
        .find(|token| normalize_address(token.address) == address)
}

pub fn find_by_symbol(symbol: &str) -> Option<&'static TokenSettings> {
    TOKEN_SETTINGS.iter().find(|token| token.symbol == symbol)
}

/// Resolves either a symbol or an address.
pub fn find_token(token: &str) -> Option<&'static TokenSettings> {
    find_by_symbol(token).or_else(|| find_by_address(token))
}

pub fn get_symbol(address: &str) -> Result<&'static str, Error> {
    find_by_address(address)
        .map(|token| token.symbol)
        .ok_or_else(|| {
            Error::UnknownToken(format!(
                "Address = {} does not exist in the symbol table.",
                address
            ))
        })
}

pub fn get_decimals(token: &str) -> Option<u32> {
    find_token(token).map(|item| item.decimals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_address() {
        assert_eq!(
            normalize_address("0x004718F5a0fc34cc1af16a1cdee98ffb20c31f5cd61d6ab07201858f4287c938d"),
            "4718f5a0fc34cc1af16a1cdee98ffb20c31f5cd61d6ab07201858f4287c938d"
        );
        assert_eq!(normalize_address("0x0000"), "0");
        assert_eq!(clean_address("0x0abc"), "0xabc");
    }

    #[test]
    fn test_get_symbol_ignores_leading_zeros() {
        let symbol = get_symbol(
            "0x49d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7",
        );
        assert_eq!(symbol.ok(), Some("ETH"));
        assert!(get_symbol("0x1234").is_err());
    }

    #[test]
    fn test_find_token() {
        assert_eq!(get_decimals("USDC"), Some(6));
        assert_eq!(
            get_decimals(
                "0x3fe2b97c1fd336e750087d68b9b867997fd64a2661ff3ca5a7c771641e8e7ac"
            ),
            Some(8)
        );
        assert_eq!(get_decimals("XYZ"), None);
        assert_eq!(
            find_by_symbol("wBTC").map(|t| t.decimal_factor()),
            Some(BigDecimal::from(100_000_000))
        );
    }
}
