use std::str::FromStr;

use alloy_primitives::{Address, U256};

/// Parse an address from string, with better error messages
pub fn parse_address(s: &str) -> anyhow::Result<Address> {
    Address::from_str(s).map_err(|e| anyhow::anyhow!("Invalid address {}: {}", s, e))
}

/// Format an address for display (truncated)
pub fn format_address(address: &Address) -> String {
    let s = address.to_string();
    format!("{}...{}", &s[..6], &s[s.len() - 4..])
}

/// Render a smallest-unit amount as a decimal string without going through
/// floating point. Trailing zeros in the fraction are trimmed.
pub fn format_units(amount: U256, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }
    let base = U256::from(10u8).pow(U256::from(decimals));
    let whole = amount / base;
    let frac = amount % base;
    if frac.is_zero() {
        return whole.to_string();
    }
    let frac_str = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    format!("{}.{}", whole, frac_str.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_address_accepts_hex_and_rejects_garbage() {
        assert!(parse_address("0x2e3A2fb8473316A02b8A297B982498E661E1f6f5").is_ok());
        assert!(parse_address("not-an-address").is_err());
    }

    #[test]
    fn format_address_truncates() {
        let address = parse_address("0x2e3A2fb8473316A02b8A297B982498E661E1f6f5").unwrap();
        let formatted = format_address(&address);
        assert!(formatted.starts_with("0x2e3A"));
        assert!(formatted.ends_with("f6f5"));
        assert!(formatted.contains("..."));
    }

    #[test]
    fn format_units_is_integer_exact() {
        assert_eq!(format_units(U256::ZERO, 18), "0");
        assert_eq!(
            format_units(U256::from(1_000_000_000_000_000_000u64), 18),
            "1"
        );
        assert_eq!(
            format_units(U256::from(1_500_000_000_000_000_000u64), 18),
            "1.5"
        );
        assert_eq!(format_units(U256::from(1u64), 18), "0.000000000000000001");
        assert_eq!(format_units(U256::from(2_500_000u64), 6), "2.5");
        assert_eq!(format_units(U256::from(1_234_567u64), 6), "1.234567");
        assert_eq!(format_units(U256::from(42u64), 0), "42");
    }
}
