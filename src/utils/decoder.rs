//! Decoding helpers for upstream payloads
//! ABI return values, hex quantities, explorer timestamps and native units

use alloy_primitives::{keccak256, utils::format_ether, U256};
use alloy_sol_types::{sol_data, SolType};
use chrono::{DateTime, Utc};

/// 4-byte selector of a function signature such as `symbol()`
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Decode hex returned by `eth_call` into raw bytes
pub fn decode_hex_data(raw: &str) -> Option<Vec<u8>> {
    let stripped = raw.strip_prefix("0x").unwrap_or(raw);
    hex::decode(stripped).ok()
}

/// Decode a single ABI `string` return value.
///
/// Legacy tokens (e.g. MKR) return `bytes32` instead; a 32-byte payload that is
/// not a valid dynamic string is read as NUL-padded UTF-8.
pub fn decode_string_return(data: &[u8]) -> Option<String> {
    if data.is_empty() {
        return None;
    }

    if let Ok((value,)) = <(sol_data::String,)>::abi_decode_params(data, true) {
        if !value.is_empty() {
            return Some(value);
        }
    }

    if data.len() == 32 {
        let end = data.iter().position(|b| *b == 0).unwrap_or(32);
        if end == 0 {
            return None;
        }
        return std::str::from_utf8(&data[..end]).ok().map(str::to_string);
    }

    None
}

/// Parse a JSON-RPC hex quantity (`0x1bc16d674ec80000`)
pub fn parse_quantity(raw: &str) -> Option<U256> {
    let stripped = raw.strip_prefix("0x")?;
    if stripped.is_empty() {
        return Some(U256::ZERO);
    }
    U256::from_str_radix(stripped, 16).ok()
}

/// Explorer timestamps are unix seconds encoded as decimal strings
pub fn parse_unix_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let secs: i64 = raw.trim().parse().ok()?;
    DateTime::from_timestamp(secs, 0)
}

/// Wei to a decimal native-unit string (`1.5`)
pub fn format_native(wei: U256) -> String {
    format_ether(wei)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::SolValue;

    #[test]
    fn test_symbol_selector() {
        // keccak256("symbol()") = 0x95d89b41...
        assert_eq!(selector("symbol()"), [0x95, 0xd8, 0x9b, 0x41]);
        assert_eq!(selector("name()"), [0x06, 0xfd, 0xde, 0x03]);
    }

    #[test]
    fn test_decode_string_return() {
        let encoded = ("WMON".to_string(),).abi_encode_params();
        assert_eq!(decode_string_return(&encoded).as_deref(), Some("WMON"));
    }

    #[test]
    fn test_decode_bytes32_fallback() {
        let mut raw = [0u8; 32];
        raw[..3].copy_from_slice(b"MKR");
        assert_eq!(decode_string_return(&raw).as_deref(), Some("MKR"));
    }

    #[test]
    fn test_decode_empty_return() {
        assert!(decode_string_return(&[]).is_none());
        assert!(decode_string_return(&[0u8; 32]).is_none());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("0x0"), Some(U256::ZERO));
        assert_eq!(
            parse_quantity("0x1bc16d674ec80000"),
            Some(U256::from(2_000_000_000_000_000_000u128))
        );
        assert!(parse_quantity("1234").is_none());
        assert!(parse_quantity("0xzz").is_none());
    }

    #[test]
    fn test_parse_unix_timestamp() {
        let ts = parse_unix_timestamp("1700000000").unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
        assert!(parse_unix_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_format_native() {
        let wei = U256::from(1_500_000_000_000_000_000u128);
        assert!(format_native(wei).starts_with("1.5"));
    }
}
