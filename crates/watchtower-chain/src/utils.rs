use alloy::primitives::{
    U256, keccak256,
    utils::{format_units, parse_units},
};

/// Keccak256 of pre-packed ABI bytes (strings/bytesN should already be packed).
pub fn keccak256_encode_packed(parts: &[&[u8]]) -> [u8; 32] {
    let total_len = parts.iter().map(|part| part.len()).sum();
    let mut packed = Vec::with_capacity(total_len);
    for part in parts {
        packed.extend_from_slice(part);
    }

    let hash = keccak256(packed);
    let mut out = [0u8; 32];
    out.copy_from_slice(hash.as_ref());
    out
}

/// Parse a decimal gwei amount (e.g. "1.5") into wei.
pub fn parse_gwei_to_wei(amount: &str) -> Result<U256, String> {
    let parsed = parse_units(amount.trim(), "gwei").map_err(|e| e.to_string())?;
    if parsed.is_negative() {
        return Err(format!("'{}' is negative", amount));
    }
    Ok(parsed.get_absolute())
}

pub fn format_wei_as_gwei(wei: U256) -> String {
    format_units(wei, "gwei").unwrap_or_else(|_| wei.to_string())
}

pub fn format_wei_as_eth(wei: U256) -> String {
    format_units(wei, "ether").unwrap_or_else(|_| wei.to_string())
}
