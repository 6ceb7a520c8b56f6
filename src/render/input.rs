//! Hex string input

use crate::protocol::Result;

/// Decode a user-supplied hex dump into bytes.
///
/// Accepts an optional leading `0x`, whitespace anywhere, `:` separators and
/// either letter case: `"0x7e 00:05"` decodes to `[0x7E, 0x00, 0x05]`.
pub fn decode_hex_input(input: &str) -> Result<Vec<u8>> {
    let trimmed = input.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let digits: String = body
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();

    Ok(hex::decode(digits)?)
}
