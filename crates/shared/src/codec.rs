//! Reversible text encoding for invite tokens.
//!
//! Tokens are integers; what people pass around is their Crockford base32
//! form, which drops the letters that are easily confused with digits
//! (I, L, O) as well as U. The display form pads the encoding to the width
//! of a 40-bit token and inserts a separator so codes read as `XXXX-XXXX`.

use thiserror::Error;

/// Crockford base32 alphabet, in digit order.
const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Bits carried by a single encoded character.
const BITS_PER_CHAR: u32 = 5;

/// Width (in characters) every display code is padded to.
pub const DISPLAY_WIDTH: usize = 8;

/// Position of the separator in a display code.
const SEPARATOR_OFFSET: usize = 4;

/// Separator inserted into display codes.
pub const SEPARATOR: char = '-';

/// Error type for codec operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenCodecError {
    #[error("Invalid code format: {0}")]
    InvalidCodeFormat(String),
}

/// Encodes a token as minimal-length Crockford base32.
///
/// # Example
/// ```
/// use shared::codec::{decode, encode};
///
/// assert_eq!(encode(0), "0");
/// assert_eq!(encode(32), "10");
/// assert_eq!(decode(&encode(1_234_567)).unwrap(), 1_234_567);
/// ```
pub fn encode(token: u64) -> String {
    if token == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::with_capacity(13);
    let mut rest = token;
    while rest > 0 {
        digits.push(ALPHABET[(rest & 0x1f) as usize]);
        rest >>= BITS_PER_CHAR;
    }
    digits.reverse();

    digits.into_iter().map(char::from).collect()
}

/// Decodes a Crockford base32 string back into a token.
///
/// Lower-case input is accepted. Anything outside the alphabet, an empty
/// string, or a value that does not fit in 64 bits is rejected.
pub fn decode(code: &str) -> Result<u64, TokenCodecError> {
    if code.is_empty() {
        return Err(TokenCodecError::InvalidCodeFormat(
            "Code must not be empty".to_string(),
        ));
    }

    code.chars().try_fold(0u64, |acc, c| {
        let digit = digit_value(c).ok_or_else(|| {
            TokenCodecError::InvalidCodeFormat(format!("Unexpected character '{}'", c))
        })?;

        acc.checked_mul(1 << BITS_PER_CHAR)
            .and_then(|shifted| shifted.checked_add(digit))
            .ok_or_else(|| TokenCodecError::InvalidCodeFormat("Code is too long".to_string()))
    })
}

/// Formats a token for display, e.g. `00A1-B2C3`.
pub fn to_display_code(token: u64) -> String {
    let encoded = format!("{:0>width$}", encode(token), width = DISPLAY_WIDTH);
    let (head, tail) = encoded.split_at(SEPARATOR_OFFSET);
    format!("{}{}{}", head, SEPARATOR, tail)
}

/// Parses a display code back into a token.
///
/// Separators and surrounding whitespace are stripped before decoding, so
/// both `00A1-B2C3` and `00a1b2c3` are accepted.
pub fn parse_display_code(display_code: &str) -> Result<u64, TokenCodecError> {
    let stripped: String = display_code
        .trim()
        .chars()
        .filter(|c| *c != SEPARATOR)
        .collect();
    decode(&stripped)
}

fn digit_value(c: char) -> Option<u64> {
    let upper = c.to_ascii_uppercase();
    if !upper.is_ascii() {
        return None;
    }
    ALPHABET
        .iter()
        .position(|&b| b == upper as u8)
        .map(|idx| idx as u64)
}
