//! Random invite token generation.
//!
//! Tokens are drawn from the operating system CSPRNG and checked against the
//! set of tokens already in use. The draw covers exactly `byte_width` bytes,
//! so every value in `0..2^(8 * byte_width)` is equally likely and no modulo
//! reduction is involved.

use rand::{rngs::OsRng, CryptoRng, RngCore};
use std::collections::HashSet;

/// Byte width used for invite tokens (40 bits, eight display characters).
pub const INVITE_TOKEN_BYTES: usize = 5;

/// Generates a token that is not present in `existing`.
///
/// # Panics
/// Panics if `byte_width` is not in `1..=8`.
///
/// # Example
/// ```
/// use shared::token::{generate_token, INVITE_TOKEN_BYTES};
/// use std::collections::HashSet;
///
/// let existing = HashSet::from([1, 2, 3]);
/// let token = generate_token(&existing, INVITE_TOKEN_BYTES);
/// assert!(!existing.contains(&token));
/// assert!(token < 1 << 40);
/// ```
pub fn generate_token(existing: &HashSet<u64>, byte_width: usize) -> u64 {
    generate_token_with(&mut OsRng, existing, byte_width)
}

/// Generates a token using the supplied cryptographically secure RNG.
///
/// Rejection sampling: a draw that collides with `existing` is thrown away
/// and a fresh one taken. The loop only fails to terminate if `existing`
/// covers the whole token space.
pub fn generate_token_with<R>(rng: &mut R, existing: &HashSet<u64>, byte_width: usize) -> u64
where
    R: RngCore + CryptoRng + ?Sized,
{
    assert!(
        (1..=8).contains(&byte_width),
        "token byte width must be between 1 and 8, got {}",
        byte_width
    );

    let mut buf = [0u8; 8];
    loop {
        // Fill only the low-order bytes of a big-endian u64.
        rng.fill_bytes(&mut buf[8 - byte_width..]);
        let candidate = u64::from_be_bytes(buf);
        if !existing.contains(&candidate) {
            return candidate;
        }
    }
}
