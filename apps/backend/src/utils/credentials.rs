//! Game codes and bearer secrets.
//!
//! Both are drawn from the OS RNG: they are the only thing standing between
//! a guesser and a player's (or admin's) privileges.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::{SeedableRng, TryRngCore};
use rand_chacha::ChaCha20Rng;

use crate::errors::domain::{DomainError, InfraErrorKind};

const CROCKFORD: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ"; // no I, L, O, U
const GAME_CODE_LEN: usize = 10;
const SECRET_BYTES: usize = 32;

fn os_bytes<const N: usize>() -> Result<[u8; N], DomainError> {
    let mut buf = [0u8; N];
    OsRng.try_fill_bytes(&mut buf).map_err(|e| {
        DomainError::infra(
            InfraErrorKind::Other("Rng".into()),
            format!("OS random source unavailable: {e}"),
        )
    })?;
    Ok(buf)
}

/// 10-character Crockford Base32 game identifier.
///
/// The alphabet has exactly 32 symbols, so masking each byte to 5 bits
/// keeps every symbol equally likely.
pub fn generate_game_code() -> Result<String, DomainError> {
    let bytes = os_bytes::<GAME_CODE_LEN>()?;
    Ok(bytes
        .iter()
        .map(|b| CROCKFORD[(b & 0x1f) as usize] as char)
        .collect())
}

/// 256-bit bearer secret, base64url without padding (43 chars).
pub fn generate_secret() -> Result<String, DomainError> {
    let bytes = os_bytes::<SECRET_BYTES>()?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Game-logic RNG (ring shuffle, task draws) seeded from the OS.
pub fn game_rng() -> Result<ChaCha20Rng, DomainError> {
    ChaCha20Rng::try_from_os_rng().map_err(|e| {
        DomainError::infra(
            InfraErrorKind::Other("Rng".into()),
            format!("OS random source unavailable: {e}"),
        )
    })
}
