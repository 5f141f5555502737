use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ExpiryClaim {
    exp: Option<i64>,
}

/// Reads the `exp` claim of a JWT without checking its signature.
///
/// The token is opaque to this front end; the backend remains the one that
/// validates it. Returns `None` for anything that is not a three-part JWT
/// with a numeric `exp`.
pub fn token_expiry(token: &str) -> Option<i64> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let payload = general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .ok()?;
    let claim: ExpiryClaim = serde_json::from_slice(&payload).ok()?;
    claim.exp
}

/// True only when the token carries an `exp` that is not after `now`.
pub fn is_expired(token: &str, now: i64) -> bool {
    token_expiry(token).map(|exp| exp <= now).unwrap_or(false)
}

#[cfg(test)]
pub(crate) fn jwt_with_exp(exp: i64) -> String {
    let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = general_purpose::URL_SAFE_NO_PAD
        .encode(format!(r#"{{"sub":"admin@bloodbank","exp":{}}}"#, exp).as_bytes());
    format!("{}.{}.signature", header, payload)
}
