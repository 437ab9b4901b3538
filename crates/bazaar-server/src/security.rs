// SPDX-License-Identifier: Apache-2.0

//! Anti-forgery tokens for the mutating POST actions. A token is an HMAC of
//! the acting user, the action path, and an issue timestamp; verification
//! recomputes the signature and bounds the timestamp skew.

use bazaar_model::UserId;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt::{Display, Formatter};

pub const ANTI_FORGERY_HEADER: &str = "x-anti-forgery-token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AntiForgeryError {
    Missing,
    Malformed,
    Expired,
    BadSignature,
}

impl Display for AntiForgeryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => f.write_str("token missing"),
            Self::Malformed => f.write_str("token malformed"),
            Self::Expired => f.write_str("token timestamp outside allowed skew"),
            Self::BadSignature => f.write_str("token signature mismatch"),
        }
    }
}

impl std::error::Error for AntiForgeryError {}

fn signature(secret: &str, user: UserId, action: &str, ts: i64) -> Option<String> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).ok()?;
    let payload = format!("{}\n{action}\n{ts}\n", user.as_i64());
    mac.update(payload.as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Issues a token bound to `user` and `action` at `now_unix`.
#[must_use]
pub fn issue_token(secret: &str, user: UserId, action: &str, now_unix: i64) -> String {
    let sig = signature(secret, user, action, now_unix).unwrap_or_default();
    format!("{now_unix}.{sig}")
}

/// Verifies a token previously issued by [`issue_token`] for the same user
/// and action, rejecting stale timestamps.
pub fn verify_token(
    secret: &str,
    user: UserId,
    action: &str,
    token: Option<&str>,
    now_unix: i64,
    max_skew_secs: u64,
) -> Result<(), AntiForgeryError> {
    let raw = token.ok_or(AntiForgeryError::Missing)?;
    let (ts_raw, sig) = raw.split_once('.').ok_or(AntiForgeryError::Malformed)?;
    let ts = ts_raw
        .parse::<i64>()
        .map_err(|_| AntiForgeryError::Malformed)?;
    if now_unix.abs_diff(ts) > max_skew_secs {
        return Err(AntiForgeryError::Expired);
    }
    if signature(secret, user, action, ts).as_deref() != Some(sig) {
        return Err(AntiForgeryError::BadSignature);
    }
    Ok(())
}
