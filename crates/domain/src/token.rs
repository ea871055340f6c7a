//! Cooldown tokens for anonymous clients.
//!
//! A token is `base64(json) "." segment`. Tokens the server issues carry an
//! HMAC-SHA256 of the payload in the second segment and decode as
//! [`Token::Signed`]. Anything else that still decodes (a client's very first
//! self-minted token, or a tampered one) is [`Token::Unsigned`].
//!
//! Unsigned timestamps are honoured as-is. A client can therefore always
//! drop back to a fresh `lastTs: 0` token and skip one cooldown; the
//! signature only stops it from back-dating a token the server issued.

use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const DELIMITER: char = '.';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooldown {
    #[serde(rename = "lastTs", default)]
    pub last_action: i64,
    #[serde(rename = "min", default)]
    pub min_interval: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Unsigned(Cooldown),
    Signed(Cooldown),
}

impl Token {
    pub fn cooldown(&self) -> &Cooldown {
        match self {
            Token::Unsigned(c) | Token::Signed(c) => c,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, Token::Signed(_))
    }
}

#[derive(Clone)]
pub struct TokenCodec {
    secret: Vec<u8>,
}

impl TokenCodec {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    /// Returns `None` for anything that is not a readable token.
    pub fn decode(&self, raw: &str) -> Option<Token> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let (payload, signature) = match raw.split_once(DELIMITER) {
            Some((p, s)) => (p, Some(s)),
            None => (raw, None),
        };

        let bytes = STANDARD.decode(payload).ok()?;
        let cooldown: Cooldown = serde_json::from_slice(&bytes).ok()?;

        match signature {
            Some(sig) if self.verify(payload, sig) => Some(Token::Signed(cooldown)),
            _ => Some(Token::Unsigned(cooldown)),
        }
    }

    /// Seconds left before `raw` may act again, 0 when free.
    /// Undecodable tokens are never throttled.
    pub fn remaining(&self, now: i64, raw: &str, min_interval: i64) -> i64 {
        match self.decode(raw) {
            Some(token) => token
                .cooldown()
                .last_action
                .saturating_add(min_interval)
                .saturating_sub(now)
                .max(0),
            None => 0,
        }
    }

    pub fn is_cooling_down(&self, now: i64, raw: &str, min_interval: i64) -> bool {
        self.remaining(now, raw, min_interval) > 0
    }

    pub fn issue(&self, now: i64, min_interval: i64, nonce: Option<String>) -> String {
        let cooldown = Cooldown {
            last_action: now,
            min_interval,
            nonce: Some(nonce.unwrap_or_else(fresh_nonce)),
        };
        let json = serde_json::to_vec(&cooldown).expect("Cooldown payload always serializes");
        let payload = STANDARD.encode(json);
        let signature = self.sign(&payload);
        format!("{}{}{}", payload, DELIMITER, signature)
    }

    /// Issues a new token for the client that presented `presented`,
    /// keeping its nonce so the client stays distinguishable.
    pub fn reissue(&self, now: i64, min_interval: i64, presented: &str) -> String {
        let nonce = self
            .decode(presented)
            .and_then(|t| t.cooldown().nonce.clone())
            .filter(|n| !n.is_empty());
        self.issue(now, min_interval, nonce)
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length")
    }

    fn sign(&self, payload: &str) -> String {
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn verify(&self, payload: &str, signature: &str) -> bool {
        let Ok(expected) = hex::decode(signature) else {
            return false;
        };
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }
}

/// One-way fingerprint stored by the vote ledger in place of the token.
/// Hashes the token exactly as presented, whitespace included.
pub fn fingerprint(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn fresh_nonce() -> String {
    format!("{:x}", rand::random::<u128>())
}
