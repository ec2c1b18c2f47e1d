// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

//! Request signing

use crate::error::{Result, ShadowserverError};
use hmac::{Hmac, Mac};
use serde::Serialize;
use serde_json::Value;
use sha2::Sha256;

/// Name of the body field carrying the API key.
const API_KEY_FIELD: &str = "apikey";

type HmacSha256 = Hmac<Sha256>;

/// Name of the header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "HMAC2";

/// Computes the lowercase hex HMAC-SHA256 of `data` keyed with `secret`.
pub fn sign(secret: &[u8], data: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(data);
    hex::encode(mac.finalize().into_bytes())
}

/// The exact bytes of a request body together with their signature.
#[derive(Debug, Clone)]
pub struct SignedBody {
    /// JSON body as sent over the wire.
    pub bytes: Vec<u8>,
    /// Hex encoded HMAC-SHA256 of `bytes`.
    pub signature: String,
}

impl SignedBody {
    /// Injects `api_key` as `apikey` into `payload`, serializes it and signs the result.
    ///
    /// An `apikey` already present in `payload` is replaced in place, other
    /// fields keep their order and the key is appended last otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ShadowserverError::InvalidParameter`] if `payload` does not
    /// serialize as a JSON object.
    pub fn new<P: Serialize + ?Sized>(payload: &P, api_key: &str, secret: &[u8]) -> Result<Self> {
        let Value::Object(mut body) = serde_json::to_value(payload)? else {
            return Err(ShadowserverError::InvalidParameter(
                "request payload must serialize as a JSON object".into(),
            ));
        };
        body.insert(API_KEY_FIELD.into(), Value::String(api_key.into()));
        let bytes = serde_json::to_vec(&body)?;
        let signature = sign(secret, &bytes);
        Ok(Self { bytes, signature })
    }
}
