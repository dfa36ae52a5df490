/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Key derivation and signature calculation for SigV4.

use crate::date_time::format_date;
use hmac::{digest::FixedOutput, Hmac, Mac};
use sha2::{Digest, Sha256};
use std::time::SystemTime;
use zeroize::Zeroizing;

/// HashedPayload = Lowercase(HexEncode(Hash(requestPayload)))
pub fn sha256_hex_string(bytes: impl AsRef<[u8]>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize_fixed())
}

/// Calculates a SigV4 signature
pub fn calculate_signature(signing_key: impl AsRef<[u8]>, string_to_sign: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(signing_key.as_ref())
        .expect("HMAC can take key of any size");
    mac.update(string_to_sign);
    hex::encode(mac.finalize_fixed())
}

fn hmac(key: &[u8], data: &[u8]) -> Zeroizing<[u8; 32]> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    let mut tag = Zeroizing::new([0u8; 32]);
    tag.copy_from_slice(&mac.finalize_fixed());
    tag
}

/// Generates a signing key for SigV4.
///
/// The returned key (and every intermediate tag in the derivation chain) is
/// held in a [`Zeroizing`] buffer, so the key material is overwritten when it
/// drops at the end of the signing call.
pub fn generate_signing_key(
    secret: &str,
    time: SystemTime,
    region: &str,
    service: &str,
) -> Zeroizing<[u8; 32]> {
    // kSecret = your secret access key
    // kDate = HMAC("AWS4" + kSecret, Date)
    // kRegion = HMAC(kDate, Region)
    // kService = HMAC(kRegion, Service)
    // kSigning = HMAC(kService, "aws4_request")
    let secret = Zeroizing::new(format!("AWS4{}", secret));
    let date_key = hmac(secret.as_bytes(), format_date(time).as_bytes());
    let region_key = hmac(date_key.as_ref(), region.as_bytes());
    let service_key = hmac(region_key.as_ref(), service.as_bytes());
    hmac(service_key.as_ref(), "aws4_request".as_bytes())
}
