/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Checksum calculators for `x-amz-checksum-*` trailer headers.

use base64::Engine as _;
use http::header::{HeaderName, HeaderValue};
use sha2::Digest;
use std::fmt;

// Valid checksum algorithm names
/// The name of the CRC32 checksum algorithm.
pub const CRC_32_NAME: &str = "crc32";
/// The name of the CRC32C checksum algorithm.
pub const CRC_32_C_NAME: &str = "crc32c";
/// The name of the SHA-256 checksum algorithm.
pub const SHA_256_NAME: &str = "sha256";

/// Header name for CRC32 checksums.
pub const CRC_32_HEADER_NAME: HeaderName = HeaderName::from_static("x-amz-checksum-crc32");
/// Header name for CRC32C checksums.
pub const CRC_32_C_HEADER_NAME: HeaderName = HeaderName::from_static("x-amz-checksum-crc32c");
/// Header name for SHA-256 checksums.
pub const SHA_256_HEADER_NAME: HeaderName = HeaderName::from_static("x-amz-checksum-sha256");

/// Checksum algorithms are used to validate the integrity of data. Structs that implement this trait
/// can be used as checksum calculators. This trait requires Send + Sync because these checksums are
/// often used in a threaded context.
pub trait Checksum: Send + Sync + fmt::Debug {
    /// Given a slice of bytes, update this checksum's internal state.
    fn update(&mut self, bytes: &[u8]);
    /// Return the `HeaderName` used to represent this checksum algorithm.
    fn header_name(&self) -> HeaderName;
    /// Return the current checksum as a base64-encoded `HeaderValue`.
    fn header_value(&self) -> HeaderValue;
    /// Return the size of this checksum algorithm's resulting checksum, in bytes. For example, the
    /// CRC32 checksum algorithm calculates a 32 bit checksum, so a CRC32 checksum struct
    /// implementing this trait method would return 4.
    fn size(&self) -> u64;
}

/// Create a new `Box<dyn Checksum>` from an algorithm name. Valid algorithm names are defined as
/// `const`s in this module.
pub fn new_checksum(checksum_algorithm: &str) -> Box<dyn Checksum> {
    if checksum_algorithm.eq_ignore_ascii_case(CRC_32_NAME) {
        Box::<Crc32>::default()
    } else if checksum_algorithm.eq_ignore_ascii_case(CRC_32_C_NAME) {
        Box::<Crc32c>::default()
    } else if checksum_algorithm.eq_ignore_ascii_case(SHA_256_NAME) {
        Box::<Sha256>::default()
    } else {
        panic!("unsupported checksum algorithm '{}'", checksum_algorithm)
    }
}

fn base64_header_value(bytes: &[u8]) -> HeaderValue {
    HeaderValue::from_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
        .expect("base64 output is always a valid header value")
}

/// CRC32 checksum calculator.
#[derive(Debug, Default)]
pub struct Crc32 {
    hasher: crc32fast::Hasher,
}

impl Checksum for Crc32 {
    fn update(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    fn header_name(&self) -> HeaderName {
        CRC_32_HEADER_NAME
    }

    fn header_value(&self) -> HeaderValue {
        // We clone the hasher because `Hasher::finalize` consumes `self`
        let hash = self.hasher.clone().finalize();
        base64_header_value(&hash.to_be_bytes())
    }

    fn size(&self) -> u64 {
        4
    }
}

/// CRC32C checksum calculator.
#[derive(Debug, Default)]
pub struct Crc32c {
    state: Option<u32>,
}

impl Checksum for Crc32c {
    fn update(&mut self, bytes: &[u8]) {
        self.state = match self.state {
            Some(crc) => Some(crc32c::crc32c_append(crc, bytes)),
            None => Some(crc32c::crc32c(bytes)),
        };
    }

    fn header_name(&self) -> HeaderName {
        CRC_32_C_HEADER_NAME
    }

    fn header_value(&self) -> HeaderValue {
        base64_header_value(&self.state.unwrap_or_default().to_be_bytes())
    }

    fn size(&self) -> u64 {
        4
    }
}

/// SHA-256 checksum calculator.
#[derive(Debug, Default)]
pub struct Sha256 {
    hasher: sha2::Sha256,
}

impl Checksum for Sha256 {
    fn update(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    fn header_name(&self) -> HeaderName {
        SHA_256_HEADER_NAME
    }

    fn header_value(&self) -> HeaderValue {
        // We clone the hasher because `finalize` consumes `self`
        base64_header_value(&self.hasher.clone().finalize())
    }

    fn size(&self) -> u64 {
        32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // "123456789" is the standard check input for CRC implementations.
    const CHECK_INPUT: &[u8] = b"123456789";

    #[test]
    fn crc32_check_value() {
        let mut checksum = new_checksum(CRC_32_NAME);
        checksum.update(CHECK_INPUT);
        // 0xCBF43926 big-endian, base64-encoded
        assert_eq!("y/Q5Jg==", checksum.header_value().to_str().unwrap());
        assert_eq!("x-amz-checksum-crc32", checksum.header_name().as_str());
        assert_eq!(4, checksum.size());
    }

    #[test]
    fn crc32_of_nothing_is_zero() {
        let checksum = Crc32::default();
        assert_eq!("AAAAAA==", checksum.header_value().to_str().unwrap());
    }

    #[test]
    fn crc32c_check_value() {
        let mut checksum = new_checksum(CRC_32_C_NAME);
        checksum.update(CHECK_INPUT);
        // 0xE3069283 big-endian, base64-encoded
        assert_eq!("4waSgw==", checksum.header_value().to_str().unwrap());
        assert_eq!("x-amz-checksum-crc32c", checksum.header_name().as_str());
    }

    #[test]
    fn sha256_of_empty_input() {
        let checksum = Sha256::default();
        assert_eq!(
            "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=",
            checksum.header_value().to_str().unwrap()
        );
        assert_eq!(32, checksum.size());
    }

    #[test]
    #[should_panic(expected = "unsupported checksum algorithm")]
    fn unknown_algorithm_panics() {
        let _ = new_checksum("md5");
    }
}
