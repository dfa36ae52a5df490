/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Rolling signatures for `aws-chunked` streaming payloads and their trailing headers.
//!
//! A request signed with one of the streaming payload sentinels produces a
//! _seed signature_. Each chunk of the body is then signed with a
//! string-to-sign that chains the signature of the previous chunk, starting
//! from the seed; the trailing headers (if any) are signed last against the
//! final chunk signature.

use crate::date_time::format_date_time;
use crate::http_request::canonical_request::{trim_all, SigningScope};
use crate::http_request::{CanonicalRequestError, SigningError};
use crate::sign::v4::{calculate_signature, generate_signing_key, sha256_hex_string};
use crate::{SigningOutput, SigningParams};
use http::HeaderMap;
use std::fmt;

/// Payload hash sentinel for signed streaming requests.
pub const STREAMING_HMAC_256_PAYLOAD: &str = "STREAMING-AWS4-HMAC-SHA256-PAYLOAD";
/// Payload hash sentinel for signed streaming requests with trailing headers.
pub const STREAMING_HMAC_256_PAYLOAD_TRAILER: &str = "STREAMING-AWS4-HMAC-SHA256-PAYLOAD-TRAILER";
/// Payload hash sentinel for unsigned streaming requests with trailing headers.
pub const STREAMING_UNSIGNED_PAYLOAD_TRAILER: &str = "STREAMING-UNSIGNED-PAYLOAD-TRAILER";

const HMAC_256_PAYLOAD: &str = "AWS4-HMAC-SHA256-PAYLOAD";
const HMAC_256_TRAILER: &str = "AWS4-HMAC-SHA256-TRAILER";

/// SHA-256 digest of the empty string; the fifth line of every chunk
/// string-to-sign is fixed to this value by the streaming format.
const EMPTY_SHA_256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Parameters for signing a streaming chunk or trailer.
///
/// Streaming signatures have no HTTP-level settings, so the settings slot is `()`.
pub type ChunkSigningParams<'a> = SigningParams<'a, ()>;

#[derive(Debug, PartialEq)]
struct ChunkStringToSign<'a> {
    scope: SigningScope<'a>,
    date_time: String,
    previous_signature: &'a str,
    hashed_chunk: String,
}

impl<'a> ChunkStringToSign<'a> {
    fn new(chunk_body: &[u8], previous_signature: &'a str, params: &'a ChunkSigningParams<'a>) -> Self {
        Self {
            scope: SigningScope {
                time: params.time,
                region: params.region,
                service: params.name,
            },
            date_time: format_date_time(params.time),
            previous_signature,
            hashed_chunk: sha256_hex_string(chunk_body),
        }
    }
}

impl<'a> fmt::Display for ChunkStringToSign<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{}\n{}\n{}\n{}\n{}",
            HMAC_256_PAYLOAD,
            self.date_time,
            self.scope,
            self.previous_signature,
            EMPTY_SHA_256,
            self.hashed_chunk
        )
    }
}

#[derive(Debug, PartialEq)]
struct TrailerStringToSign<'a> {
    scope: SigningScope<'a>,
    date_time: String,
    previous_signature: &'a str,
    hashed_trailers: String,
}

impl<'a> TrailerStringToSign<'a> {
    fn new(
        canonical_trailers: &str,
        previous_signature: &'a str,
        params: &'a ChunkSigningParams<'a>,
    ) -> Self {
        Self {
            scope: SigningScope {
                time: params.time,
                region: params.region,
                service: params.name,
            },
            date_time: format_date_time(params.time),
            previous_signature,
            hashed_trailers: sha256_hex_string(canonical_trailers),
        }
    }
}

impl<'a> fmt::Display for TrailerStringToSign<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{}\n{}\n{}\n{}",
            HMAC_256_TRAILER,
            self.date_time,
            self.scope,
            self.previous_signature,
            self.hashed_trailers
        )
    }
}

/// Signs a single chunk of an `aws-chunked` body.
///
/// `previous_signature` is the seed signature for the first chunk, and the
/// signature returned by the previous `sign_chunk` call for every chunk after
/// it. The final zero-length chunk is signed the same way with an empty body.
pub fn sign_chunk(
    chunk_body: &[u8],
    previous_signature: &str,
    params: &ChunkSigningParams<'_>,
) -> SigningOutput<()> {
    let string_to_sign =
        ChunkStringToSign::new(chunk_body, previous_signature, params).to_string();
    tracing::trace!(chunk_string_to_sign = %string_to_sign, "signing chunk");

    let creds = params.credentials();
    let signing_key =
        generate_signing_key(creds.secret_access_key(), params.time, params.region, params.name);
    let signature = calculate_signature(signing_key, string_to_sign.as_bytes());
    SigningOutput::new((), signature)
}

/// Signs the trailing headers of an `aws-chunked` body.
///
/// `previous_signature` must be the signature of the final (zero-length) chunk.
pub fn sign_chunk_trailer(
    trailing_headers: &HeaderMap,
    previous_signature: &str,
    params: &ChunkSigningParams<'_>,
) -> Result<SigningOutput<()>, SigningError> {
    let canonical_trailers = canonical_trailer_string(trailing_headers)?;
    let string_to_sign =
        TrailerStringToSign::new(&canonical_trailers, previous_signature, params).to_string();
    tracing::trace!(trailer_string_to_sign = %string_to_sign, "signing chunk trailer");

    let creds = params.credentials();
    let signing_key =
        generate_signing_key(creds.secret_access_key(), params.time, params.region, params.name);
    let signature = calculate_signature(signing_key, string_to_sign.as_bytes());
    Ok(SigningOutput::new((), signature))
}

/// Serializes trailing headers with the canonicalization rule used for signed
/// request headers: lowercased names sorted lexicographically, values trimmed,
/// multiple values joined with `,`, one `name:value` line per name, each line
/// terminated by a newline.
pub(crate) fn canonical_trailer_string(
    trailing_headers: &HeaderMap,
) -> Result<String, SigningError> {
    let mut names: Vec<&str> = trailing_headers.keys().map(|name| name.as_str()).collect();
    names.sort_unstable();

    let mut out = String::new();
    for name in names {
        out.push_str(name);
        out.push(':');
        let mut first = true;
        for value in trailing_headers.get_all(name) {
            let value = value
                .to_str()
                .map_err(|err| {
                    SigningError::from(CanonicalRequestError::invalid_utf8_in_header_value(err))
                })?;
            if !first {
                out.push(',');
            }
            first = false;
            out.push_str(&trim_all(value));
        }
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_time::test_parsers::parse_date_time;
    use aws_credential_types::Credentials;
    use http::{HeaderMap, HeaderValue};

    fn chunk_signing_params<'a>(credentials: &'a Credentials) -> ChunkSigningParams<'a> {
        SigningParams::builder()
            .credentials(credentials)
            .region("us-east-1")
            .name("s3")
            .time(parse_date_time("20130524T000000Z").unwrap())
            .settings(())
            .build()
            .unwrap()
    }

    #[test]
    fn chunk_string_to_sign_format() {
        let credentials = Credentials::for_tests();
        let params = chunk_signing_params(&credentials);
        let sts = ChunkStringToSign::new(b"", "abc123", &params).to_string();
        assert_eq!(
            "AWS4-HMAC-SHA256-PAYLOAD\n\
             20130524T000000Z\n\
             20130524/us-east-1/s3/aws4_request\n\
             abc123\n\
             e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855\n\
             e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
            sts
        );
    }

    #[test]
    fn trailer_string_to_sign_format() {
        let credentials = Credentials::for_tests();
        let params = chunk_signing_params(&credentials);
        let canonical = "x-amz-checksum-crc32c:sOO8/Q==\n";
        let sts = TrailerStringToSign::new(canonical, "abc123", &params).to_string();
        assert_eq!(
            format!(
                "AWS4-HMAC-SHA256-TRAILER\n\
                 20130524T000000Z\n\
                 20130524/us-east-1/s3/aws4_request\n\
                 abc123\n\
                 {}",
                sha256_hex_string(canonical)
            ),
            sts
        );
    }

    #[test]
    fn canonical_trailer_ordering_and_trimming() {
        let mut trailers = HeaderMap::new();
        trailers.insert("x-amz-checksum-crc32", HeaderValue::from_static("  AAAAAA==  "));
        trailers.append("x-amz-meta-b", HeaderValue::from_static("two"));
        trailers.insert("x-amz-meta-a", HeaderValue::from_static("one"));
        let canonical = canonical_trailer_string(&trailers).unwrap();
        assert_eq!(
            "x-amz-checksum-crc32:AAAAAA==\nx-amz-meta-a:one\nx-amz-meta-b:two\n",
            canonical
        );
    }

    #[test]
    fn signature_chain_is_deterministic_and_rolling() {
        let credentials = Credentials::for_tests();
        let params = chunk_signing_params(&credentials);
        let seed = "4f232c4386841ef735655705268965c44a0e4690baa4adea153f7db9fa80a0a9";

        let first = sign_chunk(b"chunk one", seed, &params).into_parts().1;
        let again = sign_chunk(b"chunk one", seed, &params).into_parts().1;
        assert_eq!(first, again);

        let second = sign_chunk(b"chunk two", &first, &params).into_parts().1;
        assert_ne!(first, second);
        assert_eq!(64, first.len());
        assert!(first.bytes().all(|b| b.is_ascii_hexdigit()));
    }
}
