/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Provides functions for calculating SigV4 signing keys and signatures, and
//! utilities for signing HTTP requests and `aws-chunked` streaming payloads.

#![allow(clippy::derive_partial_eq_without_eq)]
#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

use aws_credential_types::Credentials;
use std::time::SystemTime;

mod date_time;

pub mod http_request;
pub mod sign;
pub mod streaming;

/// Parameters to use when signing.
#[derive(Debug)]
#[non_exhaustive]
pub struct SigningParams<'a, S> {
    /// Credentials to sign with.
    pub(crate) credentials: &'a Credentials,

    /// Region to sign for.
    pub(crate) region: &'a str,
    /// Service signing name to sign for.
    ///
    /// NOTE: Endpoint resolution rules may specify a name that differs from the typical service name.
    pub(crate) name: &'a str,
    /// Timestamp to use in the signature (should be `SystemTime::now()` unless testing).
    ///
    /// The same instant feeds the `X-Amz-Date` value, the credential scope, and
    /// the signing-key derivation.
    pub(crate) time: SystemTime,

    /// Additional signing settings. These differ between HTTP requests and streaming chunks.
    pub(crate) settings: S,
}

const HMAC_256: &str = "AWS4-HMAC-SHA256";

impl<'a, S> SigningParams<'a, S> {
    /// Returns the region that will be used to sign
    pub fn region(&self) -> &str {
        self.region
    }

    /// Returns the signing name that will be used to sign
    pub fn name(&self) -> &str {
        self.name
    }

    /// Returns the name of the algorithm used to sign requests
    pub fn algorithm(&self) -> &'static str {
        HMAC_256
    }

    pub(crate) fn credentials(&self) -> &Credentials {
        self.credentials
    }
}

impl<'a, S: Default> SigningParams<'a, S> {
    /// Returns a builder that can create new `SigningParams`.
    pub fn builder() -> signing_params::Builder<'a, S> {
        Default::default()
    }
}

/// Builder and error for creating [`SigningParams`]
pub mod signing_params {
    use super::SigningParams;
    use aws_credential_types::Credentials;
    use std::error::Error;
    use std::fmt;
    use std::time::SystemTime;

    /// [`SigningParams`] builder error
    #[derive(Debug)]
    pub struct BuildError {
        reason: &'static str,
    }
    impl BuildError {
        fn new(reason: &'static str) -> Self {
            Self { reason }
        }
    }

    impl fmt::Display for BuildError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.reason)
        }
    }

    impl Error for BuildError {}

    /// Builder that can create new [`SigningParams`]
    #[derive(Debug, Default)]
    pub struct Builder<'a, S> {
        credentials: Option<&'a Credentials>,
        region: Option<&'a str>,
        name: Option<&'a str>,
        time: Option<SystemTime>,
        settings: Option<S>,
    }

    impl<'a, S> Builder<'a, S> {
        /// Sets the credentials (required)
        pub fn credentials(mut self, credentials: &'a Credentials) -> Self {
            self.set_credentials(Some(credentials));
            self
        }
        /// Sets the credentials (required)
        pub fn set_credentials(&mut self, credentials: Option<&'a Credentials>) -> &mut Self {
            self.credentials = credentials;
            self
        }
        /// Sets the region (required)
        pub fn region(mut self, region: &'a str) -> Self {
            self.set_region(Some(region));
            self
        }
        /// Sets the region (required)
        pub fn set_region(&mut self, region: Option<&'a str>) -> &mut Self {
            self.region = region;
            self
        }
        /// Sets the signing name (required)
        pub fn name(mut self, name: &'a str) -> Self {
            self.set_name(Some(name));
            self
        }
        /// Sets the signing name (required)
        pub fn set_name(&mut self, name: Option<&'a str>) -> &mut Self {
            self.name = name;
            self
        }
        /// Sets the time to be used in the signature (required)
        pub fn time(mut self, time: SystemTime) -> Self {
            self.set_time(Some(time));
            self
        }
        /// Sets the time to be used in the signature (required)
        pub fn set_time(&mut self, time: Option<SystemTime>) -> &mut Self {
            self.time = time;
            self
        }
        /// Sets additional signing settings (required)
        pub fn settings(mut self, settings: S) -> Self {
            self.set_settings(Some(settings));
            self
        }
        /// Sets additional signing settings (required)
        pub fn set_settings(&mut self, settings: Option<S>) -> &mut Self {
            self.settings = settings;
            self
        }
        /// Builds an instance of [`SigningParams`]. Will yield a [`BuildError`] if
        /// a required argument was not given.
        pub fn build(self) -> Result<SigningParams<'a, S>, BuildError> {
            Ok(SigningParams {
                credentials: self
                    .credentials
                    .ok_or_else(|| BuildError::new("credentials are required"))?,
                region: self
                    .region
                    .ok_or_else(|| BuildError::new("region is required"))?,
                name: self
                    .name
                    .ok_or_else(|| BuildError::new("name is required"))?,
                time: self
                    .time
                    .ok_or_else(|| BuildError::new("time is required"))?,
                settings: self
                    .settings
                    .ok_or_else(|| BuildError::new("settings are required"))?,
            })
        }
    }
}

/// Container for the signed output and the signature.
///
/// This is returned by signing functions, and the signed output will be
/// different based on what is being signed (for example, a streaming chunk,
/// or an HTTP request).
#[derive(Debug)]
pub struct SigningOutput<T> {
    output: T,
    signature: String,
}

impl<T> SigningOutput<T> {
    /// Creates a new [`SigningOutput`]
    pub fn new(output: T, signature: String) -> Self {
        Self { output, signature }
    }

    /// Returns the signed output
    pub fn output(&self) -> &T {
        &self.output
    }

    /// Returns the signature as a lowercase hex string
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Decomposes the `SigningOutput` into a tuple of the signed output and the signature
    pub fn into_parts(self) -> (T, String) {
        (self.output, self.signature)
    }
}
