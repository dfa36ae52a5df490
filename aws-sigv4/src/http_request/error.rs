/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use http::header::{InvalidHeaderName, InvalidHeaderValue, ToStrError};
use http::uri::InvalidUri;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
enum SigningErrorKind {
    FailedToCreateCanonicalRequest { source: CanonicalRequestError },
}

/// Error signing request
#[derive(Debug)]
pub struct SigningError {
    kind: SigningErrorKind,
}

impl fmt::Display for SigningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SigningErrorKind::*;
        match self.kind {
            FailedToCreateCanonicalRequest { .. } => {
                write!(f, "failed to create canonical request")
            }
        }
    }
}

impl Error for SigningError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use SigningErrorKind::*;
        match &self.kind {
            FailedToCreateCanonicalRequest { source } => Some(source),
        }
    }
}

impl From<CanonicalRequestError> for SigningError {
    fn from(source: CanonicalRequestError) -> Self {
        Self {
            kind: SigningErrorKind::FailedToCreateCanonicalRequest { source },
        }
    }
}

#[derive(Debug)]
enum CanonicalRequestErrorKind {
    InvalidHeaderName { source: InvalidHeaderName },
    InvalidHeaderValue { source: InvalidHeaderValue },
    InvalidUtf8InHeaderValue { source: ToStrError },
    NewlineInHeaderValue,
    MissingAuthority,
    InvalidUri { source: InvalidUri },
}

#[derive(Debug)]
pub(crate) struct CanonicalRequestError {
    kind: CanonicalRequestErrorKind,
}

impl fmt::Display for CanonicalRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CanonicalRequestErrorKind::*;
        match self.kind {
            InvalidHeaderName { .. } => write!(f, "invalid header name"),
            InvalidHeaderValue { .. } => write!(f, "invalid header value"),
            InvalidUtf8InHeaderValue { .. } => write!(f, "invalid UTF-8 in header value"),
            NewlineInHeaderValue => {
                write!(f, "header values must not contain carriage returns or newlines")
            }
            MissingAuthority => {
                write!(f, "request URI must have an authority (host) to be signed")
            }
            InvalidUri { .. } => write!(f, "URI was invalid"),
        }
    }
}

impl Error for CanonicalRequestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use CanonicalRequestErrorKind::*;
        match &self.kind {
            InvalidHeaderName { source } => Some(source),
            InvalidHeaderValue { source } => Some(source),
            InvalidUtf8InHeaderValue { source } => Some(source),
            NewlineInHeaderValue => None,
            MissingAuthority => None,
            InvalidUri { source } => Some(source),
        }
    }
}

impl CanonicalRequestError {
    pub(crate) fn invalid_utf8_in_header_value(source: ToStrError) -> Self {
        Self {
            kind: CanonicalRequestErrorKind::InvalidUtf8InHeaderValue { source },
        }
    }

    pub(crate) fn newline_in_header_value() -> Self {
        Self {
            kind: CanonicalRequestErrorKind::NewlineInHeaderValue,
        }
    }

    pub(crate) fn missing_authority() -> Self {
        Self {
            kind: CanonicalRequestErrorKind::MissingAuthority,
        }
    }

    pub(crate) fn is_missing_authority(&self) -> bool {
        matches!(self.kind, CanonicalRequestErrorKind::MissingAuthority)
    }
}

impl SigningError {
    /// Returns true if signing failed because the request URI had no host component.
    pub fn is_missing_authority(&self) -> bool {
        match &self.kind {
            SigningErrorKind::FailedToCreateCanonicalRequest { source } => {
                source.is_missing_authority()
            }
        }
    }
}

impl From<InvalidHeaderName> for CanonicalRequestError {
    fn from(source: InvalidHeaderName) -> Self {
        Self {
            kind: CanonicalRequestErrorKind::InvalidHeaderName { source },
        }
    }
}

impl From<InvalidHeaderValue> for CanonicalRequestError {
    fn from(source: InvalidHeaderValue) -> Self {
        Self {
            kind: CanonicalRequestErrorKind::InvalidHeaderValue { source },
        }
    }
}

impl From<InvalidUri> for CanonicalRequestError {
    fn from(source: InvalidUri) -> Self {
        Self {
            kind: CanonicalRequestErrorKind::InvalidUri { source },
        }
    }
}
