/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Request signing façades.

use aws_credential_types::provider::error::CredentialsError;
use std::borrow::Cow;
use std::error::Error;
use std::fmt;

pub mod sigv4;

#[derive(Debug)]
enum SignErrorKind {
    Credentials {
        source: CredentialsError,
    },
    InvalidRequest {
        message: Cow<'static, str>,
    },
    UnsignablePayload {
        message: Cow<'static, str>,
    },
    UnsupportedAlgorithm {
        algorithm: &'static str,
    },
    Io {
        source: crate::body::Error,
    },
    Signing {
        source: aws_sigv4::http_request::SigningError,
    },
    Cancelled,
}

/// Error produced when signing a request, a chunk, or a chunk trailer.
#[derive(Debug)]
pub struct SignError {
    kind: SignErrorKind,
}

impl SignError {
    pub(crate) fn credentials(source: CredentialsError) -> Self {
        Self {
            kind: SignErrorKind::Credentials { source },
        }
    }

    pub(crate) fn invalid_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind: SignErrorKind::InvalidRequest {
                message: message.into(),
            },
        }
    }

    pub(crate) fn unsignable_payload(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind: SignErrorKind::UnsignablePayload {
                message: message.into(),
            },
        }
    }

    pub(crate) fn unsupported_algorithm(algorithm: &'static str) -> Self {
        Self {
            kind: SignErrorKind::UnsupportedAlgorithm { algorithm },
        }
    }

    pub(crate) fn io(source: crate::body::Error) -> Self {
        Self {
            kind: SignErrorKind::Io { source },
        }
    }

    pub(crate) fn signing(source: aws_sigv4::http_request::SigningError) -> Self {
        Self {
            kind: SignErrorKind::Signing { source },
        }
    }

    /// Creates an error representing a signing operation that was cancelled
    /// before it completed, for runtimes that surface cancellation as an error
    /// rather than by dropping the future.
    pub fn cancelled() -> Self {
        Self {
            kind: SignErrorKind::Cancelled,
        }
    }

    /// Returns true if this error was caused by the credentials provider.
    pub fn is_credentials_error(&self) -> bool {
        matches!(self.kind, SignErrorKind::Credentials { .. })
    }

    /// Returns true if the request could not be signed as given.
    pub fn is_invalid_request(&self) -> bool {
        matches!(self.kind, SignErrorKind::InvalidRequest { .. })
    }

    /// Returns true if the request body could not be hashed for signing.
    pub fn is_unsignable_payload(&self) -> bool {
        matches!(self.kind, SignErrorKind::UnsignablePayload { .. })
    }

    /// Returns true if an unsupported signing algorithm was requested.
    pub fn is_unsupported_algorithm(&self) -> bool {
        matches!(self.kind, SignErrorKind::UnsupportedAlgorithm { .. })
    }

    /// Returns true if reading the payload failed while hashing it.
    pub fn is_io_error(&self) -> bool {
        matches!(self.kind, SignErrorKind::Io { .. })
    }

    /// Returns true if the signing operation was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, SignErrorKind::Cancelled)
    }
}

impl fmt::Display for SignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SignErrorKind::*;
        match &self.kind {
            Credentials { .. } => write!(f, "failed to resolve credentials for signing"),
            InvalidRequest { message } => write!(f, "invalid request: {message}"),
            UnsignablePayload { message } => write!(f, "unsignable payload: {message}"),
            UnsupportedAlgorithm { algorithm } => {
                write!(f, "unsupported signing algorithm: {algorithm}")
            }
            Io { .. } => write!(f, "I/O error while hashing the request payload"),
            Signing { .. } => write!(f, "failed to sign the request"),
            Cancelled => write!(f, "the signing operation was cancelled"),
        }
    }
}

impl Error for SignError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use SignErrorKind::*;
        match &self.kind {
            Credentials { source } => Some(source),
            Io { source } => Some(source.as_ref() as _),
            Signing { source } => Some(source),
            InvalidRequest { .. } | UnsignablePayload { .. } | UnsupportedAlgorithm { .. }
            | Cancelled => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SignError;
    use aws_credential_types::provider::error::CredentialsError;
    use std::error::Error as _;

    #[test]
    fn credentials_errors_chain_their_cause() {
        let err = SignError::credentials(CredentialsError::not_loaded("no provider configured"));
        assert!(err.is_credentials_error());
        assert!(err.source().is_some());
        assert!(format!("{err}").contains("failed to resolve credentials"));
    }

    #[test]
    fn cancelled_errors_are_terminal_and_sourceless() {
        let err = SignError::cancelled();
        assert!(err.is_cancelled());
        assert!(err.source().is_none());
        assert_eq!("the signing operation was cancelled", format!("{err}"));
    }

    #[test]
    fn invalid_request_message_is_precise() {
        let err = SignError::invalid_request("the request URI must have a host to be signed");
        assert_eq!(
            "invalid request: the request URI must have a host to be signed",
            format!("{err}")
        );
    }
}
