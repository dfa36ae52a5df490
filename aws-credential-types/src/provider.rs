/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Credentials provider contract and shared provider wrapper.
//!
//! A credentials provider is an asynchronous source of [`Credentials`]. Signing
//! resolves credentials exactly once per signing operation through this
//! contract; everything behind it (profiles, IMDS, STS, caching) is out of
//! scope for the signing core.

use crate::Credentials;
use std::sync::Arc;

/// Error returned when credentials failed to load.
pub mod error {
    use std::error::Error;
    use std::fmt;
    use std::time::Duration;

    #[derive(Debug)]
    enum CredentialsErrorKind {
        CredentialsNotLoaded {
            context: Box<dyn Error + Send + Sync + 'static>,
        },
        ProviderTimedOut(Duration),
        InvalidConfiguration {
            source: Box<dyn Error + Send + Sync + 'static>,
        },
        ProviderError {
            source: Box<dyn Error + Send + Sync + 'static>,
        },
        Unhandled {
            source: Box<dyn Error + Send + Sync + 'static>,
        },
    }

    /// Error returned when credentials failed to load.
    #[derive(Debug)]
    pub struct CredentialsError {
        kind: CredentialsErrorKind,
    }

    impl CredentialsError {
        /// The credentials provider did not provide credentials.
        ///
        /// This error indicates the credentials provider was not enabled or no configuration was set.
        /// This contrasts with [`invalid_configuration`](CredentialsError::invalid_configuration), indicating
        /// that the provider was configured in some way, but certain settings were invalid.
        pub fn not_loaded(context: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
            Self {
                kind: CredentialsErrorKind::CredentialsNotLoaded {
                    context: context.into(),
                },
            }
        }

        /// The credentials provider timed out.
        pub fn provider_timed_out(context: Duration) -> Self {
            Self {
                kind: CredentialsErrorKind::ProviderTimedOut(context),
            }
        }

        /// The provider was given an invalid configuration.
        ///
        /// For example, a syntactically invalid profile or a malformed region.
        pub fn invalid_configuration(
            source: impl Into<Box<dyn Error + Send + Sync + 'static>>,
        ) -> Self {
            Self {
                kind: CredentialsErrorKind::InvalidConfiguration {
                    source: source.into(),
                },
            }
        }

        /// The provider experienced an error during credential resolution.
        pub fn provider_error(source: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
            Self {
                kind: CredentialsErrorKind::ProviderError {
                    source: source.into(),
                },
            }
        }

        /// An unexpected error occurred during credential resolution.
        ///
        /// If the error is something that can occur during expected usage of a provider, `provider_error`
        /// should be returned instead. Unhandled is reserved for exceptional cases, for example:
        /// - Returned data not UTF-8
        /// - A provider returns data that is missing required fields
        pub fn unhandled(source: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
            Self {
                kind: CredentialsErrorKind::Unhandled {
                    source: source.into(),
                },
            }
        }
    }

    impl fmt::Display for CredentialsError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            use CredentialsErrorKind::*;
            match &self.kind {
                CredentialsNotLoaded { context } => {
                    write!(f, "the credential provider was not enabled: {context}")
                }
                ProviderTimedOut(d) => write!(
                    f,
                    "credentials provider timed out after {} seconds",
                    d.as_secs()
                ),
                InvalidConfiguration { .. } => {
                    write!(f, "the credentials provider was not properly configured")
                }
                ProviderError { .. } => write!(f, "an error occurred while loading credentials"),
                Unhandled { .. } => write!(f, "unexpected credentials error"),
            }
        }
    }

    impl Error for CredentialsError {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            use CredentialsErrorKind::*;
            match &self.kind {
                CredentialsNotLoaded { context } => Some(context.as_ref() as _),
                InvalidConfiguration { source }
                | ProviderError { source }
                | Unhandled { source } => Some(source.as_ref() as _),
                ProviderTimedOut(_) => None,
            }
        }
    }
}

/// Result type for credential providers.
pub type Result = std::result::Result<Credentials, error::CredentialsError>;

/// Future types for credential providers.
pub mod future {
    use std::future::Future;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

    enum Inner<'a> {
        Ready(Option<super::Result>),
        Deferred(BoxFuture<'a, super::Result>),
    }

    /// Future new-type that the [`ProvideCredentials`](super::ProvideCredentials) trait must return.
    ///
    /// Providers that have credentials on hand can resolve without an allocation
    /// via [`ProvideCredentials::ready`].
    pub struct ProvideCredentials<'a>(Inner<'a>);

    impl<'a> std::fmt::Debug for ProvideCredentials<'a> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("ProvideCredentials")
        }
    }

    impl<'a> ProvideCredentials<'a> {
        /// Creates a `ProvideCredentials` struct from a future.
        pub fn new(future: impl Future<Output = super::Result> + Send + 'a) -> Self {
            ProvideCredentials(Inner::Deferred(Box::pin(future)))
        }

        /// Creates a `ProvideCredentials` struct from a resolved credentials value.
        pub fn ready(credentials: super::Result) -> Self {
            ProvideCredentials(Inner::Ready(Some(credentials)))
        }
    }

    impl Future for ProvideCredentials<'_> {
        type Output = super::Result;

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
            match &mut self.0 {
                Inner::Ready(result) => {
                    Poll::Ready(result.take().expect("futures cannot be polled after completion"))
                }
                Inner::Deferred(future) => future.as_mut().poll(cx),
            }
        }
    }
}

/// Asynchronous Credentials Provider
pub trait ProvideCredentials: Send + Sync + std::fmt::Debug {
    /// Returns a future that provides credentials.
    fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
    where
        Self: 'a;
}

impl ProvideCredentials for Credentials {
    fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
    where
        Self: 'a,
    {
        future::ProvideCredentials::ready(Ok(self.clone()))
    }
}

impl ProvideCredentials for Arc<dyn ProvideCredentials> {
    fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
    where
        Self: 'a,
    {
        self.as_ref().provide_credentials()
    }
}

/// Credentials provider wrapper that may be shared.
///
/// Newtype wrapper around `ProvideCredentials` that implements `Clone` using an internal `Arc`.
#[derive(Clone, Debug)]
pub struct SharedCredentialsProvider(Arc<dyn ProvideCredentials>);

impl SharedCredentialsProvider {
    /// Create a new `SharedCredentialsProvider` from `ProvideCredentials`.
    ///
    /// The given provider will be wrapped in an internal `Arc`. If your
    /// provider is already in an `Arc`, use `SharedCredentialsProvider::from(provider)` instead.
    pub fn new(provider: impl ProvideCredentials + 'static) -> Self {
        Self(Arc::new(provider))
    }
}

impl AsRef<dyn ProvideCredentials> for SharedCredentialsProvider {
    fn as_ref(&self) -> &(dyn ProvideCredentials + 'static) {
        self.0.as_ref()
    }
}

impl From<Arc<dyn ProvideCredentials>> for SharedCredentialsProvider {
    fn from(provider: Arc<dyn ProvideCredentials>) -> Self {
        SharedCredentialsProvider(provider)
    }
}

impl ProvideCredentials for SharedCredentialsProvider {
    fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
    where
        Self: 'a,
    {
        self.0.provide_credentials()
    }
}

#[cfg(test)]
mod tests {
    use super::error::CredentialsError;
    use super::*;

    #[derive(Debug)]
    struct AlwaysFails;

    impl ProvideCredentials for AlwaysFails {
        fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
        where
            Self: 'a,
        {
            future::ProvideCredentials::new(async {
                Err(CredentialsError::not_loaded("no source configured"))
            })
        }
    }

    #[tokio::test]
    async fn static_credentials_resolve_to_themselves() {
        let creds = Credentials::new("akid", "secret", None, None, "static");
        let provider = SharedCredentialsProvider::new(creds.clone());
        let resolved = provider.provide_credentials().await.unwrap();
        assert_eq!("akid", resolved.access_key_id());
    }

    #[tokio::test]
    async fn provider_errors_are_chained() {
        let provider = SharedCredentialsProvider::new(AlwaysFails);
        let err = provider.provide_credentials().await.unwrap_err();
        assert!(format!("{err}").contains("not enabled"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
