/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! The outbound HTTP request body.
//!
//! A [`Body`] is one of three things: empty, in-memory bytes with a known
//! length, or a byte stream with an optional known length. A streaming body is
//! _replayable_ when it was built with a rebuild hook; replayable streams can
//! be drained once to compute a payload hash and then rebuilt for transmission.

use bytes::Bytes;
use futures_core::Stream;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// The error type produced when polling a streaming [`Body`].
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// A boxed byte stream, the inner representation of a streaming [`Body`].
pub type BoxByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, Error>> + Send>>;

type RebuildFn = Arc<dyn Fn() -> BoxByteStream + Send + Sync>;

/// An HTTP request body.
pub struct Body {
    inner: Inner,
}

enum Inner {
    Empty,
    // The bytes are `take`n when polled; `bytes()` observes them up until then.
    Once(Option<Bytes>),
    Streaming {
        stream: BoxByteStream,
        content_length: Option<u64>,
        rebuild: Option<RebuildFn>,
    },
}

impl Body {
    /// Creates an empty body.
    pub fn empty() -> Self {
        Self { inner: Inner::Empty }
    }

    /// Creates a streaming body that can be read exactly once.
    ///
    /// A body created this way cannot be hashed for signing; callers must
    /// provide a payload-hash override (for example `UNSIGNED-PAYLOAD` or one
    /// of the streaming sentinels) when signing a request carrying it.
    pub fn from_stream(
        stream: impl Stream<Item = Result<Bytes, Error>> + Send + 'static,
        content_length: Option<u64>,
    ) -> Self {
        Self {
            inner: Inner::Streaming {
                stream: Box::pin(stream),
                content_length,
                rebuild: None,
            },
        }
    }

    /// Creates a replayable streaming body from a stream constructor.
    ///
    /// The constructor is invoked once immediately for the transmitted stream,
    /// and again whenever the body needs to be re-read (payload hashing,
    /// retries).
    pub fn retryable(
        rebuild: impl Fn() -> BoxByteStream + Send + Sync + 'static,
        content_length: Option<u64>,
    ) -> Self {
        let rebuild: RebuildFn = Arc::new(rebuild);
        Self {
            inner: Inner::Streaming {
                stream: (rebuild)(),
                content_length,
                rebuild: Some(rebuild),
            },
        }
    }

    /// Returns the in-memory contents of the body, if it has any.
    ///
    /// Returns `None` for streaming bodies, or for an in-memory body that has
    /// already been polled.
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.inner {
            Inner::Empty => Some(&[]),
            Inner::Once(Some(bytes)) => Some(bytes),
            Inner::Once(None) => None,
            Inner::Streaming { .. } => None,
        }
    }

    /// Returns the length of the body, if known.
    pub fn content_length(&self) -> Option<u64> {
        match &self.inner {
            Inner::Empty => Some(0),
            Inner::Once(Some(bytes)) => Some(bytes.len() as u64),
            Inner::Once(None) => None,
            Inner::Streaming { content_length, .. } => *content_length,
        }
    }

    /// Returns true if this body can be read more than once.
    pub fn is_replayable(&self) -> bool {
        match &self.inner {
            Inner::Empty | Inner::Once(_) => true,
            Inner::Streaming { rebuild, .. } => rebuild.is_some(),
        }
    }

    /// Builds a fresh stream over the body contents without consuming the body,
    /// or `None` if the body is a one-shot stream.
    pub(crate) fn rebuild_stream(&self) -> Option<BoxByteStream> {
        match &self.inner {
            Inner::Empty => Some(Box::pin(futures_util::stream::empty())),
            Inner::Once(Some(bytes)) => {
                let bytes = bytes.clone();
                Some(Box::pin(futures_util::stream::once(async move { Ok(bytes) })))
            }
            Inner::Once(None) => None,
            Inner::Streaming { rebuild, .. } => rebuild.as_ref().map(|rebuild| (rebuild)()),
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Inner::Empty => f.write_str("Body::Empty"),
            Inner::Once(_) => f.write_str("Body::Once"),
            Inner::Streaming { content_length, rebuild, .. } => f
                .debug_struct("Body::Streaming")
                .field("content_length", content_length)
                .field("replayable", &rebuild.is_some())
                .finish(),
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        if bytes.is_empty() {
            Self::empty()
        } else {
            Self {
                inner: Inner::Once(Some(bytes)),
            }
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(data: Vec<u8>) -> Self {
        Self::from(Bytes::from(data))
    }
}

impl From<&'static [u8]> for Body {
    fn from(data: &'static [u8]) -> Self {
        Self::from(Bytes::from_static(data))
    }
}

impl From<&'static str> for Body {
    fn from(data: &'static str) -> Self {
        Self::from(Bytes::from_static(data.as_bytes()))
    }
}

impl From<String> for Body {
    fn from(data: String) -> Self {
        Self::from(Bytes::from(data))
    }
}

impl http_body::Body for Body {
    type Data = Bytes;
    type Error = Error;

    fn poll_data(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Self::Data, Self::Error>>> {
        let this = self.get_mut();
        match &mut this.inner {
            Inner::Empty => Poll::Ready(None),
            Inner::Once(bytes) => Poll::Ready(bytes.take().map(Ok)),
            Inner::Streaming { stream, .. } => stream.as_mut().poll_next(cx),
        }
    }

    fn poll_trailers(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Result<Option<http::HeaderMap>, Self::Error>> {
        Poll::Ready(Ok(None))
    }

    fn is_end_stream(&self) -> bool {
        matches!(&self.inner, Inner::Empty | Inner::Once(None))
    }

    fn size_hint(&self) -> http_body::SizeHint {
        match self.content_length() {
            Some(length) => http_body::SizeHint::with_exact(length),
            None => http_body::SizeHint::new(),
        }
    }
}
