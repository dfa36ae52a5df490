/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Runtime support for SigV4 request signing.
//!
//! This crate ties the pieces of the signing core together for use against a
//! real HTTP engine: the [`auth`] module resolves credentials and produces
//! signed requests (or rolling chunk signatures), the [`body`] module models
//! the outbound request body, and the [`content_encoding`] module wraps a body
//! in the `aws-chunked` framing, signing each chunk and the trailing headers
//! as the HTTP engine consumes the stream.

#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod auth;
pub mod body;
pub mod checksums;
pub mod content_encoding;
