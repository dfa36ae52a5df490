/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! `aws-credential-types` provides the [`Credentials`] type and the
//! [`ProvideCredentials`](crate::provider::ProvideCredentials) contract that
//! request signing resolves credentials through.

#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

mod credentials_impl;
pub mod provider;

pub use credentials_impl::{Credentials, CredentialsBuilder};
