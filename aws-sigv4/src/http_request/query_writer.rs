/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::http_request::url_escape::percent_encode_query;
use http::Uri;

/// Utility for rebuilding the query string of a URI.
///
/// Parameters inserted here are percent-encoded with the same character set
/// used for the canonical query string, so a signature parameter written into
/// the final URI matches the form that was signed byte for byte.
pub(crate) struct QueryWriter {
    base_uri: Uri,
    new_path_and_query: String,
    prefix: Option<char>,
}

impl QueryWriter {
    /// Creates a new `QueryWriter` based on the given `uri`.
    pub(crate) fn new(uri: &Uri) -> Self {
        let new_path_and_query = uri
            .path_and_query()
            .map(|pq| pq.to_string())
            .unwrap_or_default();
        let prefix = if uri.query().is_none() {
            Some('?')
        } else if !uri.query().unwrap_or_default().is_empty() {
            Some('&')
        } else {
            None
        };
        QueryWriter {
            base_uri: uri.clone(),
            new_path_and_query,
            prefix,
        }
    }

    /// Inserts a new query parameter, percent-encoding the key and value.
    pub(crate) fn insert(&mut self, k: &str, v: &str) {
        if let Some(prefix) = self.prefix {
            self.new_path_and_query.push(prefix);
        }
        self.prefix = Some('&');
        self.new_path_and_query.push_str(&percent_encode_query(k));
        self.new_path_and_query.push('=');
        self.new_path_and_query.push_str(&percent_encode_query(v));
    }

    /// Returns the rebuilt [`Uri`].
    pub(crate) fn build_uri(self) -> Uri {
        let mut parts = self.base_uri.into_parts();
        parts.path_and_query = Some(
            self.new_path_and_query
                .parse()
                .expect("adding a query should not invalidate the URI"),
        );
        Uri::from_parts(parts).expect("a valid URI in should always produce a valid URI out")
    }
}
