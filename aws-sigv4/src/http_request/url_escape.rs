/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// The percent-encoding set for SigV4 canonical query strings: everything but
/// RFC 3986 unreserved characters is encoded, so a space becomes `%20`, never `+`.
const BASE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Path variant of [`BASE_SET`] that keeps `/` as the segment separator.
const PATH_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

pub(crate) fn percent_encode_query(value: &str) -> String {
    utf8_percent_encode(value, BASE_SET).to_string()
}

pub(crate) fn percent_encode_path(value: &str) -> String {
    utf8_percent_encode(value, PATH_SET).to_string()
}

#[cfg(test)]
mod tests {
    use super::{percent_encode_path, percent_encode_query};

    #[test]
    fn test_encode_query() {
        assert_eq!("a%20b", percent_encode_query("a b"));
        assert_eq!("a%2Bb", percent_encode_query("a+b"));
        assert_eq!("-._~", percent_encode_query("-._~"));
        assert_eq!("a%2Fb", percent_encode_query("a/b"));
        assert_eq!("%25", percent_encode_query("%"));
    }

    #[test]
    fn test_encode_path_keeps_slashes() {
        assert_eq!("/a%20b/c", percent_encode_path("/a b/c"));
        assert_eq!("/already%2520encoded", percent_encode_path("/already%20encoded"));
    }
}
