/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::date_time::{format_date, format_date_time};
use crate::http_request::error::CanonicalRequestError;
use crate::http_request::settings::{
    PayloadChecksumKind, PercentEncodingMode, SessionTokenMode, SignatureLocation,
    UriPathNormalizationMode,
};
use crate::http_request::sign::SignableRequest;
use crate::http_request::uri_path_normalization::normalize_uri_path;
use crate::http_request::url_escape::{percent_encode_path, percent_encode_query};
use crate::http_request::{SignableBody, SigningParams};
use crate::sign::v4::sha256_hex_string;
use crate::streaming;
use http::header::{AsHeaderName, HeaderName, HOST};
use http::{HeaderMap, HeaderValue, Uri};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

pub(crate) mod header {
    pub(crate) const X_AMZ_CONTENT_SHA_256: &str = "x-amz-content-sha256";
    pub(crate) const X_AMZ_DATE: &str = "x-amz-date";
    pub(crate) const X_AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";
    pub(crate) const X_AMZ_USER_AGENT: &str = "x-amz-user-agent";
}

pub(crate) mod param {
    pub(crate) const X_AMZ_ALGORITHM: &str = "X-Amz-Algorithm";
    pub(crate) const X_AMZ_CREDENTIAL: &str = "X-Amz-Credential";
    pub(crate) const X_AMZ_DATE: &str = "X-Amz-Date";
    pub(crate) const X_AMZ_EXPIRES: &str = "X-Amz-Expires";
    pub(crate) const X_AMZ_SECURITY_TOKEN: &str = "X-Amz-Security-Token";
    pub(crate) const X_AMZ_SIGNED_HEADERS: &str = "X-Amz-SignedHeaders";
    pub(crate) const X_AMZ_SIGNATURE: &str = "X-Amz-Signature";
}

pub(crate) const HMAC_256: &str = "AWS4-HMAC-SHA256";

const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// Header names whose lowercased form is signed no matter what the
/// `should_sign_header` hook says.
const ALWAYS_SIGNED_HEADERS: [&str; 3] = ["host", "content-type", "content-length"];

#[derive(Debug, PartialEq)]
pub(crate) struct HeaderValues<'a> {
    pub(crate) content_sha256: Cow<'a, str>,
    pub(crate) date_time: String,
    pub(crate) security_token: Option<&'a str>,
    pub(crate) signed_headers: SignedHeaders,
}

#[derive(Debug, PartialEq)]
pub(crate) struct QueryParamValues<'a> {
    pub(crate) algorithm: &'static str,
    pub(crate) content_sha256: Cow<'a, str>,
    pub(crate) credential: String,
    pub(crate) date_time: String,
    pub(crate) expires: String,
    pub(crate) security_token: Option<&'a str>,
    pub(crate) signed_headers: SignedHeaders,
}

#[derive(Debug, PartialEq)]
pub(crate) enum SignatureValues<'a> {
    Headers(HeaderValues<'a>),
    QueryParams(QueryParamValues<'a>),
}

impl<'a> SignatureValues<'a> {
    pub(crate) fn signed_headers(&self) -> &SignedHeaders {
        match self {
            SignatureValues::Headers(values) => &values.signed_headers,
            SignatureValues::QueryParams(values) => &values.signed_headers,
        }
    }

    fn content_sha256(&self) -> &str {
        match self {
            SignatureValues::Headers(values) => &values.content_sha256,
            SignatureValues::QueryParams(values) => &values.content_sha256,
        }
    }

    pub(crate) fn as_headers(&self) -> Option<&HeaderValues<'_>> {
        match self {
            SignatureValues::Headers(values) => Some(values),
            _ => None,
        }
    }

    pub(crate) fn into_query_params(self) -> Result<QueryParamValues<'a>, Self> {
        match self {
            SignatureValues::QueryParams(values) => Ok(values),
            _ => Err(self),
        }
    }
}

#[derive(Debug, PartialEq)]
pub(crate) struct CanonicalRequest<'a> {
    pub(crate) method: &'a str,
    pub(crate) path: Cow<'a, str>,
    pub(crate) params: Option<String>,
    pub(crate) headers: HeaderMap,
    pub(crate) values: SignatureValues<'a>,
}

impl<'a> CanonicalRequest<'a> {
    /// Construct a CanonicalRequest from a [`SignableRequest`] and [`SigningParams`].
    ///
    /// The returned canonical request includes information required for signing as well
    /// as query parameters or header values that go along with the signature in a request.
    ///
    /// ## Behavior
    ///
    /// There are several settings which alter signing behavior:
    /// - If a `session_token` is present in the credentials, it is injected and signed
    ///   unless `settings.session_token_mode` excludes it.
    /// - If `settings.percent_encoding_mode` specifies double encoding, `%` in the URL will be re-encoded as `%25`
    /// - If `settings.payload_checksum_kind` is XAmzSha256, add a x-amz-content-sha256 with the body
    ///   checksum. This is the same checksum used as the "payload_hash" in the canonical request
    /// - `settings.signature_location` determines where the signature will be placed in a request,
    ///   and also alters the kinds of signing values that go along with it in the request.
    pub(crate) fn from<'b>(
        req: &'b SignableRequest<'b>,
        params: &'b SigningParams<'b>,
    ) -> Result<CanonicalRequest<'b>, CanonicalRequestError> {
        let creds = params.credentials();
        let path = req.uri().path();
        let path = match params.settings.uri_path_normalization_mode {
            UriPathNormalizationMode::Enabled => normalize_uri_path(path),
            UriPathNormalizationMode::Disabled => Cow::Borrowed(path),
        };
        let path = match params.settings.percent_encoding_mode {
            // The string is already URI encoded, we don't need to encode everything again, just `%`
            PercentEncodingMode::Double => Cow::Owned(percent_encode_path(&path)),
            PercentEncodingMode::Single => path,
        };
        let payload_hash = Self::payload_hash(req.body());

        let date_time = format_date_time(params.time);
        let (signed_headers, canonical_headers) =
            Self::headers(req, params, &payload_hash, &date_time)?;
        let signed_headers = SignedHeaders::new(signed_headers);

        let security_token = match params.settings.session_token_mode {
            SessionTokenMode::Include => creds.session_token(),
            SessionTokenMode::Exclude => None,
        };

        let values = match params.settings.signature_location {
            SignatureLocation::Headers => SignatureValues::Headers(HeaderValues {
                content_sha256: payload_hash,
                date_time,
                security_token,
                signed_headers,
            }),
            SignatureLocation::QueryParams => {
                let scope = SigningScope {
                    time: params.time,
                    region: params.region,
                    service: params.name,
                };
                SignatureValues::QueryParams(QueryParamValues {
                    algorithm: HMAC_256,
                    content_sha256: payload_hash,
                    credential: format!("{}/{}", creds.access_key_id(), scope),
                    date_time,
                    expires: params
                        .settings
                        .expires_in
                        .expect("presigning requires expires_in")
                        .as_secs()
                        .to_string(),
                    security_token,
                    signed_headers,
                })
            }
        };

        let creq = CanonicalRequest {
            method: req.method(),
            path,
            params: Self::params(req.uri(), &values),
            headers: canonical_headers,
            values,
        };
        Ok(creq)
    }

    fn headers(
        req: &SignableRequest<'_>,
        params: &SigningParams<'_>,
        payload_hash: &str,
        date_time: &str,
    ) -> Result<(Vec<CanonicalHeaderName>, HeaderMap), CanonicalRequestError> {
        // Header computation:
        // The canonical request will include headers not present in the input. We need to clone and
        // normalize the headers from the original request and add:
        // - host
        // - x-amz-date
        // - x-amz-security-token (if provided)
        // - x-amz-content-sha256 (if requested by signing settings)
        let mut canonical_headers = HeaderMap::with_capacity(req.headers().len());
        for (name, value) in req.headers().iter() {
            // Using append instead of insert means this will not clobber headers that have the same lowercased name
            canonical_headers.append(
                HeaderName::from_str(&name.to_lowercase())?,
                normalize_header_value(value)?,
            );
        }

        Self::insert_host_header(&mut canonical_headers, req.uri())?;

        if params.settings.signature_location == SignatureLocation::Headers {
            let creds = params.credentials();
            Self::insert_date_header(&mut canonical_headers, date_time);

            if let Some(security_token) = creds.session_token() {
                let mut sec_header = HeaderValue::from_str(security_token)?;
                sec_header.set_sensitive(true);
                canonical_headers.insert(header::X_AMZ_SECURITY_TOKEN, sec_header);
            }

            if params.settings.payload_checksum_kind == PayloadChecksumKind::XAmzSha256 {
                let header = HeaderValue::from_str(payload_hash)?;
                canonical_headers.insert(header::X_AMZ_CONTENT_SHA_256, header);
            }
        }

        let mut signed_headers = Vec::with_capacity(canonical_headers.len());
        for name in canonical_headers.keys() {
            if let Some(excluded_headers) = params.settings.excluded_headers.as_ref() {
                if excluded_headers.iter().any(|it| it.as_ref() == name.as_str()) {
                    continue;
                }
            }

            if params.settings.session_token_mode == SessionTokenMode::Exclude
                && name.as_str() == header::X_AMZ_SECURITY_TOKEN
            {
                continue;
            }

            if params.settings.signature_location == SignatureLocation::QueryParams {
                // content-type/content-length are excluded from presigned URLs since the
                // HTTP client that eventually issues the request may set them differently,
                // and x-amz-user-agent is rewritten by SDK middleware after presigning.
                if name.as_str() == "content-type"
                    || name.as_str() == "content-length"
                    || name.as_str() == header::X_AMZ_USER_AGENT
                {
                    continue;
                }
            }

            let always_signed = ALWAYS_SIGNED_HEADERS.contains(&name.as_str())
                || name.as_str().starts_with("x-amz-");
            if !always_signed {
                if let Some(should_sign_header) = params.settings.should_sign_header {
                    if !should_sign_header(name.as_str()) {
                        continue;
                    }
                }
            }

            signed_headers.push(CanonicalHeaderName(name.clone()));
        }

        Ok((signed_headers, canonical_headers))
    }

    fn payload_hash<'b>(body: &'b SignableBody<'b>) -> Cow<'b, str> {
        // Payload hash computation
        //
        // Based on the input body, set the payload_hash of the canonical request:
        // Either:
        // - compute a hash
        // - use the precomputed hash
        // - use `UnsignedPayload`
        // - use one of the streaming sentinels for `aws-chunked` requests
        match body {
            SignableBody::Bytes(data) => Cow::Owned(sha256_hex_string(data)),
            SignableBody::Precomputed(digest) => Cow::Borrowed(digest.as_str()),
            SignableBody::UnsignedPayload => Cow::Borrowed(UNSIGNED_PAYLOAD),
            SignableBody::StreamingHmacSha256Payload => {
                Cow::Borrowed(streaming::STREAMING_HMAC_256_PAYLOAD)
            }
            SignableBody::StreamingHmacSha256PayloadTrailer => {
                Cow::Borrowed(streaming::STREAMING_HMAC_256_PAYLOAD_TRAILER)
            }
            SignableBody::StreamingUnsignedPayloadTrailer => {
                Cow::Borrowed(streaming::STREAMING_UNSIGNED_PAYLOAD_TRAILER)
            }
        }
    }

    fn params(uri: &Uri, values: &SignatureValues<'_>) -> Option<String> {
        let mut params: Vec<(Cow<'_, str>, Cow<'_, str>)> =
            form_urlencoded::parse(uri.query().unwrap_or_default().as_bytes()).collect();
        fn add_param<'a>(params: &mut Vec<(Cow<'a, str>, Cow<'a, str>)>, k: &'a str, v: &'a str) {
            params.push((Cow::Borrowed(k), Cow::Borrowed(v)));
        }

        if let SignatureValues::QueryParams(values) = values {
            add_param(&mut params, param::X_AMZ_ALGORITHM, values.algorithm);
            add_param(&mut params, param::X_AMZ_CREDENTIAL, &values.credential);
            add_param(&mut params, param::X_AMZ_DATE, &values.date_time);
            add_param(&mut params, param::X_AMZ_EXPIRES, &values.expires);
            add_param(
                &mut params,
                param::X_AMZ_SIGNED_HEADERS,
                values.signed_headers.as_str(),
            );

            if let Some(security_token) = values.security_token {
                add_param(&mut params, param::X_AMZ_SECURITY_TOKEN, security_token);
            }
        }

        if params.is_empty() {
            return None;
        }

        // Entries are ordered by their _encoded_ form, key first, then value.
        let mut encoded: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (percent_encode_query(k), percent_encode_query(v)))
            .collect();
        encoded.sort();

        let mut out = String::new();
        for (i, (key, value)) in encoded.iter().enumerate() {
            if i > 0 {
                out.push('&');
            }
            out.push_str(key);
            out.push('=');
            out.push_str(value);
        }
        Some(out)
    }

    fn insert_host_header(
        canonical_headers: &mut HeaderMap<HeaderValue>,
        uri: &Uri,
    ) -> Result<HeaderValue, CanonicalRequestError> {
        match canonical_headers.get(&HOST) {
            Some(header) => Ok(header.clone()),
            None => {
                let host = uri
                    .host()
                    .ok_or_else(CanonicalRequestError::missing_authority)?;
                // The default port for the scheme is not part of the host header.
                let header = match (uri.scheme_str(), uri.port_u16()) {
                    (_, None) => HeaderValue::from_str(host)?,
                    (Some("http"), Some(80)) | (Some("https"), Some(443)) => {
                        HeaderValue::from_str(host)?
                    }
                    (_, Some(port)) => HeaderValue::from_str(&format!("{host}:{port}"))?,
                };
                canonical_headers.insert(HOST, header.clone());
                Ok(header)
            }
        }
    }

    fn insert_date_header(
        canonical_headers: &mut HeaderMap<HeaderValue>,
        date_time: &str,
    ) -> HeaderValue {
        let x_amz_date = HeaderName::from_static(header::X_AMZ_DATE);
        let date_header = HeaderValue::try_from(date_time).expect("date is valid header value");
        canonical_headers.insert(x_amz_date, date_header.clone());
        date_header
    }

    fn header_values_for(&self, key: impl AsHeaderName) -> String {
        let values: Vec<&str> = self
            .headers
            .get_all(key)
            .into_iter()
            .map(|value| {
                std::str::from_utf8(value.as_bytes())
                    .expect("header values were validated as UTF-8 when the map was built")
            })
            .collect();
        values.join(",")
    }
}

impl<'a> fmt::Display for CanonicalRequest<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.path)?;
        writeln!(f, "{}", self.params.as_deref().unwrap_or(""))?;
        // write out _all_ the headers
        for header in self.values.signed_headers().iter() {
            write!(f, "{}:", header.as_str())?;
            writeln!(f, "{}", self.header_values_for(header.as_str()))?;
        }
        writeln!(f)?;
        // write out the signed headers
        writeln!(f, "{}", self.values.signed_headers().as_str())?;
        write!(f, "{}", self.values.content_sha256())?;
        Ok(())
    }
}

#[derive(Debug, PartialEq, Default)]
pub(crate) struct SignedHeaders {
    headers: Vec<CanonicalHeaderName>,
    formatted: String,
}

impl SignedHeaders {
    fn new(mut headers: Vec<CanonicalHeaderName>) -> Self {
        headers.sort();
        let formatted = Self::fmt(&headers);
        SignedHeaders { headers, formatted }
    }

    fn fmt(headers: &[CanonicalHeaderName]) -> String {
        let mut value = String::new();
        let mut iter = headers.iter().peekable();
        while let Some(next) = iter.next() {
            value += next.0.as_str();
            if iter.peek().is_some() {
                value.push(';');
            }
        }
        value
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.formatted
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &CanonicalHeaderName> {
        self.headers.iter()
    }
}

impl fmt::Display for SignedHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted)
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) struct CanonicalHeaderName(HeaderName);

impl CanonicalHeaderName {
    pub(crate) fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl PartialOrd for CanonicalHeaderName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CanonicalHeaderName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.as_str().cmp(other.0.as_str())
    }
}

#[derive(PartialEq, Debug, Clone)]
pub(crate) struct SigningScope<'a> {
    pub(crate) time: SystemTime,
    pub(crate) region: &'a str,
    pub(crate) service: &'a str,
}

impl<'a> fmt::Display for SigningScope<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/aws4_request",
            format_date(self.time),
            self.region,
            self.service
        )
    }
}

#[derive(PartialEq, Debug, Clone)]
pub(crate) struct StringToSign<'a> {
    pub(crate) scope: SigningScope<'a>,
    pub(crate) time: SystemTime,
    pub(crate) region: &'a str,
    pub(crate) service: &'a str,
    pub(crate) hashed_creq: &'a str,
}

impl<'a> StringToSign<'a> {
    pub(crate) fn new(
        time: SystemTime,
        region: &'a str,
        service: &'a str,
        hashed_creq: &'a str,
    ) -> Self {
        let scope = SigningScope {
            time,
            region,
            service,
        };
        Self {
            scope,
            time,
            region,
            service,
            hashed_creq,
        }
    }
}

impl<'a> fmt::Display for StringToSign<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{}\n{}\n{}",
            HMAC_256,
            format_date_time(self.time),
            self.scope,
            self.hashed_creq
        )
    }
}

/// Removes leading/trailing spaces and tabs, and collapses interior runs of
/// spaces and tabs into a single space. Runs inside double-quoted sections
/// are preserved untouched.
pub(crate) fn trim_all(text: &str) -> Cow<'_, str> {
    let text = text.trim_matches(|c| c == ' ' || c == '\t');
    if !text.contains("  ") && !text.contains('\t') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut in_quotes = false;
    let mut in_whitespace = false;
    for c in text.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                in_whitespace = false;
                out.push(c);
            }
            ' ' | '\t' if !in_quotes => {
                if !in_whitespace {
                    out.push(' ');
                }
                in_whitespace = true;
            }
            _ => {
                in_whitespace = false;
                out.push(c);
            }
        }
    }
    Cow::Owned(out)
}

/// Works just like [`trim_all`] but returns a `HeaderValue`. Values containing
/// a carriage return or newline are rejected rather than guessed at.
pub(crate) fn normalize_header_value(
    header_value: &str,
) -> Result<HeaderValue, CanonicalRequestError> {
    if header_value.bytes().any(|b| b == b'\r' || b == b'\n') {
        return Err(CanonicalRequestError::newline_in_header_value());
    }
    HeaderValue::from_str(&trim_all(header_value)).map_err(CanonicalRequestError::from)
}

#[cfg(test)]
mod tests {
    use super::{normalize_header_value, trim_all, CanonicalRequest, StringToSign};
    use crate::date_time::test_parsers::parse_date_time;
    use crate::http_request::test::{
        iam_request, test_credentials, IAM_CANONICAL_REQUEST, IAM_STRING_TO_SIGN,
    };
    use crate::http_request::{
        PayloadChecksumKind, PercentEncodingMode, SignableBody, SignableRequest,
        SignatureLocation, SigningParams, SigningSettings, UriPathNormalizationMode,
    };
    use crate::sign::v4::sha256_hex_string;
    use aws_credential_types::Credentials;
    use pretty_assertions::assert_eq;
    use std::borrow::Cow;
    use std::iter;
    use std::time::Duration;

    fn iam_signing_params<'a>(
        credentials: &'a Credentials,
        settings: SigningSettings,
    ) -> SigningParams<'a> {
        SigningParams::builder()
            .credentials(credentials)
            .region("us-east-1")
            .name("iam")
            .time(parse_date_time("20150830T123600Z").unwrap())
            .settings(settings)
            .build()
            .unwrap()
    }

    #[test]
    fn test_iam_canonical_request() {
        let credentials = test_credentials();
        let params = iam_signing_params(&credentials, SigningSettings::default());
        let req = iam_request();
        let creq = CanonicalRequest::from(&req, &params).unwrap();
        assert_eq!(IAM_CANONICAL_REQUEST, creq.to_string());
    }

    #[test]
    fn test_iam_string_to_sign() {
        let time = parse_date_time("20150830T123600Z").unwrap();
        let hashed_creq = sha256_hex_string(IAM_CANONICAL_REQUEST);
        let sts = StringToSign::new(time, "us-east-1", "iam", &hashed_creq);
        assert_eq!(IAM_STRING_TO_SIGN, sts.to_string());
    }

    #[test]
    fn test_set_xamz_sha_256() {
        let credentials = test_credentials();
        let settings = SigningSettings {
            payload_checksum_kind: PayloadChecksumKind::XAmzSha256,
            ..Default::default()
        };
        let params = iam_signing_params(&credentials, settings);
        let req = iam_request();
        let creq = CanonicalRequest::from(&req, &params).unwrap();
        assert_eq!(
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
            creq.values.content_sha256()
        );
        assert_eq!(
            "content-type;host;x-amz-content-sha256;x-amz-date",
            creq.values.signed_headers().as_str()
        );
    }

    #[test]
    fn test_unsigned_payload() {
        let credentials = test_credentials();
        let params = iam_signing_params(&credentials, SigningSettings::default());
        let req = SignableRequest::new(
            "GET",
            "https://iam.amazonaws.com/",
            iter::empty(),
            SignableBody::UnsignedPayload,
        )
        .unwrap();
        let creq = CanonicalRequest::from(&req, &params).unwrap();
        assert_eq!("UNSIGNED-PAYLOAD", creq.values.content_sha256());
        assert!(creq.to_string().ends_with("UNSIGNED-PAYLOAD"));
    }

    #[test]
    fn test_streaming_payload_sentinels() {
        let credentials = test_credentials();
        let params = iam_signing_params(&credentials, SigningSettings::default());
        for (body, expected) in [
            (
                SignableBody::StreamingHmacSha256Payload,
                "STREAMING-AWS4-HMAC-SHA256-PAYLOAD",
            ),
            (
                SignableBody::StreamingHmacSha256PayloadTrailer,
                "STREAMING-AWS4-HMAC-SHA256-PAYLOAD-TRAILER",
            ),
            (
                SignableBody::StreamingUnsignedPayloadTrailer,
                "STREAMING-UNSIGNED-PAYLOAD-TRAILER",
            ),
        ] {
            let req =
                SignableRequest::new("PUT", "https://iam.amazonaws.com/", iter::empty(), body)
                    .unwrap();
            let creq = CanonicalRequest::from(&req, &params).unwrap();
            assert_eq!(expected, creq.values.content_sha256());
        }
    }

    #[test]
    fn test_precomputed_payload() {
        let payload_hash = "44ce7dd67c959e0d3524ffac1771dfbba87d2b6b4b4e99e42034a8b803f8b072";
        let credentials = test_credentials();
        let params = iam_signing_params(&credentials, SigningSettings::default());
        let req = SignableRequest::new(
            "PUT",
            "https://iam.amazonaws.com/",
            iter::empty(),
            SignableBody::Precomputed(String::from(payload_hash)),
        )
        .unwrap();
        let creq = CanonicalRequest::from(&req, &params).unwrap();
        assert_eq!(payload_hash, creq.values.content_sha256());
        assert!(creq.to_string().ends_with(payload_hash));
    }

    #[test]
    fn test_repeated_header() {
        let credentials = test_credentials();
        let params = iam_signing_params(&credentials, SigningSettings::default());
        let headers = [
            ("x-amz-object-attributes", "Checksum"),
            ("x-amz-object-attributes", "ObjectSize"),
        ];
        let req = SignableRequest::new(
            "GET",
            "https://iam.amazonaws.com/",
            headers.iter().copied(),
            SignableBody::Bytes(&[]),
        )
        .unwrap();
        let creq = CanonicalRequest::from(&req, &params).unwrap();

        assert_eq!(
            "host;x-amz-date;x-amz-object-attributes",
            creq.values.signed_headers().as_str()
        );
        assert_eq!(
            "Checksum,ObjectSize",
            creq.header_values_for("x-amz-object-attributes")
        );
    }

    #[test]
    fn test_default_port_is_stripped_from_host() {
        let credentials = test_credentials();
        let params = iam_signing_params(&credentials, SigningSettings::default());
        let req = SignableRequest::new(
            "GET",
            "https://iam.amazonaws.com:443/",
            iter::empty(),
            SignableBody::Bytes(&[]),
        )
        .unwrap();
        let creq = CanonicalRequest::from(&req, &params).unwrap();
        assert_eq!("iam.amazonaws.com", creq.header_values_for("host"));
    }

    #[test]
    fn test_custom_port_is_kept_in_host() {
        let credentials = test_credentials();
        let params = iam_signing_params(&credentials, SigningSettings::default());
        let req = SignableRequest::new(
            "GET",
            "http://localhost:8443/",
            iter::empty(),
            SignableBody::Bytes(&[]),
        )
        .unwrap();
        let creq = CanonicalRequest::from(&req, &params).unwrap();
        assert_eq!("localhost:8443", creq.header_values_for("host"));
    }

    #[test]
    fn test_duplicate_query_keys_sort_by_value() {
        let credentials = test_credentials();
        let params = iam_signing_params(&credentials, SigningSettings::default());
        let req = SignableRequest::new(
            "GET",
            "https://iam.amazonaws.com/?key=zebra&key=apple",
            iter::empty(),
            SignableBody::Bytes(&[]),
        )
        .unwrap();
        let creq = CanonicalRequest::from(&req, &params).unwrap();
        assert_eq!(Some("key=apple&key=zebra"), creq.params.as_deref());
    }

    #[test]
    fn test_tilde_and_unreserved_in_query() {
        let credentials = test_credentials();
        let params = iam_signing_params(&credentials, SigningSettings::default());
        let req = SignableRequest::new(
            "GET",
            "https://s3.us-east-1.amazonaws.com/my-bucket?list-type=2&prefix=~objprefix&single&k=&unreserved=-_.~",
            iter::empty(),
            SignableBody::Bytes(&[]),
        )
        .unwrap();
        let creq = CanonicalRequest::from(&req, &params).unwrap();
        assert_eq!(
            Some("k=&list-type=2&prefix=~objprefix&single=&unreserved=-_.~"),
            creq.params.as_deref(),
        );
    }

    #[test]
    fn test_double_encode_path() {
        let credentials = test_credentials();
        let params = iam_signing_params(&credentials, SigningSettings::default());
        let req = SignableRequest::new(
            "GET",
            "https://example.amazonaws.com/example/file%20name.txt",
            iter::empty(),
            SignableBody::Bytes(&[]),
        )
        .unwrap();
        let creq = CanonicalRequest::from(&req, &params).unwrap();
        assert_eq!("/example/file%2520name.txt", creq.path);
    }

    #[test]
    fn test_path_normalization() {
        let credentials = test_credentials();
        let params = iam_signing_params(&credentials, SigningSettings::default());
        let req = SignableRequest::new(
            "GET",
            "https://example.amazonaws.com/a/b/../c//d",
            iter::empty(),
            SignableBody::Bytes(&[]),
        )
        .unwrap();
        let creq = CanonicalRequest::from(&req, &params).unwrap();
        assert_eq!("/a/c/d", creq.path);
    }

    #[test]
    fn test_s3_path_is_passed_through_unchanged() {
        let credentials = test_credentials();
        let settings = SigningSettings {
            percent_encoding_mode: PercentEncodingMode::Single,
            uri_path_normalization_mode: UriPathNormalizationMode::Disabled,
            ..Default::default()
        };
        let params = iam_signing_params(&credentials, settings);
        let req = SignableRequest::new(
            "GET",
            "https://bucket.s3.amazonaws.com//key/./with%20space",
            iter::empty(),
            SignableBody::Bytes(&[]),
        )
        .unwrap();
        let creq = CanonicalRequest::from(&req, &params).unwrap();
        assert_eq!("//key/./with%20space", creq.path);
    }

    #[test]
    fn test_empty_path_canonicalizes_to_root() {
        let credentials = test_credentials();
        let params = iam_signing_params(&credentials, SigningSettings::default());
        let req = SignableRequest::new(
            "GET",
            "https://example.amazonaws.com",
            iter::empty(),
            SignableBody::Bytes(&[]),
        )
        .unwrap();
        let creq = CanonicalRequest::from(&req, &params).unwrap();
        assert_eq!("/", creq.path);
    }

    #[test]
    fn test_session_token_is_signed_by_default() {
        let credentials = Credentials::for_tests_with_session_token();
        let params = iam_signing_params(&credentials, SigningSettings::default());
        let req = iam_request();
        let creq = CanonicalRequest::from(&req, &params).unwrap();
        assert_eq!(
            "content-type;host;x-amz-date;x-amz-security-token",
            creq.values.signed_headers().as_str()
        );
    }

    #[test]
    fn test_should_sign_header_hook() {
        fn sign_nothing_extra(_name: &str) -> bool {
            false
        }
        let credentials = test_credentials();
        let settings = SigningSettings {
            should_sign_header: Some(sign_nothing_extra),
            ..Default::default()
        };
        let params = iam_signing_params(&credentials, settings);
        let req = SignableRequest::new(
            "GET",
            "https://iam.amazonaws.com/",
            [
                ("content-type", "application/json"),
                ("x-amz-custom", "value"),
                ("x-custom", "filtered-out"),
            ]
            .iter()
            .copied(),
            SignableBody::Bytes(&[]),
        )
        .unwrap();
        let creq = CanonicalRequest::from(&req, &params).unwrap();
        // host, content-* and x-amz-* are always signed; the hook only drops the rest
        assert_eq!(
            "content-type;host;x-amz-custom;x-amz-date",
            creq.values.signed_headers().as_str()
        );
    }

    #[test]
    fn test_presigned_query_params() {
        let credentials = test_credentials();
        let settings = SigningSettings {
            signature_location: SignatureLocation::QueryParams,
            expires_in: Some(Duration::from_secs(3600)),
            ..Default::default()
        };
        let params = iam_signing_params(&credentials, settings);
        let req = iam_request();
        let creq = CanonicalRequest::from(&req, &params).unwrap();
        // content-type is not signed when presigning
        assert_eq!("host", creq.values.signed_headers().as_str());
        let query = creq.params.as_deref().unwrap();
        assert!(query.contains("X-Amz-Algorithm=AWS4-HMAC-SHA256"));
        assert!(query.contains(
            "X-Amz-Credential=AKIDEXAMPLE%2F20150830%2Fus-east-1%2Fiam%2Faws4_request"
        ));
        assert!(query.contains("X-Amz-Date=20150830T123600Z"));
        assert!(query.contains("X-Amz-Expires=3600"));
        assert!(query.contains("X-Amz-SignedHeaders=host"));
    }

    #[test]
    fn test_trim_all_handles_tabs_and_quotes() {
        assert_eq!(Cow::Borrowed("don't touch me"), trim_all("don't touch me"));
        assert_eq!("trim left", trim_all("\t trim left"));
        assert_eq!("trim right", trim_all("trim right \t"));
        assert_eq!("collapse interior runs", trim_all("collapse \t interior\t\truns"));
        assert_eq!("", trim_all(" \t "));
        assert_eq!(
            "quoted \"  stays  \" intact",
            trim_all("quoted  \"  stays  \"  intact")
        );
    }

    #[test]
    fn test_normalize_header_value_rejects_newlines() {
        assert!(normalize_header_value("ok value").is_ok());
        assert!(normalize_header_value("bad\r\nvalue").is_err());
        assert!(normalize_header_value("bad\nvalue").is_err());
    }
}
