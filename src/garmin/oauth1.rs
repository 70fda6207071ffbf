// ABOUTME: OAuth 1.0a HMAC-SHA1 request signing for Garmin's OAuth service
// ABOUTME: Builds the signature base string and the Authorization header value
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! `OAuth1` signing
//!
//! Garmin's preauthorize and exchange endpoints still speak OAuth 1.0a. Only
//! the HMAC-SHA1 method is implemented since that is all Garmin accepts.

use base64::{engine::general_purpose::STANDARD, Engine};
use garmin_core::models::{OAuth1Token, OAuthConsumer};
use rand::{distributions::Alphanumeric, Rng};
use ring::hmac;
use url::Url;

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";
const NONCE_LENGTH: usize = 32;

/// RFC 3986 percent-encoding (everything but `A-Z a-z 0-9 - . _ ~`)
#[must_use]
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Signs requests with a consumer and an optional token
#[derive(Debug, Clone, Copy)]
pub struct OAuth1Signer<'a> {
    consumer: &'a OAuthConsumer,
    token: Option<&'a OAuth1Token>,
}

impl<'a> OAuth1Signer<'a> {
    /// Signer without a token (used for preauthorization)
    #[must_use]
    pub const fn new(consumer: &'a OAuthConsumer) -> Self {
        Self {
            consumer,
            token: None,
        }
    }

    /// Signer with a token (used for the `OAuth2` exchange)
    #[must_use]
    pub const fn with_token(consumer: &'a OAuthConsumer, token: &'a OAuth1Token) -> Self {
        Self {
            consumer,
            token: Some(token),
        }
    }

    /// `Authorization` header value with a fresh nonce and the current time
    #[must_use]
    pub fn authorization_header(
        &self,
        method: &str,
        url: &Url,
        form_params: &[(&str, &str)],
    ) -> String {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(NONCE_LENGTH)
            .map(char::from)
            .collect();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.authorization_header_with(method, url, form_params, &nonce, &timestamp)
    }

    /// `Authorization` header value for a fixed nonce and timestamp
    #[must_use]
    pub fn authorization_header_with(
        &self,
        method: &str,
        url: &Url,
        form_params: &[(&str, &str)],
        nonce: &str,
        timestamp: &str,
    ) -> String {
        let mut oauth_params = self.oauth_params(nonce, timestamp);
        let signature = self.sign(method, url, form_params, &oauth_params);
        oauth_params.push(("oauth_signature", signature));
        oauth_params.sort_by(|a, b| a.0.cmp(&b.0));

        let fields = oauth_params
            .iter()
            .map(|(key, value)| format!("{key}=\"{}\"", percent_encode(value)))
            .collect::<Vec<_>>()
            .join(", ");
        format!("OAuth {fields}")
    }

    fn oauth_params(&self, nonce: &str, timestamp: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("oauth_consumer_key", self.consumer.consumer_key.clone()),
            ("oauth_nonce", nonce.to_owned()),
            ("oauth_signature_method", SIGNATURE_METHOD.to_owned()),
            ("oauth_timestamp", timestamp.to_owned()),
            ("oauth_version", OAUTH_VERSION.to_owned()),
        ];
        if let Some(token) = self.token {
            params.push(("oauth_token", token.oauth_token.clone()));
        }
        params
    }

    fn sign(
        &self,
        method: &str,
        url: &Url,
        form_params: &[(&str, &str)],
        oauth_params: &[(&'static str, String)],
    ) -> String {
        let base = signature_base_string(method, url, form_params, oauth_params);
        let signing_key = format!(
            "{}&{}",
            percent_encode(&self.consumer.consumer_secret),
            percent_encode(self.token.map_or("", |t| t.oauth_token_secret.as_str()))
        );
        let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, signing_key.as_bytes());
        STANDARD.encode(hmac::sign(&key, base.as_bytes()).as_ref())
    }
}

/// Base string URI: scheme, host, non-default port and path, without query
fn base_string_uri(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().to_lowercase();
    let port = url.port().map_or_else(String::new, |p| format!(":{p}"));
    format!("{}://{host}{port}{}", url.scheme(), url.path())
}

/// RFC 5849 section 3.4.1 signature base string
pub(crate) fn signature_base_string(
    method: &str,
    url: &Url,
    form_params: &[(&str, &str)],
    oauth_params: &[(&'static str, String)],
) -> String {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (percent_encode(&k), percent_encode(&v)))
        .chain(
            form_params
                .iter()
                .map(|(k, v)| (percent_encode(k), percent_encode(v))),
        )
        .chain(
            oauth_params
                .iter()
                .map(|(k, v)| (percent_encode(k), percent_encode(v))),
        )
        .collect();
    params.sort();

    let normalized = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(&base_string_uri(url)),
        percent_encode(&normalized)
    )
}
