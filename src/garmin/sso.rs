// ABOUTME: Garmin SSO sign-in flow producing a service ticket from email and password
// ABOUTME: Scrapes the CSRF token, page title and ticket from the embedded sign-in widget
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Garmin SSO
//!
//! The sign-in widget is an HTML form, so the flow is:
//!
//! 1. `GET /sso/embed` to receive the session cookies
//! 2. `GET /sso/signin` and read the `_csrf` hidden field
//! 3. `POST /sso/signin` with the credentials
//! 4. Read the `<title>`: `Success` carries an `embed?ticket=...` link,
//!    anything mentioning `MFA` is a two-factor challenge
//!
//! The client passed in must have a cookie store.

use super::errors::GarminError;
use crate::config::GarminConfig;
use garmin_core::constants::garmin;
use regex::Regex;
use reqwest::{header, Client, Response, StatusCode};
use std::sync::LazyLock;
use tracing::debug;

static CSRF_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"name="_csrf"\s+value="(.+?)""#).ok());

static TITLE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)<title>(.+?)</title>").ok());

static TICKET_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"embed\?ticket=([^"]+)""#).ok());

const SUCCESS_TITLE: &str = "Success";

fn first_capture(pattern: &LazyLock<Option<Regex>>, text: &str) -> Option<String> {
    pattern
        .as_ref()?
        .captures(text)?
        .get(1)
        .map(|m| m.as_str().trim().to_owned())
}

/// Extract the CSRF token from the sign-in form
#[must_use]
pub fn extract_csrf(html: &str) -> Option<String> {
    first_capture(&CSRF_PATTERN, html)
}

/// Extract the page title
#[must_use]
pub fn extract_title(html: &str) -> Option<String> {
    first_capture(&TITLE_PATTERN, html)
}

/// Extract the service ticket from a successful sign-in page
#[must_use]
pub fn extract_ticket(html: &str) -> Option<String> {
    first_capture(&TICKET_PATTERN, html)
}

/// Decide what a sign-in response page means
///
/// # Errors
///
/// Returns the matching [`GarminError`] when the page is not a successful login.
pub fn classify_signin_page(html: &str) -> Result<String, GarminError> {
    let title = extract_title(html).unwrap_or_default();

    if title.contains("MFA") {
        return Err(GarminError::TwoFactorRequired);
    }

    if title != SUCCESS_TITLE {
        let lowered = title.to_lowercase();
        if lowered.contains("locked") || lowered.contains("verif") {
            return Err(GarminError::AccountLocked { title });
        }
        return Err(GarminError::InvalidCredentials { title });
    }

    extract_ticket(html).ok_or_else(|| {
        GarminError::UnexpectedResponse("sign-in succeeded but no ticket was found".into())
    })
}

/// Map SSO HTTP failures; a rejected form post shows up as 401 or 403
async fn check_sso_status(response: Response) -> Result<Response, GarminError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(GarminError::InvalidCredentials {
                title: format!("HTTP {}", status.as_u16()),
            })
        }
        StatusCode::TOO_MANY_REQUESTS => Err(GarminError::RateLimited { attempts: 1 }),
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(GarminError::Http {
                status: status.as_u16(),
                body: truncate(&body),
            })
        }
    }
}

pub(crate) fn truncate(body: &str) -> String {
    const MAX: usize = 512;
    if body.len() <= MAX {
        return body.to_owned();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

/// Run the sign-in flow and return the service ticket
///
/// # Errors
///
/// Returns [`GarminError`] for transport failures, rejected credentials,
/// two-factor challenges and unexpected pages.
pub async fn signin(
    client: &Client,
    config: &GarminConfig,
    email: &str,
    password: &str,
) -> Result<String, GarminError> {
    let sso_url = format!("{}/sso", config.sso_base_url);
    let embed_url = config.sso_embed_url();
    let signin_url = format!("{}{}", config.sso_base_url, garmin::SSO_SIGNIN_PATH);

    let embed_params = [
        ("id", "gauth-widget"),
        ("embedWidget", "true"),
        ("gauthHost", sso_url.as_str()),
    ];
    let signin_params = [
        ("id", "gauth-widget"),
        ("embedWidget", "true"),
        ("gauthHost", embed_url.as_str()),
        ("service", embed_url.as_str()),
        ("source", embed_url.as_str()),
        ("redirectAfterAccountLoginUrl", embed_url.as_str()),
        ("redirectAfterAccountCreationUrl", embed_url.as_str()),
    ];

    debug!("Opening Garmin SSO session");
    let response = client.get(&embed_url).query(&embed_params).send().await?;
    check_sso_status(response).await?;

    let response = client
        .get(&signin_url)
        .query(&signin_params)
        .header(header::REFERER, &embed_url)
        .send()
        .await?;
    let form = check_sso_status(response).await?.text().await?;
    let csrf = extract_csrf(&form).ok_or_else(|| {
        GarminError::UnexpectedResponse("sign-in form has no CSRF token".into())
    })?;

    debug!("Submitting Garmin SSO credentials");
    let response = client
        .post(&signin_url)
        .query(&signin_params)
        .header(header::REFERER, &signin_url)
        .form(&[
            ("username", email),
            ("password", password),
            ("embed", "true"),
            ("_csrf", csrf.as_str()),
        ])
        .send()
        .await?;
    let page = check_sso_status(response).await?.text().await?;

    classify_signin_page(&page)
}
