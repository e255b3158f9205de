use std::convert::Infallible;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        request::Parts,
    },
};
use percent_encoding::percent_decode;
use serde::de::DeserializeOwned;

use crate::error::{AppError, ValidationError};

/// Representation the client asked for. JSON when `Accept` mentions
/// `application/json`, HTML otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Html,
    Json,
}

impl Format {
    pub fn from_accept(accept: Option<&str>) -> Self {
        match accept {
            Some(v) if v.contains("application/json") => Format::Json,
            _ => Format::Html,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Format
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let accept = parts.headers.get(ACCEPT).and_then(|h| h.to_str().ok());
        Ok(Format::from_accept(accept))
    }
}

/// Url-encoded form body whose malformed input is reported as
/// `AppError::Validation` instead of a framework rejection.
#[derive(Debug)]
pub struct ValidatedForm<T>(pub T);

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .is_some_and(|ct| ct.starts_with(FORM_CONTENT_TYPE));
        if !is_form {
            return Err(ValidationError::new(
                "body",
                format!("expected a {FORM_CONTENT_TYPE} body"),
            )
            .into());
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ValidationError::new("body", e.body_text()))?;
        Ok(Self(parse_form(&body)?))
    }
}

/// Strict form decoding: every key and value must be valid UTF-8 once
/// percent-decoded, and no field may repeat.
pub fn parse_form<T: DeserializeOwned>(body: &[u8]) -> Result<T, ValidationError> {
    for pair in body.split(|b| *b == b'&').filter(|p| !p.is_empty()) {
        let mut parts = pair.splitn(2, |b| *b == b'=');
        let key = parts.next().unwrap_or_default();
        let value = parts.next().unwrap_or_default();

        let key = percent_decode(key)
            .decode_utf8()
            .map_err(|_| ValidationError::new("body", "form field name is not valid UTF-8"))?;
        if percent_decode(value).decode_utf8().is_err() {
            return Err(ValidationError::new(
                key.replace('+', " "),
                format!("{} is not valid UTF-8", key.replace('+', " ")),
            ));
        }
    }

    serde_urlencoded::from_bytes(body).map_err(|e| {
        let message = e.to_string();
        // serde names the offending field in backticks, e.g. "duplicate field `username`"
        let field = message
            .split('`')
            .nth(1)
            .map(str::to_owned)
            .unwrap_or_else(|| "body".into());
        ValidationError::new(field, message)
    })
}
