//! Shared validation of provider responses: status code, body presence,
//! Content-Type parsing and body decoding.

use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::fmt;

use crate::error::PlexTvError;
use crate::transport::TransportResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedFormat {
    Json,
    Xml,
}

impl ExpectedFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
        }
    }
}

impl fmt::Display for ExpectedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// A parsed `type[; charset=value]` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    pub mime_type: String,
    pub charset: Option<String>,
}

impl ContentType {
    pub fn parse(raw: &str) -> Option<Self> {
        let (mime_type, params) = match raw.split_once(';') {
            Some((mime_type, params)) => (mime_type, Some(params)),
            None => (raw, None),
        };

        if !is_token(mime_type, |c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '/')) {
            return None;
        }

        let charset = match params {
            None => None,
            Some(params) => {
                let params = params.trim_start();
                let (key, value) = params.split_once('=')?;
                if !key.eq_ignore_ascii_case("charset") {
                    return None;
                }
                if !is_token(value, |c| c.is_ascii_alphanumeric() || c == '-') {
                    return None;
                }
                Some(value.to_string())
            }
        };

        Some(Self {
            mime_type: mime_type.to_string(),
            charset,
        })
    }

    pub fn is(&self, expected: ExpectedFormat) -> bool {
        self.mime_type.eq_ignore_ascii_case(expected.mime_type())
    }
}

// Non-empty, starts and ends on an alphanumeric, every char accepted by `allowed`
fn is_token(s: &str, allowed: impl Fn(char) -> bool) -> bool {
    let starts = s.chars().next().is_some_and(|c| c.is_ascii_alphanumeric());
    let ends = s.chars().last().is_some_and(|c| c.is_ascii_alphanumeric());
    starts && ends && s.chars().all(allowed)
}

#[derive(Debug)]
pub struct ValidatedBody<'a> {
    pub body: &'a [u8],
    pub charset: Option<String>,
}

impl ValidatedBody<'_> {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, PlexTvError> {
        Ok(serde_json::from_slice(self.body)?)
    }

    /// Decodes the body as text using the declared charset (UTF-8 when none).
    pub fn text(&self) -> Result<Cow<'_, str>, PlexTvError> {
        let label = self.charset.as_deref().unwrap_or("utf-8").to_ascii_lowercase();
        match label.as_str() {
            "utf-8" | "utf8" => std::str::from_utf8(self.body)
                .map(Cow::Borrowed)
                .map_err(|e| PlexTvError::Xml(format!("invalid UTF-8 in body: {}", e))),
            "us-ascii" | "ascii" => {
                if self.body.is_ascii() {
                    // ASCII is a subset of UTF-8
                    std::str::from_utf8(self.body)
                        .map(Cow::Borrowed)
                        .map_err(|e| PlexTvError::Xml(e.to_string()))
                } else {
                    Err(PlexTvError::Xml("non-ASCII byte in us-ascii body".to_string()))
                }
            }
            "iso-8859-1" | "latin1" | "latin-1" => {
                Ok(Cow::Owned(self.body.iter().map(|&b| b as char).collect()))
            }
            _ => Err(PlexTvError::UnsupportedCharset(label)),
        }
    }
}

pub fn validate(
    response: &TransportResponse,
    expected: ExpectedFormat,
) -> Result<ValidatedBody<'_>, PlexTvError> {
    if response.status != 200 {
        tracing::warn!(status = response.status, "Unexpected HTTP status");
        return Err(PlexTvError::UnexpectedStatus(response.status));
    }

    if response.body.is_empty() {
        return Err(PlexTvError::EmptyBody);
    }

    let raw = response.content_type.as_deref().unwrap_or_default();
    let content_type =
        ContentType::parse(raw).ok_or_else(|| PlexTvError::UnparseableContentType(raw.to_string()))?;

    if !content_type.is(expected) {
        tracing::warn!(expected = %expected, actual = %content_type.mime_type, "Unexpected MIME-type");
        return Err(PlexTvError::UnexpectedContentType(content_type.mime_type));
    }

    Ok(ValidatedBody {
        body: &response.body,
        charset: content_type.charset,
    })
}
