//! Trusted HTML fragments

use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// HTML produced by the markdown renderer.
///
/// Templates and responses insert it as-is; it must never be escaped again.
/// No sanitization happens here, the markdown source is the trust boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SafeHtml(String);

impl SafeHtml {
    /// Mark an HTML string as already safe to emit
    pub fn from_trusted(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SafeHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SafeHtml {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl IntoResponse for SafeHtml {
    fn into_response(self) -> Response {
        Html(self.0).into_response()
    }
}

/// Simple HTML escaping for untrusted text such as metadata values
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
