//! Client request metadata.
//!
//! [`RequestContext`] carries the handful of client attributes the engine
//! records alongside a submission. It can be built from a header map, from a
//! CGI-style META dict, or field by field.

use std::collections::HashMap;

use http::header::{HeaderName, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use http::HeaderMap;
use serde::{Deserialize, Serialize};

/// The client attributes of the request that carried a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// The client IP address.
    pub ip: Option<String>,
    /// The `User-Agent` header.
    pub user_agent: Option<String>,
    /// The `Accept-Language` header.
    pub accept_language: Option<String>,
    /// The `Referer` header.
    pub referrer: Option<String>,
}

impl RequestContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a context from request headers and the peer address.
    ///
    /// Header values that are not valid visible ASCII are treated as absent.
    pub fn from_headers(headers: &HeaderMap, remote_addr: Option<&str>) -> Self {
        let header = |name: HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };

        Self {
            ip: remote_addr.map(String::from),
            user_agent: header(USER_AGENT),
            accept_language: header(ACCEPT_LANGUAGE),
            referrer: header(REFERER),
        }
    }

    /// Builds a context from a CGI-style META dict.
    ///
    /// Reads `REMOTE_ADDR`, `HTTP_USER_AGENT`, `HTTP_ACCEPT_LANGUAGE`, and
    /// `HTTP_REFERER`.
    pub fn from_meta(meta: &HashMap<String, String>) -> Self {
        Self {
            ip: meta.get("REMOTE_ADDR").cloned(),
            user_agent: meta.get("HTTP_USER_AGENT").cloned(),
            accept_language: meta.get("HTTP_ACCEPT_LANGUAGE").cloned(),
            referrer: meta.get("HTTP_REFERER").cloned(),
        }
    }

    /// Sets the client IP address.
    #[must_use]
    pub fn ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the accepted languages.
    #[must_use]
    pub fn accept_language(mut self, accept_language: impl Into<String>) -> Self {
        self.accept_language = Some(accept_language.into());
        self
    }

    /// Sets the referrer.
    #[must_use]
    pub fn referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }
}
