use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use std::convert::Infallible;

/// Opaque credential of the authenticated caller. Validation happens at the
/// gateway; this service only forwards it verbatim on profile-service calls.
#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub authorization: Option<String>,
    pub cookie: Option<String>,
}

impl Caller {
    pub fn apply(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(authorization) = &self.authorization {
            request = request.header(AUTHORIZATION.as_str(), authorization.as_str());
        }
        if let Some(cookie) = &self.cookie {
            request = request.header(COOKIE.as_str(), cookie.as_str());
        }
        request
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        Ok(Caller {
            authorization: header(AUTHORIZATION),
            cookie: header(COOKIE),
        })
    }
}
