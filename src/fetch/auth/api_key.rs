use crate::fetch::client::HttpClient;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};

/// An [`HttpClient`] wrapper that injects an API key as an HTTP header.
///
/// Used by the HTTP sink to authenticate against the submission endpoint.
/// The header is validated once at construction so `execute` never fails on
/// a malformed name or value.
pub struct ApiKey<C> {
    pub inner: C,
    header_name: HeaderName,
    value: HeaderValue,
}

impl<C> ApiKey<C> {
    pub fn new(inner: C, header_name: &str, key: &str) -> Result<Self> {
        let header_name = HeaderName::from_bytes(header_name.as_bytes())?;
        let mut value = HeaderValue::from_str(key)?;
        value.set_sensitive(true);
        Ok(Self {
            inner,
            header_name,
            value,
        })
    }

    /// Convenience constructor that uses `Authorization: Bearer <key>`.
    pub fn bearer(inner: C, key: &str) -> Result<Self> {
        Self::new(inner, "Authorization", &format!("Bearer {key}"))
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for ApiKey<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut()
            .insert(self.header_name.clone(), self.value.clone());
        self.inner.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoAuth;

    #[async_trait]
    impl HttpClient for EchoAuth {
        async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            let auth = req
                .headers()
                .get("authorization")
                .map(|v| v.to_str().unwrap().to_string())
                .unwrap_or_default();
            Ok(http::Response::new(auth).into())
        }
    }

    #[tokio::test]
    async fn test_bearer_sets_authorization_header() {
        let client = ApiKey::bearer(EchoAuth, "abc123").unwrap();
        let req = reqwest::Request::new(
            reqwest::Method::POST,
            "http://localhost/submit".parse().unwrap(),
        );

        let resp = client.execute(req).await.unwrap();
        assert_eq!(resp.text().await.unwrap(), "Bearer abc123");
    }

    #[test]
    fn test_invalid_header_name_is_rejected() {
        assert!(ApiKey::new(EchoAuth, "bad header", "x").is_err());
    }
}
