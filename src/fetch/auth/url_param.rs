use crate::fetch::client::HttpClient;
use async_trait::async_trait;

/// An [`HttpClient`] wrapper that appends an API key as a URL query parameter.
///
/// COtrip expects its token as `?apiKey=<token>` on every listing request.
pub struct UrlParam<C> {
    pub inner: C,
    pub param_name: String,
    pub key: String,
}

impl<C> UrlParam<C> {
    pub fn api_key(inner: C, key: String) -> Self {
        Self {
            inner,
            param_name: "apiKey".to_string(),
            key,
        }
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for UrlParam<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.url_mut()
            .query_pairs_mut()
            .append_pair(&self.param_name, &self.key);
        self.inner.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        urls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl HttpClient for Recorder {
        async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            self.urls.lock().unwrap().push(req.url().to_string());
            Ok(http::Response::new("{}").into())
        }
    }

    #[tokio::test]
    async fn test_api_key_is_appended_to_query() {
        let client = UrlParam::api_key(Recorder::default(), "secret".to_string());
        let req = reqwest::Request::new(
            reqwest::Method::GET,
            "https://data.cotrip.org/api/v1/signs?offset=7".parse().unwrap(),
        );

        client.execute(req).await.unwrap();

        let urls = client.inner.urls.lock().unwrap();
        assert_eq!(
            urls.as_slice(),
            ["https://data.cotrip.org/api/v1/signs?offset=7&apiKey=secret"]
        );
    }
}
