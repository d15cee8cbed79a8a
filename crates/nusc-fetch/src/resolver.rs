//! Time-limited download URL resolution.
//!
//! Each archive is fetched through a fresh, short-lived direct URL obtained
//! from the archive API with the current identity token.

use serde::Deserialize;
use std::sync::Arc;

use crate::config::Region;
use crate::error::Result;
use crate::http::HttpTransport;

/// Base endpoint for archive URL resolution.
pub const ARCHIVE_ENDPOINT: &str =
    "https://o9k5xn5546.execute-api.us-east-1.amazonaws.com/v1/archives/v1.0";

const PROJECT: &str = "nuScenes";

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    url: Option<String>,
}

/// Resolves catalog filenames into direct download URLs.
pub struct UrlResolver {
    transport: Arc<dyn HttpTransport>,
    region: Region,
}

impl UrlResolver {
    pub fn new(transport: Arc<dyn HttpTransport>, region: Region) -> Self {
        Self { transport, region }
    }

    /// Request a fresh download URL for `filename`.
    ///
    /// Returns `Ok(None)` on a non-200 response or a response without a
    /// `url` field. The returned URL is not validated beyond its presence.
    pub async fn resolve(&self, filename: &str, token: &str) -> Result<Option<String>> {
        let url = format!(
            "{}/{}?region={}&project={}",
            ARCHIVE_ENDPOINT, filename, self.region, PROJECT
        );
        let bearer = format!("Bearer {}", token);
        let headers = [
            ("Authorization", bearer.as_str()),
            ("Content-Type", "application/json"),
        ];

        let response = self.transport.get(&url, &headers).await?;
        if response.status != 200 {
            log::warn!(
                "URL resolution for {} rejected (HTTP {})",
                filename,
                response.status
            );
            return Ok(None);
        }

        match serde_json::from_str::<ArchiveResponse>(&response.body) {
            Ok(ArchiveResponse { url: Some(url) }) => Ok(Some(url)),
            Ok(ArchiveResponse { url: None }) => {
                log::warn!("URL resolution response for {} had no url field", filename);
                Ok(None)
            }
            Err(e) => {
                log::warn!("malformed URL resolution response for {}: {}", filename, e);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpResponse, Progress};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;

    struct GetTransport {
        response: HttpResponse,
        requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl GetTransport {
        fn new(response: HttpResponse) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HttpTransport for GetTransport {
        async fn post(
            &self,
            _url: &str,
            _headers: &[(&str, &str)],
            _body: String,
        ) -> Result<HttpResponse> {
            unimplemented!("not used by the resolver")
        }

        async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse> {
            self.requests.lock().unwrap().push((
                url.to_string(),
                headers
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ));
            Ok(self.response.clone())
        }

        async fn download(&self, _url: &str, _dest: &Path, _progress: Progress<'_>) -> Result<u64> {
            unimplemented!("not used by the resolver")
        }
    }

    #[tokio::test]
    async fn resolves_a_url() {
        let transport = Arc::new(GetTransport::new(HttpResponse::ok(
            r#"{"url":"https://signed.example.org/v1.0-trainval_meta.tgz?sig=abc"}"#,
        )));
        let resolver = UrlResolver::new(Arc::clone(&transport) as Arc<dyn HttpTransport>, Region::Us);

        let url = resolver
            .resolve("v1.0-trainval_meta.tgz", "tok")
            .await
            .unwrap();
        assert_eq!(
            url.as_deref(),
            Some("https://signed.example.org/v1.0-trainval_meta.tgz?sig=abc")
        );
    }

    #[tokio::test]
    async fn request_is_parameterized_and_authorized() {
        let transport = Arc::new(GetTransport::new(HttpResponse::ok(r#"{"url":"u"}"#)));
        let resolver =
            UrlResolver::new(Arc::clone(&transport) as Arc<dyn HttpTransport>, Region::Asia);
        resolver.resolve("v1.0-trainval01_blobs.tgz", "tok-9").await.unwrap();

        let requests = transport.requests.lock().unwrap();
        let (url, headers) = &requests[0];
        assert_eq!(
            url,
            &format!(
                "{}/v1.0-trainval01_blobs.tgz?region=asia&project=nuScenes",
                ARCHIVE_ENDPOINT
            )
        );
        assert!(headers.contains(&("Authorization".to_string(), "Bearer tok-9".to_string())));
    }

    #[tokio::test]
    async fn non_200_yields_absent_url() {
        let transport = Arc::new(GetTransport::new(HttpResponse::with_status(401, "expired")));
        let resolver = UrlResolver::new(transport as Arc<dyn HttpTransport>, Region::Us);

        let url = resolver.resolve("v1.0-trainval_meta.tgz", "stale").await.unwrap();
        assert!(url.is_none());
    }

    #[tokio::test]
    async fn missing_url_field_yields_absent_url() {
        let transport = Arc::new(GetTransport::new(HttpResponse::ok(r#"{"message":"ok"}"#)));
        let resolver = UrlResolver::new(transport as Arc<dyn HttpTransport>, Region::Us);

        let url = resolver.resolve("v1.0-trainval_meta.tgz", "tok").await.unwrap();
        assert!(url.is_none());
    }
}
