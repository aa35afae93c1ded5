//! Proxy client for the OpenRouteService directions and elevation APIs.
//!
//! Responses pass through unmodified: the upstream status code and body are
//! handed back verbatim. The API key is injected as a standard
//! bearer-prefixed Authorization header from startup configuration, never
//! read ad hoc per call.

use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, ClientBuilder, StatusCode};
use tracing::info;

use crate::error::Result;

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("jeju-barrier/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to create HTTP client")
});

/// A response passed through from the upstream service.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Client for the external directions/elevation provider.
#[derive(Debug, Clone)]
pub struct DirectionsClient {
    base_url: String,
    api_key: String,
}

impl DirectionsClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Forward a walking-directions query. `start` and `end` are "lon,lat"
    /// pairs as the provider expects them.
    pub async fn accessible_route(&self, start: &str, end: &str) -> Result<UpstreamResponse> {
        let url = format!("{}/v2/directions/foot-walking", self.base_url);
        self.forward(&url, &[("start", start), ("end", end)]).await
    }

    /// Forward an elevation query for a standalone coordinate parameter.
    pub async fn elevation(&self, coordinates: &str) -> Result<UpstreamResponse> {
        let url = format!("{}/elevation/point", self.base_url);
        self.forward(&url, &[("geometry", coordinates)]).await
    }

    async fn forward(&self, url: &str, query: &[(&str, &str)]) -> Result<UpstreamResponse> {
        let response = HTTP_CLIENT
            .get(url)
            .query(query)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .send()
            .await?;

        let status = response.status();
        info!(%url, %status, "forwarded upstream request");

        let body = response.text().await?;
        Ok(UpstreamResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_route_forwards_bearer_header_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/directions/foot-walking"))
            .and(query_param("start", "126.560,33.450"))
            .and(query_param("end", "126.570,33.460"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"routes":[{"summary":{}}]}"#),
            )
            .mount(&mock_server)
            .await;

        let client = DirectionsClient::new(&mock_server.uri(), "test-key");
        let resp = client
            .accessible_route("126.560,33.450", "126.570,33.460")
            .await
            .unwrap();

        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body, r#"{"routes":[{"summary":{}}]}"#);
    }

    #[tokio::test]
    async fn test_upstream_error_status_passes_through() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/elevation/point"))
            .respond_with(ResponseTemplate::new(403).set_body_string(r#"{"error":"quota"}"#))
            .mount(&mock_server)
            .await;

        let client = DirectionsClient::new(&mock_server.uri(), "test-key");
        let resp = client.elevation("126.560,33.450").await.unwrap();

        assert_eq!(resp.status, StatusCode::FORBIDDEN);
        assert_eq!(resp.body, r#"{"error":"quota"}"#);
    }
}
