use anyhow::Result;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::models::image::ImageRecord;

const PROVIDER: &str = "flux";

/// Suffixes tried in order against the configured base URL.
const ENDPOINT_SUFFIXES: [&str; 4] = ["", "/generate", "/image", "/text2image"];

/// Client for a self-hosted Flux generation server. Deployments expose the
/// generator under differing paths, so several endpoints are probed.
#[derive(Clone)]
pub struct FluxClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl FluxClient {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        connect_timeout: Duration,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .user_agent("ContentExplorer/1.0")
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build Flux HTTP client: {e}"))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    #[must_use]
    pub fn candidates(&self) -> Vec<String> {
        ENDPOINT_SUFFIXES
            .iter()
            .map(|suffix| format!("{}{suffix}", self.base_url))
            .collect()
    }

    /// Returns the images of the first endpoint that yields any. Transport
    /// errors and non-2xx answers move on to the next candidate.
    pub async fn generate(&self, prompt: &str) -> Vec<ImageRecord> {
        for url in self.candidates() {
            match self.try_endpoint(&url, prompt).await {
                Ok(images) if !images.is_empty() => return images,
                Ok(_) => debug!(url = %url, "Flux endpoint returned no images"),
                Err(e) => debug!(url = %url, error = %e, "Flux endpoint failed"),
            }
        }
        Vec::new()
    }

    async fn try_endpoint(&self, url: &str, prompt: &str) -> Result<Vec<ImageRecord>> {
        let mut request = self
            .client
            .post(url)
            .json(&serde_json::json!({ "prompt": prompt }));

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            anyhow::bail!("Flux returned {}", response.status());
        }

        let data: Value = response.json().await?;
        Ok(images_from_response(&data))
    }
}

/// Accepts `{"images": [{url | b64 | image}]}` or a single top-level
/// `url`, `image` or `b64` field.
#[must_use]
pub fn images_from_response(data: &Value) -> Vec<ImageRecord> {
    let mut out: Vec<ImageRecord> = data
        .get("images")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(image_from_item).collect())
        .unwrap_or_default();

    if out.is_empty()
        && let Some(url) = str_field(data, &["url"])
    {
        out.push(ImageRecord::new(url, PROVIDER, None));
    }

    if out.is_empty()
        && let Some(inline) = str_field(data, &["image", "b64"])
    {
        out.push(ImageRecord::new(as_data_url(inline), PROVIDER, None));
    }

    out
}

fn image_from_item(item: &Value) -> Option<ImageRecord> {
    if !item.is_object() {
        return None;
    }

    if let Some(url) = str_field(item, &["url"]) {
        return Some(ImageRecord::new(url, PROVIDER, None));
    }

    str_field(item, &["b64", "image"])
        .map(|inline| ImageRecord::new(as_data_url(inline), PROVIDER, None))
}

fn str_field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
}

fn as_data_url(inline: &str) -> String {
    if inline.starts_with("data:image") {
        inline.to_string()
    } else {
        format!("data:image/png;base64,{inline}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::HeaderMap, http::StatusCode, routing::post};
    use serde_json::json;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// `/` always 404s, `/generate` answers with inline data only for the
    /// `secret` bearer token, `/image` answers with a URL and counts hits.
    async fn serve_flux(image_hits: Arc<AtomicUsize>) -> SocketAddr {
        let app = Router::new()
            .route("/", post(|| async { StatusCode::NOT_FOUND }))
            .route(
                "/generate",
                post(|headers: HeaderMap| async move {
                    let authorized = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        == Some("Bearer secret");
                    if authorized {
                        (StatusCode::OK, Json(json!({"images": [{"b64": "AAAA"}]})))
                    } else {
                        (StatusCode::UNAUTHORIZED, Json(json!({})))
                    }
                }),
            )
            .route(
                "/image",
                post(move || async move {
                    image_hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({"url": "http://flux/late.png"}))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        addr
    }

    fn client_for(base: &str, api_key: Option<&str>) -> FluxClient {
        FluxClient::new(
            base,
            api_key.map(ToString::to_string),
            Duration::from_secs(2),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn parses_image_list() {
        let data = json!({
            "images": [
                {"url": "http://flux/a.png"},
                {"b64": "AAAA"},
                {"image": "data:image/jpeg;base64,BBBB"},
                "not-an-object",
                {}
            ]
        });

        let images = images_from_response(&data);
        let urls: Vec<&str> = images.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "http://flux/a.png",
                "data:image/png;base64,AAAA",
                "data:image/jpeg;base64,BBBB"
            ]
        );
        assert!(images.iter().all(|i| i.meta.provider == "flux"));
    }

    #[test]
    fn parses_top_level_fields() {
        let images = images_from_response(&json!({"url": "http://flux/single.png"}));
        assert_eq!(images[0].url, "http://flux/single.png");

        let images = images_from_response(&json!({"b64": "CCCC"}));
        assert_eq!(images[0].url, "data:image/png;base64,CCCC");
    }

    #[test]
    fn empty_when_nothing_usable() {
        assert!(images_from_response(&json!({})).is_empty());
        assert!(images_from_response(&json!({"images": []})).is_empty());
        assert!(images_from_response(&json!({"url": ""})).is_empty());
        assert!(images_from_response(&json!([1, 2])).is_empty());
    }

    #[test]
    fn candidates_follow_base_url() {
        let client = FluxClient::new(
            "http://flux.local/",
            None,
            Duration::from_secs(1),
            Duration::from_secs(1),
        )
        .unwrap();

        assert_eq!(
            client.candidates(),
            vec![
                "http://flux.local",
                "http://flux.local/generate",
                "http://flux.local/image",
                "http://flux.local/text2image"
            ]
        );
    }

    #[tokio::test]
    async fn generate_stops_at_first_endpoint_with_images() {
        let image_hits = Arc::new(AtomicUsize::new(0));
        let addr = serve_flux(image_hits.clone()).await;

        let images = client_for(&format!("http://{addr}"), Some("secret"))
            .generate("a lighthouse")
            .await;

        assert_eq!(images.len(), 1);
        assert_eq!(images[0].url, "data:image/png;base64,AAAA");
        assert_eq!(images[0].meta.provider, "flux");
        assert_eq!(image_hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn generate_without_key_falls_through_rejections() {
        let image_hits = Arc::new(AtomicUsize::new(0));
        let addr = serve_flux(image_hits.clone()).await;

        let images = client_for(&format!("http://{addr}"), None)
            .generate("a lighthouse")
            .await;

        assert_eq!(images.len(), 1);
        assert_eq!(images[0].url, "http://flux/late.png");
        assert_eq!(image_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn generate_is_empty_when_unreachable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let images = client_for(&format!("http://{addr}"), None)
            .generate("a lighthouse")
            .await;

        assert!(images.is_empty());
    }
}
