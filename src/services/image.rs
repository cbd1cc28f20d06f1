//! Image generation as an ordered cascade of providers. The first provider
//! returning at least one image wins; later ones are never contacted.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::clients::flux::FluxClient;
use crate::config::ImageConfig;
use crate::models::image::{ImageRecord, ImageResponse};

#[async_trait]
pub trait ImageProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Images for `prompt`, or an empty list when the provider cannot help.
    async fn generate(&self, prompt: &str) -> Vec<ImageRecord>;
}

pub struct FluxProvider {
    client: FluxClient,
}

impl FluxProvider {
    #[must_use]
    pub const fn new(client: FluxClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageProvider for FluxProvider {
    fn name(&self) -> &'static str {
        "flux"
    }

    async fn generate(&self, prompt: &str) -> Vec<ImageRecord> {
        self.client.generate(prompt).await
    }
}

/// Free text-to-image service addressed purely by URL.
pub struct PollinationsProvider {
    width: u32,
    height: u32,
}

impl PollinationsProvider {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[async_trait]
impl ImageProvider for PollinationsProvider {
    fn name(&self) -> &'static str {
        "pollinations"
    }

    async fn generate(&self, prompt: &str) -> Vec<ImageRecord> {
        vec![ImageRecord::new(
            pollinations_url(prompt, self.width, self.height),
            self.name(),
            Some(prompt),
        )]
    }
}

/// Keyword photo lookup.
pub struct UnsplashProvider {
    width: u32,
    height: u32,
}

impl UnsplashProvider {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[async_trait]
impl ImageProvider for UnsplashProvider {
    fn name(&self) -> &'static str {
        "unsplash"
    }

    async fn generate(&self, prompt: &str) -> Vec<ImageRecord> {
        vec![ImageRecord::new(
            unsplash_url(prompt, self.width, self.height),
            self.name(),
            Some(prompt),
        )]
    }
}

/// Seeded placeholder photo; always answers.
pub struct PicsumProvider {
    width: u32,
    height: u32,
}

impl PicsumProvider {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[async_trait]
impl ImageProvider for PicsumProvider {
    fn name(&self) -> &'static str {
        "picsum"
    }

    async fn generate(&self, prompt: &str) -> Vec<ImageRecord> {
        vec![ImageRecord::new(
            picsum_url(prompt, self.width, self.height),
            self.name(),
            Some(prompt),
        )]
    }
}

/// Form-style encoding: spaces become `+`.
fn encode(prompt: &str) -> String {
    url::form_urlencoded::byte_serialize(prompt.as_bytes()).collect()
}

#[must_use]
pub fn pollinations_url(prompt: &str, width: u32, height: u32) -> String {
    format!(
        "https://image.pollinations.ai/prompt/{}?width={width}&height={height}",
        encode(prompt)
    )
}

#[must_use]
pub fn unsplash_url(prompt: &str, width: u32, height: u32) -> String {
    format!(
        "https://source.unsplash.com/{width}x{height}/?{}",
        encode(prompt)
    )
}

#[must_use]
pub fn picsum_url(prompt: &str, width: u32, height: u32) -> String {
    let seed: String = encode(prompt).chars().take(50).collect();
    format!("https://picsum.photos/seed/{seed}/{width}/{height}")
}

/// Runs providers in order and returns the first non-empty result.
pub async fn first_non_empty(
    providers: &[Arc<dyn ImageProvider>],
    prompt: &str,
) -> Vec<ImageRecord> {
    for provider in providers {
        let images = provider.generate(prompt).await;
        if images.is_empty() {
            debug!(provider = provider.name(), "Image provider returned nothing, trying next");
            continue;
        }
        info!(provider = provider.name(), count = images.len(), "Images generated");
        return images;
    }
    Vec::new()
}

pub struct ImageService {
    providers: Vec<Arc<dyn ImageProvider>>,
    default_prompt: String,
}

impl ImageService {
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn ImageProvider>>, default_prompt: impl Into<String>) -> Self {
        Self {
            providers,
            default_prompt: default_prompt.into(),
        }
    }

    /// Flux (when a base URL is configured), then Pollinations, Unsplash, Picsum.
    pub fn from_config(config: &ImageConfig) -> Result<Self> {
        let mut providers: Vec<Arc<dyn ImageProvider>> = Vec::with_capacity(4);

        if let Some(base) = config.primary_url.as_deref().filter(|u| !u.trim().is_empty()) {
            let client = FluxClient::new(
                base,
                config.primary_api_key.clone(),
                Duration::from_secs(config.connect_timeout_seconds),
                Duration::from_secs(config.timeout_seconds),
            )?;
            providers.push(Arc::new(FluxProvider::new(client)));
        }

        providers.push(Arc::new(PollinationsProvider::new(config.width, config.height)));
        providers.push(Arc::new(UnsplashProvider::new(config.width, config.height)));
        providers.push(Arc::new(PicsumProvider::new(config.width, config.height)));

        Ok(Self::new(providers, config.default_prompt.clone()))
    }

    #[must_use]
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn generate(&self, prompt: &str) -> ImageResponse {
        let prompt = match prompt.trim() {
            "" => self.default_prompt.clone(),
            trimmed => trimmed.to_string(),
        };

        let images = first_non_empty(&self.providers, &prompt).await;

        let now = Utc::now();
        ImageResponse {
            id: now.timestamp(),
            prompt,
            images,
            created_at: now,
        }
    }
}
