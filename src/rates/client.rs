use crate::error::Error;
use crate::rates::models::LatestRatesResponse;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.exchangerate-api.com";

pub struct RateClient {
    client: Client,
    base_url: String,
}

impl RateClient {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Helper for testing to override base URL
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Latest quotes of every currency against `base`
    pub fn fetch_latest(&self, base: &str) -> Result<LatestRatesResponse> {
        let url = format!("{}/v4/latest/{}", self.base_url, base);
        tracing::debug!(%url, "fetching exchange rates");

        let response = self
            .client
            .get(&url)
            .send()
            .context("Failed to reach exchange rate service")?;

        if !response.status().is_success() {
            return Err(Error::RateService(response.status().as_u16()).into());
        }

        let latest = response
            .json::<LatestRatesResponse>()
            .context("Failed to parse exchange rate response")?;

        Ok(latest)
    }
}
