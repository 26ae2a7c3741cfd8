use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::providers::{SteamEndpoints, StoreReply, StoreSource, REQUEST_TIMEOUT};

/// Unofficial storefront API client (`/api/appdetails`)
pub struct StorefrontClient {
    client: Client,
    base_url: String,
}

impl StorefrontClient {
    pub fn new(endpoints: &SteamEndpoints) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: endpoints.store.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl StoreSource for StorefrontClient {
    async fn app_details(&self, app_id: u32) -> Result<StoreReply> {
        let response = self.client.get(self.details_url(app_id)).send().await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(StoreReply { status, body })
    }

    fn details_url(&self, app_id: u32) -> String {
        format!("{}/api/appdetails?appids={}", self.base_url, app_id)
    }
}
