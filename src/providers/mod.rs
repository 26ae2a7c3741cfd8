pub mod steam_web;
pub mod storefront;

use async_trait::async_trait;
use std::time::Duration;

use crate::config::UserIdentifier;
use crate::core::{OwnedGame, Profile};
use crate::error::Result;

pub use steam_web::Session;
pub use storefront::StorefrontClient;

/// Per-request timeout shared by both HTTP clients
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Base URLs of the two Steam services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SteamEndpoints {
    /// Keyed Web API (profiles, friends, owned games)
    pub web_api: String,
    /// Unkeyed storefront (app details)
    pub store: String,
}

impl Default for SteamEndpoints {
    fn default() -> Self {
        Self {
            web_api: "https://api.steampowered.com".to_string(),
            store: "https://store.steampowered.com".to_string(),
        }
    }
}

/// Source of the audited user's profile and library
#[async_trait]
pub trait LibrarySource: Send + Sync {
    /// Resolve a username or Steam ID to a profile
    async fn fetch_profile(&self, user: &UserIdentifier) -> Result<Profile>;

    /// Full owned-games list, in whatever order the service returns it
    async fn fetch_owned_games(&self, profile: &Profile) -> Result<Vec<OwnedGame>>;
}

/// Raw storefront answer: status is kept so callers can tell failure modes apart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreReply {
    pub status: u16,
    pub body: String,
}

impl StoreReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Storefront app-details lookup
#[async_trait]
pub trait StoreSource: Send + Sync {
    /// Fetch the details document for one app.
    ///
    /// Only transport failures are errors; any HTTP status is a reply.
    async fn app_details(&self, app_id: u32) -> Result<StoreReply>;

    /// URL queried for `app_id` (used in diagnostics)
    fn details_url(&self, app_id: u32) -> String;
}
