use async_trait::async_trait;
use reqwest::Client;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;

use crate::config::UserIdentifier;
use crate::core::{OwnedGame, Profile, SteamId};
use crate::error::{AuditError, Result};
use crate::providers::{LibrarySource, SteamEndpoints, REQUEST_TIMEOUT};

const SUPPORTED_API_LIST: &str = "ISteamWebAPIUtil/GetSupportedAPIList/v1";
const RESOLVE_VANITY_URL: &str = "ISteamUser/ResolveVanityURL/v1";
const PLAYER_SUMMARIES: &str = "ISteamUser/GetPlayerSummaries/v2";
const FRIEND_LIST: &str = "ISteamUser/GetFriendList/v1";
const USER_GROUP_LIST: &str = "ISteamUser/GetUserGroupList/v1";
const OWNED_GAMES: &str = "IPlayerService/GetOwnedGames/v1";

/// `ResolveVanityURL` success code
const VANITY_MATCH: u32 = 1;

/// Authenticated Steam Web API session
pub struct Session {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: T,
}

#[derive(Debug, Deserialize)]
struct VanityResolution {
    success: u32,
    #[serde(default)]
    steamid: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlayerSummaries {
    #[serde(default)]
    players: Vec<PlayerSummary>,
}

#[derive(Debug, Deserialize)]
struct PlayerSummary {
    steamid: String,
    personaname: String,
    #[serde(default)]
    loccountrycode: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FriendListEnvelope {
    friendslist: FriendList,
}

#[derive(Debug, Deserialize)]
struct FriendList {
    #[serde(default)]
    friends: Vec<IgnoredAny>,
}

#[derive(Debug, Deserialize)]
struct GroupList {
    success: bool,
    #[serde(default)]
    groups: Vec<IgnoredAny>,
}

#[derive(Debug, Deserialize)]
struct OwnedGames {
    // Absent when the library is private
    #[serde(default)]
    games: Vec<OwnedGame>,
}

impl VanityResolution {
    fn into_steam_id(self, username: &str) -> Result<SteamId> {
        if self.success != VANITY_MATCH {
            return Err(AuditError::ProfileResolution(format!(
                "username '{}': {}",
                username,
                self.message.as_deref().unwrap_or("no match")
            )));
        }

        self.steamid
            .as_deref()
            .and_then(|id| id.parse::<SteamId>().ok())
            .ok_or_else(|| {
                AuditError::ProfileResolution(format!("username '{}': no Steam ID in response", username))
            })
    }
}

impl PlayerSummaries {
    fn into_profile(self, id: SteamId) -> Result<Profile> {
        let summary = self
            .players
            .into_iter()
            .find(|p| p.steamid.parse::<SteamId>().ok() == Some(id))
            .ok_or_else(|| AuditError::ProfileResolution(format!("no profile for Steam ID {}", id)))?;

        let mut profile = Profile::new(summary.personaname, id);
        profile.country_code = summary.loccountrycode.filter(|c| !c.is_empty());
        Ok(profile)
    }
}

/// 401/403 on a per-user list means the user made it private
fn private_as_none<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if matches!(e.status(), Some(401) | Some(403)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// 401/403 on the key check means the key itself was refused
fn key_check<T>(result: Result<T>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if matches!(e.status(), Some(401) | Some(403)) => Err(AuditError::Authentication(
            "the Steam Web API rejected the key".to_string(),
        )),
        Err(e) => Err(e),
    }
}

impl Session {
    /// Open a session and check the key against the Web API.
    pub async fn authenticate(endpoints: &SteamEndpoints, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        let session = Self {
            client,
            base_url: endpoints.web_api.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        };

        key_check(session.call::<IgnoredAny>(SUPPORTED_API_LIST, &[]).await)?;
        tracing::debug!("Web API key accepted");
        Ok(session)
    }

    /// GET `{base}/{method}/?key=...&params` and decode the JSON body
    async fn call<T: DeserializeOwned>(&self, method: &str, params: &[(&str, String)]) -> Result<T> {
        let url = format!("{}/{}/", self.base_url, method);

        // without_url(): the query string carries the key
        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| AuditError::HttpRequest(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuditError::Status {
                endpoint: method.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AuditError::HttpRequest(e.without_url()))?;

        serde_json::from_str(&body).map_err(|e| AuditError::Api {
            endpoint: method.to_string(),
            message: format!("Invalid JSON: {}", e),
        })
    }

    async fn resolve_username(&self, username: &str) -> Result<SteamId> {
        let envelope: Envelope<VanityResolution> = self
            .call(RESOLVE_VANITY_URL, &[("vanityurl", username.to_string())])
            .await?;
        envelope.response.into_steam_id(username)
    }

    async fn friend_count(&self, id: SteamId) -> Result<Option<usize>> {
        let result = self
            .call::<FriendListEnvelope>(
                FRIEND_LIST,
                &[("steamid", id.to_string()), ("relationship", "friend".to_string())],
            )
            .await;
        Ok(private_as_none(result)?.map(|e| e.friendslist.friends.len()))
    }

    async fn group_count(&self, id: SteamId) -> Result<Option<usize>> {
        let result = self
            .call::<Envelope<GroupList>>(USER_GROUP_LIST, &[("steamid", id.to_string())])
            .await;
        Ok(private_as_none(result)?
            .filter(|e| e.response.success)
            .map(|e| e.response.groups.len()))
    }
}

#[async_trait]
impl LibrarySource for Session {
    async fn fetch_profile(&self, user: &UserIdentifier) -> Result<Profile> {
        let id = match user {
            UserIdentifier::Username(name) => self.resolve_username(name).await?,
            UserIdentifier::SteamId(id) => *id,
        };

        let summaries: Envelope<PlayerSummaries> = self
            .call(PLAYER_SUMMARIES, &[("steamids", id.to_string())])
            .await?;
        let mut profile = summaries.response.into_profile(id)?;

        profile.friend_count = self.friend_count(id).await?;
        if profile.friend_count.is_none() {
            tracing::warn!("Friend list of {} is private", id);
        }

        profile.group_count = self.group_count(id).await?;
        if profile.group_count.is_none() {
            tracing::warn!("Group list of {} is private", id);
        }

        tracing::info!("Resolved {} to '{}' ({})", user, profile.name, profile.url());
        Ok(profile)
    }

    async fn fetch_owned_games(&self, profile: &Profile) -> Result<Vec<OwnedGame>> {
        let owned: Envelope<OwnedGames> = self
            .call(
                OWNED_GAMES,
                &[
                    ("steamid", profile.id.to_string()),
                    ("include_appinfo", "1".to_string()),
                    ("include_played_free_games", "1".to_string()),
                ],
            )
            .await?;

        let games = owned.response.games;
        if games.is_empty() {
            tracing::warn!("No owned games returned for {} (private library?)", profile.id);
        }
        Ok(games)
    }
}
