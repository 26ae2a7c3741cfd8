use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// 64-bit Steam account identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SteamId(pub u64);

impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SteamId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(SteamId)
    }
}

/// Snapshot of the audited user's profile, fetched once per run
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    /// Display name (persona name)
    pub name: String,

    pub id: SteamId,

    /// ISO country code, if the user set one
    pub country_code: Option<String>,

    /// `None` when the friend list is private
    pub friend_count: Option<usize>,

    /// `None` when the group list is private
    pub group_count: Option<usize>,
}

impl Profile {
    pub fn new(name: impl Into<String>, id: SteamId) -> Self {
        Self {
            name: name.into(),
            id,
            country_code: None,
            friend_count: None,
            group_count: None,
        }
    }

    /// Community profile URL
    pub fn url(&self) -> String {
        format!("https://steamcommunity.com/profiles/{}", self.id)
    }
}

/// One entry from the owned-games list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct OwnedGame {
    #[serde(rename = "appid")]
    pub app_id: u32,
}

impl OwnedGame {
    pub fn new(app_id: u32) -> Self {
        Self { app_id }
    }
}
