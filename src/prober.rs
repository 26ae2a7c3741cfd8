//! Storefront compatibility probing.
//!
//! Each owned game costs one `appdetails` request and one rate-limit slot.
//! Per-game failures never abort the loop; they come out of the stream as
//! [`ProbeOutcome::Unresolved`].

use futures::stream::{self, Stream};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::Platform;
use crate::core::{OwnedGame, ProbeOutcome, ProbedGame, UnresolvedApp, UnresolvedReason};
use crate::providers::{StoreReply, StoreSource};
use crate::rate_limit::RateLimiter;

#[derive(Debug, Deserialize)]
struct AppDetailsEntry {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<Value>,
}

/// Checks owned games against the storefront, one at a time
pub struct CompatibilityProber {
    store: Arc<dyn StoreSource>,
    limiter: RateLimiter,
    platform: Platform,
}

impl CompatibilityProber {
    pub fn new(store: Arc<dyn StoreSource>, limiter: RateLimiter, platform: Platform) -> Self {
        Self {
            store,
            limiter,
            platform,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Probe a single app, waiting for the rate limiter first
    pub async fn probe(&mut self, app_id: u32) -> ProbeOutcome {
        self.limiter.acquire().await;

        let url = self.store.details_url(app_id);
        match self.store.app_details(app_id).await {
            Ok(reply) => interpret_reply(app_id, &url, self.platform, &reply),
            Err(e) => {
                tracing::debug!("Transport failure for app {}: {}", app_id, e);
                ProbeOutcome::Unresolved(UnresolvedApp {
                    app_id,
                    url,
                    reason: UnresolvedReason::Transport(e.to_string()),
                })
            }
        }
    }

    /// Lazily probe `games` in order.
    ///
    /// The stream yields exactly one outcome per game and cannot be restarted.
    pub fn probe_all(self, games: Vec<OwnedGame>) -> impl Stream<Item = ProbeOutcome> {
        stream::unfold((self, games.into_iter()), |(mut prober, mut games)| async move {
            let Some(game) = games.next() else {
                return None;
            };
            let outcome = prober.probe(game.app_id).await;
            Some((outcome, (prober, games)))
        })
    }
}

/// Classify one storefront reply.
pub fn interpret_reply(app_id: u32, url: &str, platform: Platform, reply: &StoreReply) -> ProbeOutcome {
    let unresolved = |reason| {
        ProbeOutcome::Unresolved(UnresolvedApp {
            app_id,
            url: url.to_string(),
            reason,
        })
    };

    if !reply.is_success() {
        return unresolved(UnresolvedReason::HttpStatus(reply.status));
    }

    // The store answers `null` for some invalid ids
    let entries: Option<HashMap<String, AppDetailsEntry>> = match serde_json::from_str(&reply.body) {
        Ok(entries) => entries,
        Err(e) => return unresolved(UnresolvedReason::Malformed(e.to_string())),
    };

    let data = entries
        .and_then(|mut entries| entries.remove(&app_id.to_string()))
        .filter(|entry| entry.success)
        .and_then(|entry| entry.data);

    let Some(data) = data else {
        return unresolved(UnresolvedReason::MissingData);
    };

    match read_fields(&data, platform) {
        Some((name, compatible)) => ProbeOutcome::Resolved(ProbedGame {
            app_id,
            name,
            compatible,
            data,
        }),
        None => unresolved(UnresolvedReason::MissingData),
    }
}

/// `data.name` and `data.platforms.<os>`
fn read_fields(data: &Value, platform: Platform) -> Option<(String, bool)> {
    let name = data.get("name")?.as_str()?.to_string();
    let compatible = data.get("platforms")?.get(platform.store_key())?.as_bool()?;
    Some((name, compatible))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AuditError, Result};
    use crate::rate_limit::testing::RecordingSleeper;
    use async_trait::async_trait;
    use futures::StreamExt;
    use std::time::Duration;

    const URL: &str = "https://store.steampowered.com/api/appdetails?appids=1";

    fn details(app_id: u32, name: &str, linux: bool) -> String {
        format!(
            r#"{{"{}":{{"success":true,"data":{{"type":"game","name":"{}","steam_appid":{},"platforms":{{"windows":true,"mac":false,"linux":{}}}}}}}}}"#,
            app_id, name, app_id, linux
        )
    }

    /// Store fake keyed by app id; unknown ids fail at the transport level
    struct FakeStore {
        replies: HashMap<u32, StoreReply>,
    }

    #[async_trait]
    impl StoreSource for FakeStore {
        async fn app_details(&self, app_id: u32) -> Result<StoreReply> {
            self.replies.get(&app_id).cloned().ok_or_else(|| AuditError::Api {
                endpoint: "appdetails".to_string(),
                message: "connection refused".to_string(),
            })
        }

        fn details_url(&self, app_id: u32) -> String {
            format!("https://store.test/api/appdetails?appids={}", app_id)
        }
    }

    #[test]
    fn test_resolved_reply() {
        let reply = StoreReply::new(200, details(1, "Portal", true));
        match interpret_reply(1, URL, Platform::Linux, &reply) {
            ProbeOutcome::Resolved(game) => {
                assert_eq!(game.name, "Portal");
                assert!(game.compatible);
                assert_eq!(game.data["steam_appid"], 1);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        let mac = interpret_reply(1, URL, Platform::Mac, &reply);
        assert!(matches!(mac, ProbeOutcome::Resolved(ref g) if !g.compatible));
    }

    #[test]
    fn test_http_error_is_unresolved() {
        let reply = StoreReply::new(404, "Not Found");
        let outcome = interpret_reply(1, URL, Platform::Linux, &reply);
        assert!(matches!(
            outcome,
            ProbeOutcome::Unresolved(UnresolvedApp { reason: UnresolvedReason::HttpStatus(404), .. })
        ));
    }

    #[test]
    fn test_missing_data_paths() {
        let cases = [
            r#"{"1":{"success":false}}"#,
            r#"{"2":{"success":true,"data":{"name":"Other"}}}"#,
            r#"{"1":{"success":true,"data":{"name":"No Platforms"}}}"#,
            r#"{"1":{"success":true,"data":{"platforms":{"linux":true}}}}"#,
            r#"null"#,
        ];

        for body in cases {
            let outcome = interpret_reply(1, URL, Platform::Linux, &StoreReply::new(200, body));
            assert!(
                matches!(
                    outcome,
                    ProbeOutcome::Unresolved(UnresolvedApp { reason: UnresolvedReason::MissingData, .. })
                ),
                "body {} gave {:?}",
                body,
                outcome
            );
        }
    }

    #[test]
    fn test_garbage_body_is_malformed() {
        let outcome = interpret_reply(1, URL, Platform::Linux, &StoreReply::new(200, "<html>"));
        assert!(matches!(
            outcome,
            ProbeOutcome::Unresolved(UnresolvedApp { reason: UnresolvedReason::Malformed(_), .. })
        ));
    }

    #[tokio::test]
    async fn test_probe_all_yields_one_outcome_per_game() {
        let store = FakeStore {
            replies: HashMap::from([
                (10, StoreReply::new(200, details(10, "A", true))),
                (20, StoreReply::new(200, details(20, "B", false))),
                (30, StoreReply::new(404, "")),
            ]),
        };
        let sleeper = Arc::new(RecordingSleeper::default());
        let limiter = RateLimiter::new(Duration::from_millis(1650), sleeper.clone());
        let prober = CompatibilityProber::new(Arc::new(store), limiter, Platform::Linux);

        let games = [10, 20, 30, 40].into_iter().map(OwnedGame::new).collect();
        let outcomes: Vec<ProbeOutcome> = prober.probe_all(games).collect().await;

        let ids: Vec<u32> = outcomes.iter().map(ProbeOutcome::app_id).collect();
        assert_eq!(ids, vec![10, 20, 30, 40]);

        assert!(matches!(outcomes[0], ProbeOutcome::Resolved(ref g) if g.compatible));
        assert!(matches!(outcomes[1], ProbeOutcome::Resolved(ref g) if !g.compatible));
        assert!(matches!(outcomes[2], ProbeOutcome::Unresolved(ref u) if u.reason == UnresolvedReason::HttpStatus(404)));
        assert!(matches!(outcomes[3], ProbeOutcome::Unresolved(UnresolvedApp { reason: UnresolvedReason::Transport(_), .. })));

        // Failed requests still consume a slot
        assert_eq!(*sleeper.slept.lock().unwrap(), vec![Duration::from_millis(1650); 3]);
    }

    #[tokio::test]
    async fn test_empty_library_makes_no_requests() {
        let sleeper = Arc::new(RecordingSleeper::default());
        let limiter = RateLimiter::new(Duration::from_secs(1), sleeper.clone());
        let store = FakeStore { replies: HashMap::new() };
        let prober = CompatibilityProber::new(Arc::new(store), limiter, Platform::Linux);

        let outcomes: Vec<ProbeOutcome> = prober.probe_all(Vec::new()).collect().await;
        assert!(outcomes.is_empty());
        assert!(sleeper.slept.lock().unwrap().is_empty());
    }
}
