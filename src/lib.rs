//! # Steam Platform Audit
//!
//! Checks every game in a Steam library against the storefront and reports
//! how much of it runs on a given OS:
//! - Web API session for the profile and owned-games list
//! - Rate-limited storefront probing (fixed interval, niceness-scaled)
//! - Pure aggregation and text report
//! - Raw JSON dump of the store payloads
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use steam_platform_audit::{
//!     AuditEngine, CompatibilityProber, Credentials, ProbeSettings, RateLimiter, SteamEndpoints,
//!     providers::{Session, StorefrontClient},
//!     rate_limit::TokioSleeper,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let creds = Credentials::from_env(Some("gabelogannewell".to_string()), None)?;
//!     let settings = ProbeSettings::default();
//!     let endpoints = SteamEndpoints::default();
//!
//!     let session = Session::authenticate(&endpoints, creds.api_key.clone()).await?;
//!     let limiter = RateLimiter::for_settings(&settings, Arc::new(TokioSleeper))?;
//!     let prober = CompatibilityProber::new(
//!         Arc::new(StorefrontClient::new(&endpoints)?),
//!         limiter,
//!         settings.platform,
//!     );
//!
//!     let outcome = AuditEngine::new(Arc::new(session), prober).run(&creds.user).await?;
//!     println!("{}", outcome.render());
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod config;
pub mod core;
pub mod dump;
pub mod engine;
pub mod error;
pub mod prober;
pub mod progress;
pub mod providers;
pub mod rate_limit;
pub mod report;

// Re-export primary types
pub use aggregate::{aggregate, Aggregate};
pub use config::{Credentials, Platform, ProbeSettings, UserIdentifier};
pub use crate::core::{OwnedGame, ProbeOutcome, ProbeSet, ProbedGame, Profile, SteamId, UnresolvedApp, UnresolvedReason};
pub use engine::{AuditEngine, AuditOutcome};
pub use error::{AuditError, Result};
pub use prober::CompatibilityProber;
pub use providers::SteamEndpoints;
pub use rate_limit::RateLimiter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
