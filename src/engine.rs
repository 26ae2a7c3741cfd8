use futures::StreamExt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::aggregate::{aggregate, Aggregate};
use crate::config::{Platform, UserIdentifier};
use crate::core::{ProbeOutcome, ProbeSet, Profile};
use crate::dump;
use crate::error::Result;
use crate::prober::CompatibilityProber;
use crate::progress::{NoopProgress, ProbeProgress};
use crate::providers::LibrarySource;

/// Everything one audit produced
#[derive(Debug, Clone)]
pub struct AuditOutcome {
    pub profile: Profile,
    pub platform: Platform,
    pub probes: ProbeSet,
    pub summary: Aggregate,
    /// Set when the data dump could not be written; the report is still valid
    pub dump_error: Option<String>,
}

impl AuditOutcome {
    /// Printable report
    pub fn render(&self) -> String {
        crate::report::render(&self.profile, &self.summary, self.platform)
    }
}

/// Runs the audit pipeline: profile, games list, probe loop, dump, aggregate.
pub struct AuditEngine {
    library: Arc<dyn LibrarySource>,
    prober: CompatibilityProber,
    progress: Arc<dyn ProbeProgress>,
    dump_path: Option<PathBuf>,
}

impl AuditEngine {
    pub fn new(library: Arc<dyn LibrarySource>, prober: CompatibilityProber) -> Self {
        Self {
            library,
            prober,
            progress: Arc::new(NoopProgress),
            dump_path: None,
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProbeProgress>) -> Self {
        self.progress = progress;
        self
    }

    /// Write successful store payloads to `path` after probing
    pub fn with_dump_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dump_path = Some(path.into());
        self
    }

    /// Audit `user`'s library. Consumes the engine: the probe stream is one-shot.
    pub async fn run(self, user: &UserIdentifier) -> Result<AuditOutcome> {
        let start = Instant::now();

        let profile = self.library.fetch_profile(user).await?;
        let games = self.library.fetch_owned_games(&profile).await?;
        tracing::info!("{} owns {} games/apps", profile.name, games.len());

        let platform = self.prober.platform();
        let progress = self.progress;

        progress.start(games.len() as u64);
        let mut probes = ProbeSet::default();
        let mut stream = std::pin::pin!(self.prober.probe_all(games));
        while let Some(outcome) = stream.next().await {
            if let ProbeOutcome::Unresolved(app) = &outcome {
                tracing::debug!("App {} unresolved: {}", app.app_id, app.reason);
                progress.message(&app.to_string());
            }
            probes.record(outcome);
            progress.advance();
        }
        progress.finish();

        let mut dump_error = None;
        if let Some(path) = &self.dump_path {
            tracing::info!("Saving data...");
            if let Err(e) = dump::write_game_data(path, &probes.resolved).await {
                tracing::error!("Failed to save data to {}: {}", path.display(), e);
                dump_error = Some(e.to_string());
            }
        }

        let summary = aggregate(&probes);
        tracing::info!(
            "Probed {} games in {:.1}s ({} unresolved)",
            summary.total,
            start.elapsed().as_secs_f64(),
            summary.unresolved
        );

        Ok(AuditOutcome {
            profile,
            platform,
            probes,
            summary,
            dump_error,
        })
    }
}
