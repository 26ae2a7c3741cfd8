use serde_json::Value;
use std::fmt;

/// A game whose store entry was read successfully
#[derive(Debug, Clone, PartialEq)]
pub struct ProbedGame {
    pub app_id: u32,
    pub name: String,
    /// Store lists the target platform as supported
    pub compatible: bool,
    /// Raw `data` object from the storefront, written to the dump as-is
    pub data: Value,
}

/// Why a game could not be classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// Storefront answered with a non-2xx status
    HttpStatus(u16),
    /// Request never produced a response (DNS, TLS, timeout...)
    Transport(String),
    /// Body was not the expected JSON shape
    Malformed(String),
    /// No data for the app (delisted, region-locked) or no platform/name fields
    MissingData,
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedReason::HttpStatus(status) => write!(f, "HTTP {}", status),
            UnresolvedReason::Transport(e) => write!(f, "transport error: {}", e),
            UnresolvedReason::Malformed(e) => write!(f, "malformed response: {}", e),
            UnresolvedReason::MissingData => f.write_str("no store data"),
        }
    }
}

/// A game whose compatibility could not be determined
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedApp {
    pub app_id: u32,
    /// Storefront URL that was queried
    pub url: String,
    pub reason: UnresolvedReason,
}

impl fmt::Display for UnresolvedApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            UnresolvedReason::HttpStatus(_) | UnresolvedReason::Transport(_) => {
                write!(f, "Request failed: {} ({})", self.url, self.reason)
            }
            _ => write!(f, "App {} unresolved: {}", self.app_id, self.reason),
        }
    }
}

/// Result of probing one owned game
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Resolved(ProbedGame),
    Unresolved(UnresolvedApp),
}

impl ProbeOutcome {
    pub fn app_id(&self) -> u32 {
        match self {
            ProbeOutcome::Resolved(game) => game.app_id,
            ProbeOutcome::Unresolved(app) => app.app_id,
        }
    }
}

/// Everything the probe loop produced, split by outcome
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeSet {
    pub resolved: Vec<ProbedGame>,
    pub unresolved: Vec<UnresolvedApp>,
}

impl ProbeSet {
    pub fn record(&mut self, outcome: ProbeOutcome) {
        match outcome {
            ProbeOutcome::Resolved(game) => self.resolved.push(game),
            ProbeOutcome::Unresolved(app) => self.unresolved.push(app),
        }
    }

    /// Number of games probed, resolved or not
    pub fn len(&self) -> usize {
        self.resolved.len() + self.unresolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<ProbeOutcome> for ProbeSet {
    fn from_iter<I: IntoIterator<Item = ProbeOutcome>>(iter: I) -> Self {
        let mut set = ProbeSet::default();
        for outcome in iter {
            set.record(outcome);
        }
        set
    }
}
