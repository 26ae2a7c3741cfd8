pub mod probe_result;
pub mod profile;

pub use probe_result::{ProbeOutcome, ProbeSet, ProbedGame, UnresolvedApp, UnresolvedReason};
pub use profile::{OwnedGame, Profile, SteamId};
