use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::session::BracketSession;

// ── Constants ──────────────────────────────────────────────────────────

pub const DEFAULT_OVERLAY_ADDR: &str = "127.0.0.1:17880";
pub const DEFAULT_TOURNAMENT_TITLE: &str = "TRUST your INTUITION";
pub const DEFAULT_TOURNAMENT_SUBTITLE: &str = "Atom & Claim Competition";
pub const ARTIFACT_ROUTE: &str = "/artifacts";
/// File suffixes offered by the artifact picker.
pub const ACCEPTED_ARTIFACT_EXTENSIONS: [&str; 4] = ["atom", "claim", "json", "txt"];

// ── Shared state type aliases ──────────────────────────────────────────

pub type SharedSession = Arc<Mutex<BracketSession>>;

#[derive(Clone)]
pub struct OverlayServerState {
    pub session: SharedSession,
}

// ── Config types ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub tournament_title: String,
    pub tournament_subtitle: String,
    pub overlay_enabled: bool,
    pub overlay_addr: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tournament_title: DEFAULT_TOURNAMENT_TITLE.to_string(),
            tournament_subtitle: DEFAULT_TOURNAMENT_SUBTITLE.to_string(),
            overlay_enabled: true,
            overlay_addr: DEFAULT_OVERLAY_ADDR.to_string(),
        }
    }
}

// ── Artifact lookup ────────────────────────────────────────────────────

/// What the opener should launch for an entrant's artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactTarget {
    File(std::path::PathBuf),
    Url(String),
}
