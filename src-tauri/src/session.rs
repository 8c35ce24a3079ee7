use chrono::Local;
use std::path::Path;
use tracing::{debug, info};

use crate::artifacts::ArtifactStore;
use crate::bracket::{BracketEngine, BracketMeta, BracketState, Side, SlotKey};
use crate::config::overlay_base_url;
use crate::types::{AppConfig, ArtifactTarget, SharedSession};

/// One interactive bracket session: the engine plus the resources whose
/// lifetime is tied to it (artifact handles).
#[derive(Debug)]
pub struct BracketSession {
    engine: BracketEngine,
    artifacts: ArtifactStore,
    meta: BracketMeta,
}

impl BracketSession {
    pub fn new(config: &AppConfig) -> Self {
        BracketSession {
            engine: BracketEngine::new(),
            artifacts: ArtifactStore::new(overlay_base_url(config)),
            meta: BracketMeta {
                title: config.tournament_title.clone(),
                subtitle: config.tournament_subtitle.clone(),
                session_started_at: session_timestamp(),
            },
        }
    }

    pub fn engine(&self) -> &BracketEngine {
        &self.engine
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    pub fn state(&self) -> BracketState {
        self.engine.snapshot(&self.meta)
    }

    /// Pick up title changes from a saved config. Handle URLs already issued
    /// keep their old base.
    pub fn apply_config(&mut self, config: &AppConfig) {
        self.meta.title = config.tournament_title.clone();
        self.meta.subtitle = config.tournament_subtitle.clone();
    }

    pub fn rename(&mut self, side: Side, entrant_id: &str, name: &str) -> bool {
        self.engine.rename(side, entrant_id, name)
    }

    /// Registers `path` and stores it on the entrant. Unknown entrants are
    /// ignored without allocating a handle.
    pub fn attach_artifact_file(&mut self, side: Side, entrant_id: &str, path: &Path) -> Result<bool, String> {
        if self.engine.find_round_one(side, entrant_id).is_none() {
            debug!(side = side.as_str(), entrant_id, "artifact file for unknown entrant ignored");
            return Ok(false);
        }
        let (file, file_url) = self.artifacts.register(path)?;
        Ok(self.engine.attach_artifact_file(side, entrant_id, file, file_url))
    }

    pub fn attach_artifact_url(&mut self, side: Side, entrant_id: &str, url: &str) -> bool {
        self.engine.attach_artifact_url(side, entrant_id, url)
    }

    pub fn toggle_artifact_input_mode(&mut self, entrant_id: &str) -> bool {
        self.engine.toggle_artifact_input_mode(entrant_id)
    }

    pub fn advance_slot(&mut self, side: Side, round: u8, position: usize) -> Option<SlotKey> {
        let written = self.engine.advance_slot(side, round, position);
        if let Some(SlotKey::Champion) = written {
            if let Some(champion) = self.engine.champion() {
                info!("Champion crowned: {} ({})", champion.name, champion.id);
            }
        }
        written
    }

    /// Start over with fresh placeholder entrants. Every artifact handle from
    /// the previous session is released.
    pub fn reset(&mut self) -> usize {
        let released = self.artifacts.release_all();
        self.engine = BracketEngine::new();
        self.meta.session_started_at = session_timestamp();
        info!("Bracket session reset");
        released
    }

    /// End of session: release artifact handles without touching bracket state.
    pub fn close(&mut self) -> usize {
        self.artifacts.release_all()
    }

    /// The artifact to open for a round-one entrant. A file wins over a URL.
    pub fn artifact_target(&self, side: Side, entrant_id: &str) -> Option<ArtifactTarget> {
        let entrant = self.engine.find_round_one(side, entrant_id)?;
        if let Some(file) = &entrant.file {
            return Some(ArtifactTarget::File(file.path.clone()));
        }
        entrant
            .url
            .as_ref()
            .filter(|url| !url.trim().is_empty())
            .map(|url| ArtifactTarget::Url(url.clone()))
    }
}

/// Push a freshly saved config into the shared session. A poisoned lock is
/// reported rather than skipped.
pub fn apply_config_shared(session: &SharedSession, config: &AppConfig) -> Result<(), String> {
    let mut guard = session.lock().map_err(|e| e.to_string())?;
    guard.apply_config(config);
    Ok(())
}

fn session_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
