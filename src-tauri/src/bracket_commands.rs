use std::path::PathBuf;
use tauri::{AppHandle, State};
use tauri_plugin_dialog::DialogExt;
use tauri_plugin_opener::OpenerExt;
use tracing::{info, warn};

use crate::artifacts::ensure_accepted_artifact;
use crate::bracket::{BracketState, Side};
use crate::session::BracketSession;
use crate::types::{ArtifactTarget, SharedSession, ACCEPTED_ARTIFACT_EXTENSIONS};

// ── Helpers ─────────────────────────────────────────────────────────────

/// Lock the session and call `f`, then return the fresh read view.
fn with_session<F>(session: &State<'_, SharedSession>, f: F) -> Result<BracketState, String>
where
    F: FnOnce(&mut BracketSession) -> Result<(), String>,
{
    let mut guard = session.lock().map_err(|e| e.to_string())?;
    f(&mut guard)?;
    Ok(guard.state())
}

// ── Commands ────────────────────────────────────────────────────────────

#[tauri::command]
pub fn get_bracket_state(session: State<'_, SharedSession>) -> Result<BracketState, String> {
    with_session(&session, |_| Ok(()))
}

#[tauri::command]
pub fn rename_entrant(
    side: Side,
    entrant_id: String,
    name: String,
    session: State<'_, SharedSession>,
) -> Result<BracketState, String> {
    with_session(&session, |s| {
        s.rename(side, &entrant_id, &name);
        Ok(())
    })
}

/// Attach a file the frontend already has a path for (drag and drop).
#[tauri::command]
pub fn attach_artifact_file(
    side: Side,
    entrant_id: String,
    path: String,
    session: State<'_, SharedSession>,
) -> Result<BracketState, String> {
    let path = PathBuf::from(path.trim());
    ensure_accepted_artifact(&path).map_err(|e| {
        warn!("{e}");
        e
    })?;
    with_session(&session, |s| {
        s.attach_artifact_file(side, &entrant_id, &path)?;
        Ok(())
    })
}

/// Show the native picker and attach the chosen file. `None` when the user
/// cancels.
#[tauri::command]
pub async fn pick_artifact_file(
    app: AppHandle,
    side: Side,
    entrant_id: String,
    session: State<'_, SharedSession>,
) -> Result<Option<BracketState>, String> {
    let picked = app
        .dialog()
        .file()
        .set_title("Attach atom or claim")
        .add_filter("Atoms & claims", &ACCEPTED_ARTIFACT_EXTENSIONS)
        .blocking_pick_file();
    let path = match picked {
        Some(file) => file.into_path().map_err(|e| e.to_string())?,
        None => return Ok(None),
    };
    ensure_accepted_artifact(&path).map_err(|e| {
        warn!("{e}");
        e
    })?;
    let state = with_session(&session, |s| {
        s.attach_artifact_file(side, &entrant_id, &path)?;
        Ok(())
    })?;
    Ok(Some(state))
}

#[tauri::command]
pub fn attach_artifact_url(
    side: Side,
    entrant_id: String,
    url: String,
    session: State<'_, SharedSession>,
) -> Result<BracketState, String> {
    with_session(&session, |s| {
        s.attach_artifact_url(side, &entrant_id, &url);
        Ok(())
    })
}

#[tauri::command]
pub fn toggle_artifact_input_mode(
    entrant_id: String,
    session: State<'_, SharedSession>,
) -> Result<BracketState, String> {
    with_session(&session, |s| {
        s.toggle_artifact_input_mode(&entrant_id);
        Ok(())
    })
}

/// The "Advance" button on the card at (side, round, position).
#[tauri::command]
pub fn advance_entrant(
    side: Side,
    round: u8,
    position: usize,
    session: State<'_, SharedSession>,
) -> Result<BracketState, String> {
    with_session(&session, |s| {
        s.advance_slot(side, round, position);
        Ok(())
    })
}

#[tauri::command]
pub fn reset_bracket(session: State<'_, SharedSession>) -> Result<BracketState, String> {
    with_session(&session, |s| {
        s.reset();
        Ok(())
    })
}

#[tauri::command]
pub fn open_artifact(
    app: AppHandle,
    side: Side,
    entrant_id: String,
    session: State<'_, SharedSession>,
) -> Result<(), String> {
    let target = {
        let guard = session.lock().map_err(|e| e.to_string())?;
        guard.artifact_target(side, &entrant_id)
    };
    match target {
        Some(ArtifactTarget::File(path)) => {
            info!("Opening artifact file {}", path.display());
            app.opener()
                .open_path(path.to_string_lossy().to_string(), None::<&str>)
                .map_err(|e| e.to_string())
        }
        Some(ArtifactTarget::Url(url)) => {
            info!("Opening artifact url {url}");
            app.opener()
                .open_url(url, None::<&str>)
                .map_err(|e| e.to_string())
        }
        None => Err(format!("Entrant {entrant_id} has no artifact attached.")),
    }
}
