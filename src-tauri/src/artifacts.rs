use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::bracket::ArtifactFile;
use crate::types::{ACCEPTED_ARTIFACT_EXTENSIONS, ARTIFACT_ROUTE};

/// Session-scoped registry of uploaded artifact files. Each registered file
/// gets an opaque handle that the overlay server dereferences; handles are
/// never reused and are released together when the session ends.
#[derive(Debug)]
pub struct ArtifactStore {
    base_url: String,
    handles: HashMap<String, PathBuf>,
    next_id: u64,
}

impl ArtifactStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        ArtifactStore {
            base_url: base_url.into(),
            handles: HashMap::new(),
            next_id: 1,
        }
    }

    /// Register `path` and return the file reference plus its handle URL.
    pub fn register(&mut self, path: &Path) -> Result<(ArtifactFile, String), String> {
        if !path.is_file() {
            return Err(format!("Artifact file not found at {}.", path.display()));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "artifact".to_string());
        let handle = format!("artifact-{}", self.next_id);
        self.next_id += 1;
        self.handles.insert(handle.clone(), path.to_path_buf());
        debug!(handle = %handle, path = %path.display(), "registered artifact");

        let url = self.handle_url(&handle);
        let file = ArtifactFile {
            name,
            path: path.to_path_buf(),
        };
        Ok((file, url))
    }

    pub fn handle_url(&self, handle: &str) -> String {
        format!("{}{}/{}", self.base_url.trim_end_matches('/'), ARTIFACT_ROUTE, handle)
    }

    pub fn resolve(&self, handle: &str) -> Option<&PathBuf> {
        self.handles.get(handle)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Drop every handle. Returns how many were released.
    pub fn release_all(&mut self) -> usize {
        let released = self.handles.len();
        self.handles.clear();
        if released > 0 {
            info!("Released {released} artifact handle(s)");
        }
        released
    }
}

pub fn is_accepted_artifact_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            ACCEPTED_ARTIFACT_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Suffix filter applied by the presentation layer before attaching a file.
pub fn ensure_accepted_artifact(path: &Path) -> Result<(), String> {
    if is_accepted_artifact_path(path) {
        return Ok(());
    }
    let accepted = ACCEPTED_ARTIFACT_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(", ");
    Err(format!(
        "Unsupported artifact file {}; expected one of {accepted}.",
        path.display()
    ))
}

pub fn artifact_content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
