use crate::types::*;
use std::{
  env,
  fs,
  net::ToSocketAddrs,
  path::{Path, PathBuf},
};

pub fn repo_root() -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .parent()
    .map(|path| path.to_path_buf())
    .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")))
}

pub fn resolve_repo_path(raw: &str) -> PathBuf {
  let path = PathBuf::from(raw);
  if path.is_absolute() {
    path
  } else {
    repo_root().join(path)
  }
}

pub fn config_path() -> PathBuf {
  if let Some(raw) = env_default("BRACKET_CONFIG_PATH") {
    return resolve_repo_path(&raw);
  }
  repo_root().join("config.json")
}

pub fn logs_dir() -> PathBuf {
  repo_root().join("logs")
}

pub fn overlay_dir() -> PathBuf {
  match env_default("OVERLAY_DIR") {
    Some(raw) => resolve_repo_path(&raw),
    None => repo_root().join("overlay"),
  }
}

pub fn env_default(key: &str) -> Option<String> {
  env::var(key)
    .ok()
    .map(|value| value.trim().to_string())
    .filter(|value| !value.is_empty())
}

pub fn env_flag_true(key: &str) -> bool {
  match env::var(key) {
    Ok(value) => {
      let value = value.trim().to_ascii_lowercase();
      matches!(value.as_str(), "1" | "true" | "yes" | "on")
    }
    Err(_) => false,
  }
}

pub fn apply_env_defaults(mut config: AppConfig) -> AppConfig {
  if config.tournament_title.trim().is_empty() {
    if let Some(value) = env_default("BRACKET_TITLE") {
      config.tournament_title = value;
    }
  }
  if config.tournament_subtitle.trim().is_empty() {
    if let Some(value) = env_default("BRACKET_SUBTITLE") {
      config.tournament_subtitle = value;
    }
  }
  if config.overlay_addr.trim().is_empty() {
    config.overlay_addr = env_default("BRACKET_OVERLAY_ADDR")
      .unwrap_or_else(|| DEFAULT_OVERLAY_ADDR.to_string());
  }
  if env_flag_true("BRACKET_OVERLAY_DISABLED") {
    config.overlay_enabled = false;
  }
  config
}

pub fn load_config_inner() -> Result<AppConfig, String> {
  let path = config_path();
  if !path.is_file() {
    return Ok(apply_env_defaults(AppConfig::default()));
  }
  let data = fs::read_to_string(&path).map_err(|e| format!("read config {}: {e}", path.display()))?;
  let config =
    serde_json::from_str::<AppConfig>(&data).map_err(|e| format!("parse config {}: {e}", path.display()))?;
  Ok(apply_env_defaults(config))
}

pub fn save_config_inner(config: AppConfig) -> Result<AppConfig, String> {
  let path = config_path();
  let payload = serde_json::to_string_pretty(&config).map_err(|e| e.to_string())?;
  fs::write(&path, payload).map_err(|e| format!("write config {}: {e}", path.display()))?;
  Ok(config)
}

pub fn load_env_file() {
  load_env_file_from(&repo_root().join(".env"));
}

/// Exports every `KEY=value` line of `env_path` that is not already set.
pub fn load_env_file_from(env_path: &Path) {
  if !env_path.is_file() {
    return;
  }
  let contents = match fs::read_to_string(env_path) {
    Ok(data) => data,
    Err(_) => return,
  };
  for line in contents.lines() {
    if let Some((key, value)) = parse_env_line(line) {
      if env::var_os(&key).is_none() {
        env::set_var(key, value);
      }
    }
  }
}

pub fn parse_env_line(line: &str) -> Option<(String, String)> {
  let trimmed = line.trim();
  if trimmed.is_empty() || trimmed.starts_with('#') {
    return None;
  }
  let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
  let (key, raw_value) = trimmed.split_once('=')?;
  let key = key.trim();
  if key.is_empty() {
    return None;
  }
  let mut value = raw_value.trim();
  if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
    value = &value[1..value.len() - 1];
  } else if value.starts_with('\'') && value.ends_with('\'') && value.len() >= 2 {
    value = &value[1..value.len() - 1];
  } else if let Some(idx) = value.find('#') {
    value = value[..idx].trim_end();
  }
  Some((key.to_string(), value.to_string()))
}

/// Base URL under which artifact handles are dereferenced.
pub fn overlay_base_url(config: &AppConfig) -> String {
  let addr = config.overlay_addr.trim();
  if addr.starts_with("http://") || addr.starts_with("https://") {
    addr.trim_end_matches('/').to_string()
  } else {
    format!("http://{addr}")
  }
}

/// Same resolution `TcpListener::bind` performs, so host names like
/// `localhost:17880` pass.
pub fn overlay_addr_resolves(addr: &str) -> bool {
  addr
    .trim()
    .to_socket_addrs()
    .map(|mut addrs| addrs.next().is_some())
    .unwrap_or(false)
}

pub fn log_env_warnings(config: &AppConfig) {
  let mut warnings = Vec::new();

  if config.tournament_title.trim().is_empty() {
    warnings.push("Tournament title is empty; the bracket header will be blank");
  }
  if !config.overlay_enabled {
    warnings.push("Overlay server disabled; uploaded artifact files cannot be opened from the overlay");
  }
  if config.overlay_enabled && !overlay_addr_resolves(&config.overlay_addr) {
    warnings.push("overlayAddr does not resolve to host:port; overlay server will fail to bind");
  }

  for msg in warnings {
    tracing::warn!("{}", msg);
  }
}
