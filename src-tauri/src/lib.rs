pub mod types;
pub mod config;
pub mod bracket;
pub mod artifacts;
pub mod session;
pub mod overlay;
#[cfg(feature = "desktop")]
pub mod bracket_commands;

#[cfg(feature = "desktop")]
pub use desktop::run;

#[cfg(feature = "desktop")]
mod desktop {
    use crate::bracket_commands;
    use crate::config::*;
    use crate::overlay::start_overlay_server;
    use crate::session::{apply_config_shared, BracketSession};
    use crate::types::*;

    use std::{
        fs,
        sync::{Arc, Mutex},
    };
    use tauri::{RunEvent, State};
    use tracing::{info, warn};
    use tracing_subscriber::EnvFilter;

    // ── Config commands ────────────────────────────────────────────────────

    #[tauri::command]
    fn load_config() -> Result<AppConfig, String> {
        load_config_inner()
    }

    #[tauri::command]
    fn save_config(config: AppConfig, session: State<'_, SharedSession>) -> Result<AppConfig, String> {
        let saved = save_config_inner(config)?;
        apply_config_shared(session.inner(), &saved)?;
        Ok(saved)
    }

    // ── Entry point ────────────────────────────────────────────────────────

    pub fn run() {
        load_env_file();

        // Initialize tracing with file output
        let logs_dir = logs_dir();
        fs::create_dir_all(&logs_dir).ok();
        let file_appender = tracing_appender::rolling::daily(&logs_dir, "app.log");
        let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(non_blocking)
            .with_ansi(false)
            .init();
        info!("Atom Bracket starting");

        let config = load_config_inner().unwrap_or_else(|e| {
            warn!("Falling back to default config: {e}");
            apply_env_defaults(AppConfig::default())
        });
        log_env_warnings(&config);

        let session: SharedSession = Arc::new(Mutex::new(BracketSession::new(&config)));
        let exit_session = session.clone();
        let app = tauri::Builder::default()
            .plugin(tauri_plugin_dialog::init())
            .plugin(tauri_plugin_opener::init())
            .manage(session.clone())
            .setup(move |_app| {
                if !config.overlay_enabled {
                    info!("Overlay server disabled in config");
                    return Ok(());
                }
                let static_dir = overlay_dir();
                fs::create_dir_all(&static_dir).ok();
                let overlay_state = OverlayServerState { session };
                tauri::async_runtime::spawn(start_overlay_server(
                    overlay_state,
                    static_dir,
                    config.overlay_addr.clone(),
                ));
                Ok(())
            })
            .invoke_handler(tauri::generate_handler![
                load_config,
                save_config,
                bracket_commands::get_bracket_state,
                bracket_commands::rename_entrant,
                bracket_commands::attach_artifact_file,
                bracket_commands::pick_artifact_file,
                bracket_commands::attach_artifact_url,
                bracket_commands::toggle_artifact_input_mode,
                bracket_commands::advance_entrant,
                bracket_commands::reset_bracket,
                bracket_commands::open_artifact
            ])
            .build(tauri::generate_context!())
            .expect("error while building tauri app");

        app.run(move |_handle, event| {
            if let RunEvent::Exit = event {
                let mut guard = exit_session.lock().unwrap_or_else(|e| e.into_inner());
                guard.close();
                info!("Atom Bracket exiting");
            }
        });
    }
}
