mod app_state;
mod cli;
mod gl_window;

use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

use veil_common::VeilError;
use veil_config::VeilConfig;

const DEFAULT_DIRECTIVE: &str = "veil=info";

/// `--log-level` wins over the config file's `logging.level`.
fn log_directive(cli_override: Option<&str>, config: Option<&VeilConfig>) -> String {
    match (cli_override, config) {
        (Some(directive), _) => directive.to_string(),
        (None, Some(config)) => config.logging.filter_directive(),
        (None, None) => DEFAULT_DIRECTIVE.to_string(),
    }
}

fn init_logging(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|e| {
        eprintln!("Invalid log directive '{directive}' ({e}), using {DEFAULT_DIRECTIVE}");
        EnvFilter::new(DEFAULT_DIRECTIVE)
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(config: VeilConfig) -> Result<(), VeilError> {
    let event_loop = EventLoop::new().map_err(|e| VeilError::Window(e.to_string()))?;
    let mut app = app_state::VeilApp::new(config);

    tracing::info!("Entering event loop");
    event_loop
        .run_app(&mut app)
        .map_err(|e| VeilError::Window(e.to_string()))?;
    match app.take_fatal_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn main() {
    let args = cli::parse();

    let loaded = veil_config::load_config(args.config.as_deref());
    init_logging(&log_directive(
        args.log_level.as_deref(),
        loaded.as_ref().ok(),
    ));

    tracing::info!("Veil v{} starting...", env!("CARGO_PKG_VERSION"));
    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        VeilConfig::default()
    });

    if args.dump_config {
        println!("{}", veil_config::config_to_json(&config));
        return;
    }

    if let Err(e) = run(config) {
        tracing::error!("Fatal: {e}");
        std::process::exit(1);
    }
    tracing::info!("Shutdown complete");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_directive_wins() {
        let config = VeilConfig::default();
        assert_eq!(log_directive(Some("veil=trace"), Some(&config)), "veil=trace");
    }

    #[test]
    fn config_level_used_without_override() {
        let mut config = VeilConfig::default();
        config.logging.level = "DEBUG".into();
        assert_eq!(
            log_directive(None, Some(&config)),
            config.logging.filter_directive()
        );
    }

    #[test]
    fn default_when_config_failed() {
        assert_eq!(log_directive(None, None), DEFAULT_DIRECTIVE);
    }
}
