use std::{env, path::PathBuf, sync::Once};

use dirs::home_dir;

const DEFAULT_DIR_NAME: &str = ".tutordesk";
const DEFAULT_DIRECTIVE: &str = "tutordesk_core=info";

static TRACING_INIT: Once = Once::new();

/// Returns the application data directory, defaulting to `~/.tutordesk`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("TUTORDESK_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    init_tracing_with(None);
}

/// Like [`init_tracing`], using `directive` when `RUST_LOG` is unset or invalid.
pub fn init_tracing_with(directive: Option<&str>) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(directive.unwrap_or(DEFAULT_DIRECTIVE)))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        install_subscriber(filter);
    });
}

/// Installs the stderr `fmt` subscriber, returning `false` when the host
/// application already set a global one.
fn install_subscriber(filter: tracing_subscriber::EnvFilter) -> bool {
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!(%err, "tracing subscriber already installed");
            false
        }
    }
}
