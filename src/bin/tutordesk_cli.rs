use std::{env, process};

use tutordesk_core::{
    cli::{self, output},
    config::{Config, ConfigManager},
    utils,
};

fn main() {
    let loaded = ConfigManager::new().and_then(|manager| manager.load());
    let config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => Config::default(),
    };
    utils::init_tracing_with(config.log_filter.as_deref());
    if let Err(err) = &loaded {
        tracing::warn!(%err, "falling back to default configuration");
    }

    let args: Vec<String> = env::args().skip(1).collect();
    let result = cli::parse_args(&args).and_then(|command| cli::run(command, &config));
    match result {
        Ok(report) => println!("{report}"),
        Err(err) => {
            output::error(&err);
            process::exit(err.exit_code());
        }
    }
}
