// SPDX-License-Identifier: MPL-2.0
use toastbox::app::{self, Flags};
use toastbox::paths;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "toastbox=info";

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

fn main() -> iced::Result {
    init_tracing();

    let mut args = pico_args::Arguments::from_env();

    let config_dir: Option<String> = args.opt_value_from_str("--config-dir").unwrap_or_else(|err| {
        tracing::warn!(%err, "ignoring invalid --config-dir");
        None
    });
    let duration_ms: Option<u64> = args.opt_value_from_str("--duration-ms").unwrap_or_else(|err| {
        tracing::warn!(%err, "ignoring invalid --duration-ms");
        None
    });

    let remaining = args.finish();
    if !remaining.is_empty() {
        tracing::warn!(?remaining, "ignoring unexpected arguments");
    }

    paths::init_cli_override(config_dir.clone());

    app::run(Flags {
        config_dir,
        duration_ms,
    })
}
