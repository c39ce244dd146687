//! Diagnostic logging to stderr.
//!
//! The subscriber is installed before the config file is read so config
//! warnings are visible; `verbose` from the file is applied afterwards
//! through a reload handle. `RUST_LOG` overrides both.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// Handle for adjusting the log level after startup.
pub struct LogHandle {
    filter: reload::Handle<EnvFilter, Registry>,
}

fn filter_for(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }))
}

/// Install the global subscriber.
pub fn init(verbose: bool) -> LogHandle {
    let (filter, handle) = reload::Layer::new(filter_for(verbose));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
    LogHandle { filter: handle }
}

impl LogHandle {
    pub fn set_verbose(&self, verbose: bool) {
        if let Err(e) = self.filter.modify(|f| *f = filter_for(verbose)) {
            tracing::warn!(error = %e, "failed to change log level");
        }
    }
}
