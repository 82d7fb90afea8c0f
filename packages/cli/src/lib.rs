pub mod api;
pub mod config;
pub mod middleware;
pub mod server;

#[cfg(test)]
mod tests;

pub use config::{Config, ConfigError};
pub use server::{build_app, run, serve};

/// Install the global tracing subscriber; `RUST_LOG` overrides the default `info` filter
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();
}
