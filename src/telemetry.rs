use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the JSON tracing subscriber. Filtering follows `RUST_LOG`, falling
/// back to `info`. Returns false when a global subscriber is already set.
pub fn init_tracing() -> bool {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,energy_projection_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
        .is_ok()
}
