//! Market Pulse - Main Library
//!
//! Periodic market dashboard backend: resilient data feeds, a pure analysis
//! engine and the regional trading schedule, tied together by
//! [`app::PulseApp::run_cycle`].
//!
//! ## Architecture
//!
//! - **types**: plain data model (re-exported from workspace)
//! - **feeds**: transports, relays, cascades, cache and source clients
//! - **analysis**: signals, composite index, anomalies, regions
//! - **config**: YAML configuration
//! - **bin_common**: utilities for binary executables (CLI, runner, shutdown)
//!
//! ## Usage in Binaries
//!
//! ```rust
//! use market_pulse::app::PulseApp;
//! use market_pulse::bin_common::{load_config_from_env, ConfigType};
//! ```

pub use pulse_analysis as analysis;
pub use pulse_config as config;
pub use pulse_feeds as feeds;
pub use pulse_types as types;

pub mod app;
pub mod logging;

pub use app::{PulseApp, PulseCycle};

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;
    pub mod heartbeat;
    pub mod runner;
    pub mod shutdown;

    pub use cli::{load_config_from_env, parse_args, CliOptions, ConfigType};
    pub use heartbeat::Heartbeat;
    pub use runner::{BinaryRunner, RunConfig};
    pub use shutdown::ShutdownManager;
}
