//! Binary runner utilities
//!
//! Banner, run loop and shutdown reporting shared by long-running binaries.

use tracing::info;

/// Configuration for running a binary application
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Name of the binary (for logging)
    pub name: String,
    /// Heartbeat interval in seconds
    pub heartbeat_interval_secs: u64,
    /// Main loop interval in seconds (if applicable)
    pub loop_interval_secs: Option<u64>,
}

impl RunConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            heartbeat_interval_secs: 300,
            loop_interval_secs: None,
        }
    }

    pub fn with_heartbeat(mut self, secs: u64) -> Self {
        self.heartbeat_interval_secs = secs;
        self
    }

    pub fn with_loop_interval(mut self, secs: u64) -> Self {
        self.loop_interval_secs = Some(secs);
        self
    }
}

/// Long-running binary with a banner on start and a summary on stop
pub trait BinaryRunner {
    /// Run the application main loop
    async fn run(&mut self) -> anyhow::Result<()>;

    fn config(&self) -> &RunConfig;

    /// One-line summary printed after the loop exits
    fn stats(&self) -> Option<String> {
        None
    }

    fn print_banner(&self) {
        let config = self.config();
        info!("");
        info!("========================================");
        info!("Starting {}", config.name);
        if let Some(secs) = config.loop_interval_secs {
            info!("Refreshing every {} seconds", secs);
        }
        info!("Press Ctrl+C to stop");
        info!("========================================");
        info!("");
    }

    fn print_shutdown(&self, stats: Option<&str>) {
        let config = self.config();
        info!("");
        info!("========================================");
        info!("{} stopped gracefully", config.name);
        if let Some(stats) = stats {
            info!("{}", stats);
        }
        info!("========================================");
    }

    /// Execute the binary with banner and shutdown reporting
    async fn execute(&mut self) -> anyhow::Result<()> {
        self.print_banner();
        let result = self.run().await;
        let stats = self.stats();
        self.print_shutdown(stats.as_deref());
        result
    }
}
