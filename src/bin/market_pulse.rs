use anyhow::{Context, Result};
use chrono::Utc;
use market_pulse::bin_common::{
    load_config_from_env, parse_args, BinaryRunner, CliOptions, Heartbeat, RunConfig, ShutdownManager,
};
use market_pulse::config::PulseConfig;
use market_pulse::logging::{init_tracing_with_level, with_startup_logging};
use market_pulse::PulseApp;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let options = CliOptions::from_args(&parse_args());
    let config_path = load_config_from_env(options.config_type());
    let config = with_startup_logging(|| PulseConfig::load_or_default(&config_path))
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    init_tracing_with_level(&config.log_level);
    config.log();

    let app = PulseApp::new(&config)?;

    if options.once {
        let cycle = app.run_cycle(Utc::now()).await;
        println!("{}", serde_json::to_string_pretty(&cycle)?);
        return Ok(());
    }

    let mut runner = PulseRunner::new(app, &config);
    runner.shutdown.spawn_signal_handler();
    runner.execute().await
}

struct PulseRunner {
    app: PulseApp,
    config: PulseConfig,
    run_config: RunConfig,
    shutdown: ShutdownManager,
    heartbeat: Heartbeat,
    cycles: u64,
    fully_cached_cycles: u64,
}

impl PulseRunner {
    fn new(app: PulseApp, config: &PulseConfig) -> Self {
        Self {
            app,
            config: config.clone(),
            run_config: RunConfig::new("Market Pulse")
                .with_heartbeat(config.heartbeat_interval_secs)
                .with_loop_interval(config.refresh_interval_secs),
            shutdown: ShutdownManager::new(),
            heartbeat: Heartbeat::new(config.heartbeat_interval_secs),
            cycles: 0,
            fully_cached_cycles: 0,
        }
    }

    fn handle_heartbeat(&mut self) {
        if self.heartbeat.should_beat() {
            info!(
                "Heartbeat: {} cycles run, {} served entirely from cache",
                self.cycles, self.fully_cached_cycles
            );
            self.heartbeat.beat();
        }
    }
}

impl BinaryRunner for PulseRunner {
    async fn run(&mut self) -> Result<()> {
        while self.shutdown.is_running() {
            let cycle = self.app.run_cycle(Utc::now()).await;
            self.cycles += 1;
            if cycle.freshness.is_fully_cached() {
                self.fully_cached_cycles += 1;
            }

            self.handle_heartbeat();

            self.shutdown
                .interruptible_sleep(self.config.refresh_interval())
                .await;
        }
        Ok(())
    }

    fn config(&self) -> &RunConfig {
        &self.run_config
    }

    fn stats(&self) -> Option<String> {
        Some(format!("Total cycles run: {}", self.cycles))
    }
}
