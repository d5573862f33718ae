use std::time::Duration;

/// Emulator configuration options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatorSettings {
    /// Wall-clock time between two machine cycles. Zero runs the processor
    /// as fast as the host allows
    pub tick_interval: Duration,

    /// Stop after this many machine cycles. `None` runs until quit
    pub tick_limit: Option<u64>,

    /// Render DATA, Q, EF1-4 and the run state on stdout after every tick
    pub status_line: bool,

    /// Load the program but wait for a `run` command before starting
    pub start_paused: bool,

    /// Machine cycles between two speed reports
    pub metrics_interval: u64,
}

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1);
pub const DEFAULT_METRICS_INTERVAL: u64 = 100_000;

impl Default for EmulatorSettings {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            tick_limit: None,
            status_line: true,
            start_paused: false,
            metrics_interval: DEFAULT_METRICS_INTERVAL,
        }
    }
}
