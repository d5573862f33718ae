//! This module provides a way to gather execution speed metrics for the
//! emulator
//!

use std::time::Duration;
use std::time::Instant;

use log::debug;

#[derive(Debug)]
struct RawMetrics {
    record_start: Instant,
    ticks: u64,
}

#[derive(Debug)]
pub struct Metrics {
    pub recorded_time: Duration,
    pub ticks: u64,
    pub ticks_per_second: u64,
}

pub struct Collector {
    collecting: RawMetrics,
}

impl Collector {
    pub fn new() -> Self {
        Self {
            collecting: RawMetrics {
                record_start: Instant::now(),
                ticks: 0,
            },
        }
    }

    /// Close the current recording window and start a new one
    pub fn collect(&mut self) -> Metrics {
        debug!("Raw metrics: {:?}", self.collecting);
        let recorded_time = self.collecting.record_start.elapsed();
        let ticks = self.collecting.ticks;

        let metrics = Metrics {
            recorded_time,
            ticks,
            ticks_per_second: ticks_per_second(ticks, recorded_time),
        };

        self.collecting.record_start = Instant::now();
        self.collecting.ticks = 0;

        metrics
    }

    pub fn observe_tick(&mut self) {
        self.collecting.ticks += 1;
    }

    pub fn observed_ticks(&self) -> u64 {
        self.collecting.ticks
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

fn ticks_per_second(ticks: u64, elapsed: Duration) -> u64 {
    let micros = elapsed.as_micros();
    if micros == 0 {
        return 0;
    }
    (ticks as u128 * 1_000_000 / micros) as u64
}
