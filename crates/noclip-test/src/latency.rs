//! Latency profiles for simulated authority responses
//!
//! A response time is base round trip + server tick delay + jitter.

use std::time::Duration;

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::Rng;

/// Jitter distribution type
#[derive(Clone, Debug)]
pub enum JitterDistribution {
    /// Uniform distribution
    Uniform { min_ms: u32, max_ms: u32 },
    /// Normal distribution (mean, stddev)
    Normal { mean_ms: f64, stddev_ms: f64 },
    /// Pareto distribution (heavy tail)
    Pareto { scale_ms: f64, shape: f64 },
}

impl JitterDistribution {
    /// Sample a jitter value
    pub fn sample(&self, rng: &mut StdRng) -> Duration {
        match self {
            JitterDistribution::Uniform { min_ms, max_ms } => {
                let dist = Uniform::new_inclusive(*min_ms, *max_ms);
                Duration::from_millis(dist.sample(rng) as u64)
            }
            JitterDistribution::Normal { mean_ms, stddev_ms } => {
                // Box-Muller transform
                let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
                let u2: f64 = rng.gen();
                let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
                let value = mean_ms + stddev_ms * z;
                Duration::from_micros((value.max(0.0) * 1000.0) as u64)
            }
            JitterDistribution::Pareto { scale_ms, shape } => {
                let u: f64 = rng.gen_range(f64::EPSILON..1.0);
                let value = scale_ms / u.powf(1.0 / shape);
                // Cap at 400ms. Distant worst case is 200 + 60 + 400 = 660ms, so a
                // response only outlasts the 0.6s default lock in the largest spikes
                Duration::from_micros((value.min(400.0) * 1000.0) as u64)
            }
        }
    }
}

/// Network + server latency seen by one client
#[derive(Clone, Debug)]
pub struct LatencyProfile {
    /// Round trip to the authority
    pub base_rtt: Duration,
    /// Server tick delay range (ms), uniform
    pub server_delay_ms: (u32, u32),
    /// Extra jitter on top
    pub jitter: JitterDistribution,
}

impl Default for LatencyProfile {
    fn default() -> Self {
        LatencyProfile::typical()
    }
}

impl LatencyProfile {
    /// Near-zero ping, overworld server delay
    pub fn local() -> Self {
        LatencyProfile {
            base_rtt: Duration::from_millis(5),
            server_delay_ms: (40, 60),
            jitter: JitterDistribution::Uniform {
                min_ms: 0,
                max_ms: 5,
            },
        }
    }

    /// Residential connection to a nearby data center
    pub fn typical() -> Self {
        LatencyProfile {
            base_rtt: Duration::from_millis(60),
            server_delay_ms: (40, 60),
            jitter: JitterDistribution::Normal {
                mean_ms: 10.0,
                stddev_ms: 8.0,
            },
        }
    }

    /// Cross-continent connection with bursty spikes
    pub fn distant() -> Self {
        LatencyProfile {
            base_rtt: Duration::from_millis(200),
            server_delay_ms: (30, 60),
            jitter: JitterDistribution::Pareto {
                scale_ms: 10.0,
                shape: 1.5,
            },
        }
    }

    /// Sample one response time in seconds
    pub fn sample(&self, rng: &mut StdRng) -> f32 {
        let (lo, hi) = self.server_delay_ms;
        let server = Duration::from_millis(rng.gen_range(lo..=hi) as u64);
        (self.base_rtt + server + self.jitter.sample(rng)).as_secs_f32()
    }
}
