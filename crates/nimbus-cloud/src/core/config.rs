//! Simulation configuration.

use serde::{Deserialize, Serialize};

/// Holds scenario-level simulation parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Period of forced capacity-usage refresh events in simulated seconds.
    ///
    /// Zero disables periodic refreshes, so progress is updated only by
    /// completion-driven events. This is the performance-optimal mode used
    /// for large-scale runs; a positive interval adds intermediate-state
    /// visibility at the cost of event volume without affecting results.
    #[serde(default)]
    pub scheduling_interval: f64,
    /// Maximum simulated time. When positive, the run stops at this time
    /// and unfinished cloudlets are flushed as aborted.
    #[serde(default)]
    pub max_time: f64,
}

impl SimulationConfig {
    /// Creates config with default parameter values.
    pub fn new() -> Self {
        Self {
            scheduling_interval: 0.,
            max_time: 0.,
        }
    }

    /// Creates config by reading parameter values from YAML file.
    pub fn from_file(file_name: &str) -> Self {
        serde_yaml::from_str(
            &std::fs::read_to_string(file_name).unwrap_or_else(|_| panic!("Can't read file {}", file_name)),
        )
        .unwrap_or_else(|_| panic!("Can't parse YAML from file {}", file_name))
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}
