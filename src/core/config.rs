#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::topology::LayerSizes;

/// Upper bound on neurons across all layers.
pub const MAX_NEURONS: usize = 4096;
/// Upper bound on connections between adjacent layers.
pub const MAX_CONNECTIONS: usize = 1 << 20;

/// Errors produced while loading or validating a [`SimConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be finite and > 0 (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must be finite and >= 0 (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be finite (got {value})")]
    NotFinite { field: &'static str, value: f32 },

    #[error("layers {input},{hidden},{output} exceed the neuron or connection limit")]
    TooManyNeurons {
        input: usize,
        hidden: usize,
        output: usize,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Construction parameters for a [`crate::Simulator`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    pub layers: LayerSizes,

    /// Seconds for a signal to cross one connection.
    pub travel_duration_s: f32,

    /// Dwell time of each propagation phase (seconds).
    pub phase_duration_s: f32,

    /// Horizontal inset of the input and output layers.
    pub padding: f32,

    /// Angular rate of the idle neuron glow (radians per second).
    pub pulse_rate: f32,

    /// Trailing points exported for signals spawned with a trail.
    pub trail_length: usize,
    /// Progress gap between consecutive trail points.
    pub trail_spacing: f32,

    /// Fixed seed for reproducible runs. `None` seeds from the wall clock.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            layers: LayerSizes::default(),
            travel_duration_s: 1.5,
            phase_duration_s: 4.0,
            padding: 60.0,
            pulse_rate: 2.0,
            trail_length: 4,
            trail_spacing: 0.06,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_layers(self.layers)?;
        positive("travel_duration_s", self.travel_duration_s)?;
        positive("phase_duration_s", self.phase_duration_s)?;
        non_negative("padding", self.padding)?;
        non_negative("trail_spacing", self.trail_spacing)?;
        if !self.pulse_rate.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "pulse_rate",
                value: self.pulse_rate,
            });
        }
        Ok(())
    }

    /// Parse a JSON document; missing fields fall back to defaults.
    #[cfg(feature = "serde")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_layers(mut self, layers: LayerSizes) -> Self {
        self.layers = layers;
        self
    }

    /// Set the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_durations(mut self, travel_s: f32, phase_s: f32) -> Self {
        self.travel_duration_s = travel_s;
        self.phase_duration_s = phase_s;
        self
    }
}

/// Reject layer sizes whose topology would not fit the neuron and connection
/// limits.
pub fn check_layers(layers: LayerSizes) -> Result<(), ConfigError> {
    let fits = layers.checked_total().is_some_and(|n| n <= MAX_NEURONS)
        && layers
            .checked_connection_count()
            .is_some_and(|n| n <= MAX_CONNECTIONS);
    if fits {
        Ok(())
    } else {
        Err(ConfigError::TooManyNeurons {
            input: layers.input,
            hidden: layers.hidden,
            output: layers.output,
        })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = SimConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.layers, LayerSizes::new(3, 4, 2));
    }

    #[test]
    fn rejects_non_positive_durations() {
        let cfg = SimConfig::default().with_durations(0.0, 4.0);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NotPositive {
                field: "travel_duration_s",
                ..
            })
        ));

        let cfg = SimConfig::default().with_durations(1.5, f32::NAN);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NotPositive {
                field: "phase_duration_s",
                ..
            })
        ));
    }

    #[test]
    fn rejects_negative_padding() {
        let cfg = SimConfig {
            padding: -1.0,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.to_string(), "padding must be finite and >= 0 (got -1)");
    }

    #[test]
    fn rejects_oversized_layers() {
        let too_many = SimConfig::default().with_layers(LayerSizes::new(MAX_NEURONS, 1, 1));
        assert!(matches!(
            too_many.validate(),
            Err(ConfigError::TooManyNeurons { hidden: 1, .. })
        ));

        // 2100 neurons, but 1.1M connections.
        let dense = SimConfig::default().with_layers(LayerSizes::new(1000, 1100, 0));
        assert!(dense.validate().is_err());

        let overflow = SimConfig::default().with_layers(LayerSizes::new(usize::MAX, usize::MAX, 1));
        assert!(overflow.validate().is_err());

        let ok = SimConfig::default().with_layers(LayerSizes::new(32, 64, 16));
        assert!(ok.validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_with_huge_layer_count_is_rejected() {
        let err = SimConfig::from_json_str(
            r#"{ "layers": { "input": 18446744073709551615, "hidden": 4, "output": 2 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::TooManyNeurons { hidden: 4, .. }));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let cfg = SimConfig::from_json_str(
            r#"{ "layers": { "input": 5, "hidden": 6, "output": 3 }, "seed": 9 }"#,
        )
        .unwrap();
        assert_eq!(cfg.layers, LayerSizes::new(5, 6, 3));
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.phase_duration_s, 4.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_errors_are_reported() {
        assert!(matches!(
            SimConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SimConfig::from_json_str(r#"{ "phase_duration_s": -2.0 }"#),
            Err(ConfigError::NotPositive { .. })
        ));
    }
}
