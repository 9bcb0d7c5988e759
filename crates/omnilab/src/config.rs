//! Session configuration.

use crate::error::LabError;
use serde::{Deserialize, Serialize};

/// How the interpreter treats the open/close mechanism verbs.
///
/// The two policies reflect the two behaviors observed in the wild; the
/// choice is explicit configuration, not an implicit code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MechanismPolicy {
    /// "open"/"close" must co-occur with a mechanism subject word
    /// ("helmet", "mask", "suit", "face"). The default.
    #[default]
    SubjectRequired,
    /// The bare verb is enough ("open" alone opens the faceplate).
    BareVerb,
}

/// Tunable parameters of a lab session.
///
/// All values have defaults; a TOML config file may override any subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    /// Diagnostic step cadence in milliseconds.
    pub tick_interval_ms: u64,
    /// Load added per diagnostic step.
    pub load_step: f64,
    /// Probability that a completed diagnostic run passes, in `0.0..=1.0`.
    pub pass_probability: f64,
    /// Open/close verb policy for the interpreter.
    pub mechanism_policy: MechanismPolicy,
    /// Idle auto-rotation rate of the active assembly, radians per second.
    pub idle_spin_rate: f64,
    /// Faceplate opening animation duration in milliseconds.
    pub open_duration_ms: u64,
    /// Faceplate closing animation duration in milliseconds.
    pub close_duration_ms: u64,
    /// Camera focus / view reset animation duration in milliseconds.
    pub focus_duration_ms: u64,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 80,
            load_step: 4.0,
            pass_probability: 0.75,
            mechanism_policy: MechanismPolicy::default(),
            idle_spin_rate: 0.12,
            open_duration_ms: 900,
            close_duration_ms: 1200,
            focus_duration_ms: 1500,
        }
    }
}

impl LabConfig {
    /// Parse a config from TOML text, validating ranges.
    pub fn from_toml_str(text: &str) -> Result<Self, LabError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that all values are inside their legal ranges.
    pub fn validate(&self) -> Result<(), LabError> {
        if !(0.0..=1.0).contains(&self.pass_probability) {
            return Err(LabError::InvalidConfig(format!(
                "pass_probability must be in 0.0..=1.0, got {}",
                self.pass_probability
            )));
        }
        if self.load_step <= 0.0 {
            return Err(LabError::InvalidConfig(format!(
                "load_step must be positive, got {}",
                self.load_step
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(LabError::InvalidConfig(
                "tick_interval_ms must be nonzero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(LabConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_overrides() {
        let config = LabConfig::from_toml_str(
            r#"
            pass_probability = 0.5
            mechanism_policy = "bare_verb"
            "#,
        )
        .unwrap();
        assert_eq!(config.pass_probability, 0.5);
        assert_eq!(config.mechanism_policy, MechanismPolicy::BareVerb);
        // Untouched fields keep their defaults.
        assert_eq!(config.tick_interval_ms, 80);
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let err = LabConfig::from_toml_str("pass_probability = 1.5").unwrap_err();
        assert!(matches!(err, crate::LabError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_unparseable_toml() {
        let err = LabConfig::from_toml_str("pass_probability = \"lots\"").unwrap_err();
        assert!(matches!(err, crate::LabError::ConfigParse(_)));
    }
}
