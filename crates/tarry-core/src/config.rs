use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_ENTER_DELAY: Duration = Duration::from_millis(1);
pub const DEFAULT_EXIT_DELAY: Duration = Duration::ZERO;

/// Delays applied by [`crate::DelayedRender`]. A zero delay means "apply synchronously".
///
/// In JSON the delays are milliseconds, fractions allowed down to the
/// nanosecond; negative values clamp to zero:
///
/// ```rust
/// use tarry_core::DelayConfig;
/// use web_time::Duration;
///
/// let cfg = DelayConfig::from_json(r#"{ "exit_delay_ms": 200 }"#).unwrap();
/// assert_eq!(cfg.enter_delay, Duration::from_millis(1));
/// assert_eq!(cfg.exit_delay, Duration::from_millis(200));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDelayConfig", into = "RawDelayConfig")]
pub struct DelayConfig {
    pub enter_delay: Duration,
    pub exit_delay: Duration,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            enter_delay: DEFAULT_ENTER_DELAY,
            exit_delay: DEFAULT_EXIT_DELAY,
        }
    }
}

impl DelayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both delays zero: mount/unmount and render flip synchronously.
    pub fn immediate() -> Self {
        Self {
            enter_delay: Duration::ZERO,
            exit_delay: Duration::ZERO,
        }
    }

    pub fn enter_delay(mut self, d: Duration) -> Self {
        self.enter_delay = d;
        self
    }

    pub fn exit_delay(mut self, d: Duration) -> Self {
        self.exit_delay = d;
        self
    }

    pub fn from_millis(enter_ms: i64, exit_ms: i64) -> Self {
        Self {
            enter_delay: clamp_millis(enter_ms),
            exit_delay: clamp_millis(exit_ms),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }
}

fn clamp_millis(ms: i64) -> Duration {
    Duration::from_millis(ms.max(0) as u64)
}

// NaN and negatives land on zero; huge values saturate.
fn fractional_millis(ms: f64) -> Duration {
    Duration::from_nanos((ms.max(0.0) * 1e6).round() as u64)
}

fn as_fractional_millis(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1e6
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDelayConfig {
    #[serde(default = "default_enter_ms")]
    enter_delay_ms: f64,
    #[serde(default)]
    exit_delay_ms: f64,
}

fn default_enter_ms() -> f64 {
    as_fractional_millis(DEFAULT_ENTER_DELAY)
}

impl From<RawDelayConfig> for DelayConfig {
    fn from(raw: RawDelayConfig) -> Self {
        Self {
            enter_delay: fractional_millis(raw.enter_delay_ms),
            exit_delay: fractional_millis(raw.exit_delay_ms),
        }
    }
}

impl From<DelayConfig> for RawDelayConfig {
    fn from(cfg: DelayConfig) -> Self {
        Self {
            enter_delay_ms: as_fractional_millis(cfg.enter_delay),
            exit_delay_ms: as_fractional_millis(cfg.exit_delay),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_enter_one_exit_zero() {
        let cfg = DelayConfig::default();
        assert_eq!(cfg.enter_delay, Duration::from_millis(1));
        assert_eq!(cfg.exit_delay, Duration::ZERO);
    }

    #[test]
    fn negative_millis_clamp_to_zero() {
        let cfg = DelayConfig::from_millis(-20, -1);
        assert_eq!(cfg, DelayConfig::immediate());
    }

    #[test]
    fn json_missing_fields_take_defaults() {
        let cfg = DelayConfig::from_json("{}").unwrap();
        assert_eq!(cfg, DelayConfig::default());

        let cfg = DelayConfig::from_json(r#"{"enter_delay_ms": -5, "exit_delay_ms": 300}"#).unwrap();
        assert_eq!(cfg.enter_delay, Duration::ZERO);
        assert_eq!(cfg.exit_delay, Duration::from_millis(300));
    }

    #[test]
    fn json_rejects_garbage() {
        let err = DelayConfig::from_json(r#"{"enter_delay_ms": "soon"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(DelayConfig::from_json(r#"{"enter": 5}"#).is_err());
    }

    #[test]
    fn to_json_writes_millis() {
        let cfg = DelayConfig::new().exit_delay(Duration::from_millis(150));
        assert_eq!(
            cfg.to_json().unwrap(),
            r#"{"enter_delay_ms":1.0,"exit_delay_ms":150.0}"#
        );
    }

    #[test]
    fn sub_millisecond_delays_survive_save_and_load() {
        let cfg = DelayConfig::new()
            .enter_delay(Duration::from_micros(500))
            .exit_delay(Duration::from_nanos(1_250_001));
        let back = DelayConfig::from_json(&cfg.to_json().unwrap()).unwrap();
        assert_eq!(back, cfg);
        assert!(!back.enter_delay.is_zero());
    }

    #[test]
    fn json_accepts_fractional_millis() {
        let cfg = DelayConfig::from_json(r#"{"enter_delay_ms": 0.25, "exit_delay_ms": 12}"#).unwrap();
        assert_eq!(cfg.enter_delay, Duration::from_micros(250));
        assert_eq!(cfg.exit_delay, Duration::from_millis(12));
    }
}
