use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Options recognized when setting up a subscription. Two sources layer:
/// per-subscriber overrides beat these defaults, field by field.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SseConfig {
    /// Default stream endpoint. A subscription cannot be built if neither
    /// this nor an override supplies one.
    pub server_url: Option<String>,
    /// Default channel scope, in request order.
    pub channels: Vec<String>,
    /// Emit informational log lines (resolved URL, per-message dumps).
    /// Never affects the `sse.*` event sequence.
    pub debug: bool,
    /// Rebuild policy applied by the reconnect supervisor. The connection
    /// manager itself never retries.
    #[serde(default)]
    pub reconnect: ReconnectPolicy,
}

impl Default for SseConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            channels: Vec::new(),
            debug: false,
            reconnect: ReconnectPolicy::None,
        }
    }
}

/// Per-subscriber override inputs. `channels: None` (absent) falls back to the
/// config default; `channels: Some("")` (present but empty) is an explicitly
/// empty scope. The two cases are distinct.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SubscriberOverrides {
    pub server_url: Option<String>,
    pub channels: Option<String>,
}

/// What to do after a connection enters the `Error` state.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy")]
pub enum ReconnectPolicy {
    /// Stay in `Error` until the caller rebuilds. Matches the core contract.
    #[default]
    None,
    FixedDelay { delay: Duration },
    Backoff {
        base: Duration,
        max: Duration,
        max_attempts: u32,
    },
}

impl ReconnectPolicy {
    /// Delay before rebuild attempt `attempt` (0-based), or None to give up.
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        match self {
            Self::None => None,
            Self::FixedDelay { delay } => Some(*delay),
            Self::Backoff {
                base,
                max,
                max_attempts,
            } => {
                if attempt >= *max_attempts {
                    return None;
                }
                let exp = base.as_millis() as f64 * 2.0_f64.powi(attempt as i32);
                let capped = exp.min(max.as_millis() as f64);
                Some(Duration::from_millis(capped as u64))
            }
        }
    }
}
