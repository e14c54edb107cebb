use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed sleeps between outbound calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// After each non-empty result page
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// After each successful posting-page fetch
    #[serde(default = "default_check_delay_ms")]
    pub check_delay_ms: u64,

    /// After a failed result-page request
    #[serde(default = "default_error_delay_ms")]
    pub error_delay_ms: u64,
}

fn default_page_delay_ms() -> u64 {
    1500
}

fn default_check_delay_ms() -> u64 {
    1000
}

fn default_error_delay_ms() -> u64 {
    3000
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            page_delay_ms: default_page_delay_ms(),
            check_delay_ms: default_check_delay_ms(),
            error_delay_ms: default_error_delay_ms(),
        }
    }
}

impl ThrottleConfig {
    /// No sleeping at all, for tests and dry runs
    pub fn none() -> Self {
        Self {
            page_delay_ms: 0,
            check_delay_ms: 0,
            error_delay_ms: 0,
        }
    }
}

/// Which kind of pause to take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    Page,
    Check,
    Error,
}

/// Sleeps according to a `ThrottleConfig`
#[derive(Debug, Clone, Default)]
pub struct Throttle {
    config: ThrottleConfig,
}

impl Throttle {
    pub fn new(config: ThrottleConfig) -> Self {
        Self { config }
    }

    pub fn duration(&self, pause: Pause) -> Duration {
        let ms = match pause {
            Pause::Page => self.config.page_delay_ms,
            Pause::Check => self.config.check_delay_ms,
            Pause::Error => self.config.error_delay_ms,
        };
        Duration::from_millis(ms)
    }

    pub async fn pause(&self, pause: Pause) {
        let duration = self.duration(pause);
        if duration.is_zero() {
            return;
        }
        ::log::trace!("Sleeping {:?} ({:?})", duration, pause);
        tokio::time::sleep(duration).await;
    }
}
