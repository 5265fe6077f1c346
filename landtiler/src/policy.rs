//! Retry and failure policies for tile fetching.
//!
//! - [`RetryPolicy`]: how a single tile handles transient failures
//! - [`FailurePolicy`]: what the assembly does once a tile has exhausted its
//!   retries

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default initial delay for exponential backoff (500ms).
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 500;

/// Default maximum delay for exponential backoff (30 seconds).
pub const DEFAULT_MAX_DELAY_SECS: u64 = 30;

/// Default multiplier for exponential backoff.
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Default number of attempts per tile, including the first.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// How a tile fetch handles transient failures.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum RetryPolicy {
    /// No retries - fail on the first error.
    #[default]
    None,

    /// Fixed number of attempts with a constant delay between them.
    Fixed {
        /// Maximum number of attempts (including the initial attempt).
        max_attempts: u32,
        delay: Duration,
    },

    /// Delay multiplies after each failure, capped at `max_delay`.
    ExponentialBackoff {
        /// Maximum number of attempts (including the initial attempt).
        max_attempts: u32,
        /// Delay after the first failure.
        initial_delay: Duration,
        max_delay: Duration,
        multiplier: f64,
    },
}

impl RetryPolicy {
    /// Exponential backoff with the default delays.
    pub fn exponential(max_attempts: u32) -> Self {
        Self::ExponentialBackoff {
            max_attempts,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            max_delay: Duration::from_secs(DEFAULT_MAX_DELAY_SECS),
            multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }

    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self::Fixed {
            max_attempts,
            delay,
        }
    }

    /// Delay before the retry that follows failed attempt `attempt` (1-based).
    ///
    /// Returns `None` once the attempt budget is spent.
    pub fn delay_for_attempt(&self, attempt: u32) -> Option<Duration> {
        match self {
            Self::None => None,
            Self::Fixed {
                max_attempts,
                delay,
            } => (attempt < *max_attempts).then_some(*delay),
            Self::ExponentialBackoff {
                max_attempts,
                initial_delay,
                max_delay,
                multiplier,
            } => {
                if attempt >= *max_attempts {
                    return None;
                }
                let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
                let delay_ms = initial_delay.as_millis() as f64 * multiplier.powi(exponent);
                let capped = delay_ms.min(max_delay.as_millis() as f64);
                Some(Duration::from_millis(capped as u64))
            }
        }
    }

    /// Maximum number of attempts, never less than one.
    pub fn max_attempts(&self) -> u32 {
        match self {
            Self::None => 1,
            Self::Fixed { max_attempts, .. } => (*max_attempts).max(1),
            Self::ExponentialBackoff { max_attempts, .. } => (*max_attempts).max(1),
        }
    }
}

/// What the assembler does when a tile fails after all retries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// First failure aborts the whole assembly.
    #[default]
    Abort,
    /// Record the failure, leave the tile's window at the default value and
    /// continue.
    SkipTile,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" | "skip-tile" | "skip_tile" => Ok(Self::SkipTile),
            other => Err(format!(
                "unknown failure policy '{}' (expected 'abort' or 'skip')",
                other
            )),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => write!(f, "abort"),
            Self::SkipTile => write!(f, "skip"),
        }
    }
}
