//! Retry bounds and delay schedules

use std::time::Duration;

/// Wait between a conflicting attempt and the next one
#[derive(Debug, Clone, PartialEq)]
pub enum DelayPolicy {
    Fixed(Duration),
    Exponential {
        initial: Duration,
        max: Duration,
        multiplier: f64,
    },
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self::Fixed(Duration::from_secs(1))
    }
}

impl DelayPolicy {
    pub fn exponential(initial: Duration, max: Duration) -> Self {
        Self::Exponential {
            initial,
            max,
            multiplier: 2.0,
        }
    }

    /// Delay after the given failed attempt (1-based)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            DelayPolicy::Fixed(delay) => *delay,
            DelayPolicy::Exponential {
                initial,
                max,
                multiplier,
            } => {
                let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
                let nanos = initial.as_nanos() as f64 * multiplier.powi(exponent);
                let capped = nanos.min(max.as_nanos() as f64);

                // Float to int casts saturate, so a runaway product lands on u64::MAX
                Duration::from_nanos(capped as u64).min(*max)
            }
        }
    }
}

/// How long a conflicting unit of work keeps being retried
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first
    pub max_attempts: u32,
    pub delay: DelayPolicy,
    /// Give up once another retry would end past this budget
    pub overall_timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: DelayPolicy::default(),
            overall_timeout: None,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: DelayPolicy) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_overall_timeout(mut self, timeout: Duration) -> Self {
        self.overall_timeout = Some(timeout);
        self
    }
}

/// What happened on one attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryAttempt {
    /// 1-based attempt number
    pub attempt: u32,
    /// Whether the attempt ended in a conflict
    pub conflict: bool,
    /// Wait before the next attempt, if one followed
    pub delay: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_delay() {
        let policy = DelayPolicy::default();
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_secs(1));
    }

    #[test]
    fn test_exponential_delay_is_capped() {
        let policy = DelayPolicy::exponential(Duration::from_millis(100), Duration::from_secs(1));

        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(400));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_millis(800));
        assert_eq!(policy.delay_for_attempt(5), Duration::from_secs(1));
        assert_eq!(policy.delay_for_attempt(40), Duration::from_secs(1));
    }

    #[test]
    fn test_exponential_keeps_sub_millisecond_delays() {
        let policy =
            DelayPolicy::exponential(Duration::from_micros(250), Duration::from_millis(10));

        assert_eq!(policy.delay_for_attempt(1), Duration::from_micros(250));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_micros(500));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(1));
        assert_eq!(policy.delay_for_attempt(10), Duration::from_millis(10));
    }

    #[test]
    fn test_retry_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert!(policy.overall_timeout.is_none());
        assert_eq!(RetryPolicy::new(0).max_attempts, 1);
    }
}
