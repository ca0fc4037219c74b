//! Conflict backoff schedule.
//!
//! Each retry's delay is the sum of the two previous delays, seeded from
//! two small fixed values: a Fibonacci-shaped curve that starts gentle and
//! grows fast enough to spread racing writers apart. The schedule is
//! deterministic: racing instances already desynchronize through the work
//! they do between attempts.

use std::time::Duration;

/// Fibonacci-shaped backoff: explicit two-delay state advanced per retry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FibonacciBackoff {
    current: Duration,
    next: Duration,
}

impl FibonacciBackoff {
    /// Seed the schedule with its first two delays.
    pub fn new(first: Duration, second: Duration) -> Self {
        Self {
            current: first,
            next: second,
        }
    }

    /// Seed from milliseconds.
    pub fn from_millis(first: u64, second: u64) -> Self {
        Self::new(Duration::from_millis(first), Duration::from_millis(second))
    }

    /// The delay to sleep before the next retry; advances the schedule.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        let sum = self.current.saturating_add(self.next);
        self.current = self.next;
        self.next = sum;
        delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_is_fibonacci_shaped() {
        let mut backoff = FibonacciBackoff::from_millis(10, 20);
        let delays: Vec<u64> = (0..6).map(|_| backoff.next_delay().as_millis() as u64).collect();
        assert_eq!(delays, vec![10, 20, 30, 50, 80, 130]);
    }

    #[test]
    fn each_delay_is_sum_of_two_previous() {
        let mut backoff = FibonacciBackoff::from_millis(25, 50);
        let delays: Vec<Duration> = (0..8).map(|_| backoff.next_delay()).collect();
        for w in delays.windows(3) {
            assert_eq!(w[2], w[0] + w[1]);
        }
    }

    #[test]
    fn zero_seeds_stay_zero() {
        let mut backoff = FibonacciBackoff::from_millis(0, 0);
        assert_eq!(backoff.next_delay(), Duration::ZERO);
        assert_eq!(backoff.next_delay(), Duration::ZERO);
        assert_eq!(backoff.next_delay(), Duration::ZERO);
    }
}
