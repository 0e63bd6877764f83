use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const DEFAULT_MAX_REQUESTS: usize = 10;
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Sliding-window request log for outbound call admission.
///
/// Holds the timestamps of calls attempted within the trailing interval.
/// Bursts up to `max_requests` pass immediately; past that the caller must
/// wait until the oldest logged call ages out of the window.
#[derive(Debug)]
pub struct RequestWindow {
    max_requests: usize,
    interval: Duration,
    sent: VecDeque<Instant>,
}

impl RequestWindow {
    pub fn new(max_requests: usize, interval: Duration) -> Self {
        Self {
            max_requests,
            interval,
            sent: VecDeque::new(),
        }
    }

    /// Prune entries older than the interval, then report how long the
    /// caller must wait before the next call is admitted. `None` means the
    /// call may proceed now.
    pub fn wait_needed(&mut self, now: Instant) -> Option<Duration> {
        while let Some(&oldest) = self.sent.front() {
            if now.duration_since(oldest) >= self.interval {
                self.sent.pop_front();
            } else {
                break;
            }
        }
        if self.sent.len() < self.max_requests {
            return None;
        }
        let oldest = *self.sent.front()?;
        let elapsed = now.duration_since(oldest);
        if elapsed >= self.interval {
            None
        } else {
            Some(self.interval - elapsed)
        }
    }

    /// Log a completed call attempt. Called after the request returns, so
    /// in-flight calls are never under-counted.
    pub fn record(&mut self, now: Instant) {
        self.sent.push_back(now);
    }

    pub fn logged_calls(&self) -> usize {
        self.sent.len()
    }
}

impl Default for RequestWindow {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_below_limit_is_admitted() {
        let mut window = RequestWindow::new(3, Duration::from_secs(10));
        let start = Instant::now();
        for offset in 0..2 {
            assert_eq!(window.wait_needed(start + Duration::from_millis(offset)), None);
            window.record(start + Duration::from_millis(offset));
        }
        assert_eq!(window.wait_needed(start + Duration::from_millis(2)), None);
    }

    #[test]
    fn saturated_window_blocks_until_oldest_ages_out() {
        let mut window = RequestWindow::new(3, Duration::from_secs(10));
        let start = Instant::now();
        for offset in 0..3 {
            window.record(start + Duration::from_secs(offset));
        }
        // Fourth call at t=3s must wait until 10s after the first call.
        let wait = window.wait_needed(start + Duration::from_secs(3));
        assert_eq!(wait, Some(Duration::from_secs(7)));
    }

    #[test]
    fn old_entries_are_pruned_before_admission() {
        let mut window = RequestWindow::new(2, Duration::from_secs(10));
        let start = Instant::now();
        window.record(start);
        window.record(start + Duration::from_secs(1));
        // Both entries aged out, the window is clear again.
        assert_eq!(window.wait_needed(start + Duration::from_secs(11)), None);
        assert_eq!(window.logged_calls(), 0);
    }

    #[test]
    fn waiting_out_the_window_admits_the_call() {
        let mut window = RequestWindow::new(1, Duration::from_secs(10));
        let start = Instant::now();
        window.record(start);
        let wait = window.wait_needed(start + Duration::from_secs(4)).unwrap();
        assert_eq!(wait, Duration::from_secs(6));
        // After sleeping out the reported wait the call goes through.
        assert_eq!(window.wait_needed(start + Duration::from_secs(4) + wait), None);
    }
}
