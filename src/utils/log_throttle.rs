use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Window {
    started_at: Option<Instant>,
    suppressed: u64,
}

/// Rate limiter for one noisy log line.
///
/// The first event of a window is emitted; later events in the same window
/// are only counted, and the count is handed to the next emitted event.
#[derive(Debug)]
pub struct LogThrottle {
    interval: Duration,
    window: Mutex<Window>,
}

impl LogThrottle {
    pub fn new(interval: Duration) -> Self {
        LogThrottle {
            interval,
            window: Mutex::new(Window {
                started_at: None,
                suppressed: 0,
            }),
        }
    }

    /// Returns `Some(suppressed_count)` when the event should be logged,
    /// otherwise `None` and the event is counted as suppressed.
    pub fn should_emit(&self) -> Option<u64> {
        let mut window = self.window.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        match window.started_at {
            Some(started) if now.duration_since(started) < self.interval => {
                window.suppressed += 1;
                None
            }
            _ => {
                let suppressed = window.suppressed;
                window.started_at = Some(now);
                window.suppressed = 0;
                Some(suppressed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LogThrottle;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn emits_then_suppresses_then_emits_with_count() {
        let throttle = LogThrottle::new(Duration::from_millis(20));

        assert_eq!(throttle.should_emit(), Some(0));
        assert_eq!(throttle.should_emit(), None);
        assert_eq!(throttle.should_emit(), None);

        sleep(Duration::from_millis(30));
        assert_eq!(throttle.should_emit(), Some(2));
    }
}
