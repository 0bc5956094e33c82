//! Report how long the run took.

use std::time::{Duration, Instant};

use super::Stream;
use crate::observer::{Observer, SuiteInfo};

/// `(0.3 seconds)`.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("({:.1} seconds)", elapsed.as_secs_f64())
}

#[derive(Debug)]
pub struct TimedReporter {
    stream: Stream,
    started: Option<Instant>,
}

impl TimedReporter {
    pub fn new(stream: Stream) -> Self {
        Self { stream, started: None }
    }
}

impl Observer for TimedReporter {
    fn suite_started(&mut self, _suite: &SuiteInfo) {
        self.started = Some(Instant::now());
    }

    fn suite_ended(&mut self, _suite: &SuiteInfo) {
        let elapsed = self.started.map(|started| started.elapsed()).unwrap_or_default();
        self.stream.line(&format_elapsed(elapsed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_millis(0)), "(0.0 seconds)");
        assert_eq!(format_elapsed(Duration::from_millis(1260)), "(1.3 seconds)");
    }
}
