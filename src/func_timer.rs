use log::debug;
use std::time::{Duration, Instant};

/// Logs how long a stage took when it goes out of scope.
pub struct FunctionTimer {
    name: &'static str,
    start: Instant,
}

impl FunctionTimer {
    pub fn new(name: &'static str) -> Self {
        FunctionTimer {
            name,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

// Called automatically when the `FunctionTimer` goes out of scope.
impl Drop for FunctionTimer {
    fn drop(&mut self) {
        debug!("'{}' took: {:?}", self.name, self.elapsed());
    }
}
