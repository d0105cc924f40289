
use std::time::Duration;

/// What happened to the turn clock during a tick
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClockSignal {
    Running,
    /// The final countdown just started, with this much time left
    CountdownStarted(Duration),
    Expired,
}

/// Advisory per-turn time limit, driven by the host's loop
#[derive(Debug, Clone)]
pub struct TurnClock {
    limit: Duration,
    countdown: Duration,
    elapsed: Duration,
    counting_down: bool,
}

impl TurnClock {
    pub fn new(limit: Duration, countdown: Duration) -> Self {
        Self {
            limit,
            countdown: countdown.min(limit),
            elapsed: Duration::from_secs(0),
            counting_down: false,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn remaining(&self) -> Duration {
        self.limit.checked_sub(self.elapsed).unwrap_or_default()
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::from_secs(0);
        self.counting_down = false;
    }

    pub fn tick(&mut self, delta: Duration) -> ClockSignal {
        self.elapsed += delta;
        if self.elapsed > self.limit {
            return ClockSignal::Expired;
        }
        if !self.counting_down && self.elapsed > self.limit - self.countdown {
            self.counting_down = true;
            return ClockSignal::CountdownStarted(self.remaining());
        }
        ClockSignal::Running
    }
}

impl Default for TurnClock {
    fn default() -> Self {
        Self::new(Duration::from_secs(90), Duration::from_secs(30))
    }
}

#[test]
fn countdown_then_expiry() {
    let mut clock = TurnClock::default();
    assert_eq!(clock.tick(Duration::from_secs(59)), ClockSignal::Running);
    assert_eq!(clock.tick(Duration::from_secs(2)), ClockSignal::CountdownStarted(Duration::from_secs(29)));
    assert_eq!(clock.tick(Duration::from_secs(20)), ClockSignal::Running);
    assert_eq!(clock.tick(Duration::from_secs(10)), ClockSignal::Expired);

    clock.reset();
    assert_eq!(clock.remaining(), Duration::from_secs(90));
    assert_eq!(clock.tick(Duration::from_secs(1)), ClockSignal::Running);
}
