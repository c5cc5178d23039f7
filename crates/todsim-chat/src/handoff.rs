/// State of the automatic feedback hand-off countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Countdown {
    #[default]
    Idle,
    Running { remaining: u32 },
    Cancelled,
    Completed,
}

/// Result of advancing the countdown by one second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Not running; nothing to do
    Inactive,
    Remaining(u32),
    Elapsed,
}

impl Countdown {
    /// Start counting down from `seconds`; only an idle countdown starts
    pub fn start(&mut self, seconds: u32) -> bool {
        if *self != Countdown::Idle {
            return false;
        }
        *self = Countdown::Running {
            remaining: seconds.max(1),
        };
        true
    }

    pub fn tick(&mut self) -> Tick {
        match *self {
            Countdown::Running { remaining } if remaining > 1 => {
                *self = Countdown::Running {
                    remaining: remaining - 1,
                };
                Tick::Remaining(remaining - 1)
            }
            Countdown::Running { .. } => {
                *self = Countdown::Completed;
                Tick::Elapsed
            }
            _ => Tick::Inactive,
        }
    }

    pub fn cancel(&mut self) -> bool {
        if matches!(self, Countdown::Running { .. }) {
            *self = Countdown::Cancelled;
            true
        } else {
            false
        }
    }

    /// Mark the hand-off done; false if it already happened
    pub fn complete(&mut self) -> bool {
        if *self == Countdown::Completed {
            return false;
        }
        *self = Countdown::Completed;
        true
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Countdown::Running { .. })
    }

    pub fn remaining(&self) -> Option<u32> {
        match self {
            Countdown::Running { remaining } => Some(*remaining),
            _ => None,
        }
    }
}
