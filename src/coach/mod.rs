use chrono::{DateTime, Local};
use rand::Rng;

pub mod command;
pub mod controller;
pub mod narration;
pub mod selector;
pub mod ticker;

pub use command::VoiceCommand;
pub use controller::{Services, SessionController, SessionPhase, View};
pub use ticker::{IntervalTicker, Ticker};

pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Picks the halfway cue. Injectable so tests can pin the choice.
pub trait CueRng {
    /// Uniform index in `0..len`; `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

pub struct ThreadCueRng;

impl CueRng for ThreadCueRng {
    fn pick(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}
