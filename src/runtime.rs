use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Named one-shot timers driving the two deferred transitions of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deadline {
    /// Hide the flashed target word.
    Mask,
    /// Move to the next word after a failed round's reveal cooldown.
    Advance,
}

/// What the driver loop wakes up for: a keypress, or a timer falling due.
#[derive(Clone, Debug)]
pub enum LoopEvent {
    Key(KeyEvent),
    Due(Deadline),
}

/// Pending one-shot deadlines. Arming replaces any earlier deadline of the
/// same kind; a deadline that fires is disarmed before it is reported, so
/// each arm produces at most one event.
#[derive(Debug, Default)]
pub struct Deadlines {
    mask_at: Option<Instant>,
    advance_at: Option<Instant>,
}

impl Deadlines {
    pub fn arm(&mut self, which: Deadline, after: Duration) {
        let at = Instant::now() + after;
        match which {
            Deadline::Mask => self.mask_at = Some(at),
            Deadline::Advance => self.advance_at = Some(at),
        }
    }

    pub fn cancel(&mut self, which: Deadline) {
        match which {
            Deadline::Mask => self.mask_at = None,
            Deadline::Advance => self.advance_at = None,
        }
    }

    pub fn is_armed(&self, which: Deadline) -> bool {
        match which {
            Deadline::Mask => self.mask_at.is_some(),
            Deadline::Advance => self.advance_at.is_some(),
        }
    }

    fn next_at(&self) -> Option<Instant> {
        match (self.mask_at, self.advance_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, None) => a,
            (None, b) => b,
        }
    }

    fn take_due(&mut self, now: Instant) -> Option<Deadline> {
        if self.mask_at.is_some_and(|at| now >= at) {
            self.mask_at = None;
            return Some(Deadline::Mask);
        }
        if self.advance_at.is_some_and(|at| now >= at) {
            self.advance_at = None;
            return Some(Deadline::Advance);
        }
        None
    }
}

/// Seam over keyboard input so the loop is testable without a tty.
pub trait KeySource {
    /// Wait up to `timeout` for a key; `Ok(None)` on timeout.
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<KeyEvent>>;
}

/// Production source polling crossterm directly; non-key terminal events
/// (resize, focus, paste) are swallowed as timeouts.
#[derive(Debug, Default)]
pub struct CrosstermKeySource;

impl KeySource for CrosstermKeySource {
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<KeyEvent>> {
        if event::poll(timeout)? {
            if let CtEvent::Key(key) = event::read()? {
                return Ok(Some(key));
            }
        }
        Ok(None)
    }
}

/// Blocks for whichever comes first: a key from the source, or the earliest
/// armed deadline. With nothing armed it re-polls at a coarse idle interval.
pub struct Pump<S: KeySource> {
    source: S,
    pub deadlines: Deadlines,
    idle_wait: Duration,
}

impl<S: KeySource> Pump<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            deadlines: Deadlines::default(),
            idle_wait: Duration::from_millis(250),
        }
    }

    pub fn next(&mut self) -> io::Result<LoopEvent> {
        loop {
            let now = Instant::now();
            if let Some(due) = self.deadlines.take_due(now) {
                return Ok(LoopEvent::Due(due));
            }
            let wait = self
                .deadlines
                .next_at()
                .map(|at| at.saturating_duration_since(now))
                .unwrap_or(self.idle_wait)
                .min(self.idle_wait);
            if let Some(key) = self.source.poll_key(wait)? {
                return Ok(LoopEvent::Key(key));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::collections::VecDeque;

    /// Scripted source: each entry is one poll result, then timeouts forever.
    struct ScriptedKeySource {
        polls: VecDeque<Option<KeyEvent>>,
    }

    impl ScriptedKeySource {
        fn new(polls: Vec<Option<KeyEvent>>) -> Self {
            Self {
                polls: polls.into(),
            }
        }
    }

    impl KeySource for ScriptedKeySource {
        fn poll_key(&mut self, _timeout: Duration) -> io::Result<Option<KeyEvent>> {
            Ok(self.polls.pop_front().flatten())
        }
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn armed_deadline_fires_without_any_keys() {
        let mut pump = Pump::new(ScriptedKeySource::new(vec![None, None, None]));
        pump.deadlines.arm(Deadline::Mask, Duration::ZERO);

        match pump.next().unwrap() {
            LoopEvent::Due(Deadline::Mask) => {}
            other => panic!("expected mask deadline, got {other:?}"),
        }
        assert!(!pump.deadlines.is_armed(Deadline::Mask));
    }

    #[test]
    fn key_wins_over_a_far_deadline() {
        let mut pump = Pump::new(ScriptedKeySource::new(vec![Some(key('a'))]));
        pump.deadlines.arm(Deadline::Advance, Duration::from_secs(60));

        match pump.next().unwrap() {
            LoopEvent::Key(k) => assert_eq!(k.code, KeyCode::Char('a')),
            other => panic!("expected key event, got {other:?}"),
        }
        // The untouched deadline stays armed for a later pass.
        assert!(pump.deadlines.is_armed(Deadline::Advance));
    }

    #[test]
    fn deadline_fires_at_most_once_per_arm() {
        let mut deadlines = Deadlines::default();
        deadlines.arm(Deadline::Advance, Duration::ZERO);

        let now = Instant::now();
        assert_eq!(deadlines.take_due(now), Some(Deadline::Advance));
        assert_eq!(deadlines.take_due(now), None);
    }

    #[test]
    fn rearming_replaces_the_earlier_deadline() {
        let mut deadlines = Deadlines::default();
        deadlines.arm(Deadline::Mask, Duration::ZERO);
        deadlines.arm(Deadline::Mask, Duration::from_secs(60));

        // The zero-delay arm was superseded, so nothing is due yet.
        assert_eq!(deadlines.take_due(Instant::now()), None);
        assert!(deadlines.is_armed(Deadline::Mask));
    }

    #[test]
    fn cancel_disarms() {
        let mut deadlines = Deadlines::default();
        deadlines.arm(Deadline::Mask, Duration::ZERO);
        deadlines.cancel(Deadline::Mask);
        assert!(!deadlines.is_armed(Deadline::Mask));
        assert_eq!(deadlines.take_due(Instant::now()), None);
    }

    #[test]
    fn earliest_of_both_deadlines_fires_first() {
        let mut deadlines = Deadlines::default();
        deadlines.arm(Deadline::Mask, Duration::from_secs(60));
        deadlines.arm(Deadline::Advance, Duration::ZERO);

        assert_eq!(deadlines.take_due(Instant::now()), Some(Deadline::Advance));
        assert!(deadlines.is_armed(Deadline::Mask));
    }
}
