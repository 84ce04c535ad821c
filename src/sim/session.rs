//! Round lifecycle shared by every mini-game
//!
//! ```text
//! Ready -> Running -> PendingDisplay -> Reported
//!    \________\______________\-------> Cancelled
//! ```
//!
//! A round ends at most once. The result is held for a display delay before
//! it is reported, and a cancelled round never reports.

use serde::{Deserialize, Serialize};

/// Final result handed to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub score: u32,
    /// 0..=3
    pub stars: u8,
    pub won: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Mounted, not yet started
    Ready,
    Running,
    /// Over; result shown for `remaining_ms` before it is reported
    PendingDisplay {
        remaining_ms: f64,
        completion: Completion,
    },
    Reported(Completion),
    /// Torn down by the host; never reports
    Cancelled,
}

/// Countdown and terminal state of one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// `None` for untimed rounds
    pub time_limit_secs: Option<u32>,
    pub time_remaining: u32,
    pub phase: RoundPhase,
    display_ms: f64,
}

impl Session {
    pub fn new(time_limit_secs: Option<u32>, display_ms: f64) -> Self {
        Self {
            time_limit_secs,
            time_remaining: time_limit_secs.unwrap_or(0),
            phase: RoundPhase::Ready,
            display_ms,
        }
    }

    pub fn start(&mut self) {
        if self.phase == RoundPhase::Ready {
            self.phase = RoundPhase::Running;
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    /// Reached a terminal state (reported or not)
    pub fn is_over(&self) -> bool {
        matches!(
            self.phase,
            RoundPhase::PendingDisplay { .. } | RoundPhase::Reported(_)
        )
    }

    /// The result, once the round is over
    pub fn outcome(&self) -> Option<Completion> {
        match self.phase {
            RoundPhase::PendingDisplay { completion, .. } | RoundPhase::Reported(completion) => {
                Some(completion)
            }
            _ => None,
        }
    }

    /// One second of round time. Returns true when the clock runs out.
    pub fn countdown_tick(&mut self) -> bool {
        if !self.is_running() || self.time_limit_secs.is_none() {
            return false;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        self.time_remaining == 0
    }

    /// Seconds left as a fraction of the limit
    pub fn time_fraction(&self) -> f64 {
        match self.time_limit_secs {
            Some(limit) if limit > 0 => self.time_remaining as f64 / limit as f64,
            _ => 0.0,
        }
    }

    /// End the round. Only the first call has an effect.
    pub fn finish(&mut self, won: bool, score: u32, stars: u8) -> bool {
        if !self.is_running() {
            return false;
        }
        let completion = Completion {
            score,
            stars: stars.min(3),
            won,
        };
        log::info!(
            "Round {} with score {} ({} stars)",
            if won { "won" } else { "lost" },
            score,
            completion.stars
        );
        self.phase = RoundPhase::PendingDisplay {
            remaining_ms: self.display_ms,
            completion,
        };
        true
    }

    /// Run down the display delay; yields the completion exactly once
    pub fn advance_display(&mut self, elapsed_ms: f64) -> Option<Completion> {
        if let RoundPhase::PendingDisplay {
            remaining_ms,
            completion,
        } = &mut self.phase
        {
            *remaining_ms -= elapsed_ms.max(0.0);
            if *remaining_ms <= 0.0 {
                let completion = *completion;
                self.phase = RoundPhase::Reported(completion);
                return Some(completion);
            }
        }
        None
    }

    pub fn cancel(&mut self) {
        if !matches!(self.phase, RoundPhase::Reported(_)) {
            self.phase = RoundPhase::Cancelled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_expires() {
        let mut session = Session::new(Some(2), 2000.0);
        assert!(!session.countdown_tick(), "not started yet");
        session.start();
        assert!(!session.countdown_tick());
        assert_eq!(session.time_remaining, 1);
        assert!(session.countdown_tick());
        assert_eq!(session.time_remaining, 0);
    }

    #[test]
    fn test_untimed_never_expires() {
        let mut session = Session::new(None, 2000.0);
        session.start();
        for _ in 0..1000 {
            assert!(!session.countdown_tick());
        }
    }

    #[test]
    fn test_finish_only_once() {
        let mut session = Session::new(Some(60), 2000.0);
        session.start();
        assert!(session.finish(true, 120, 2));
        assert!(!session.finish(false, 0, 0));
        assert_eq!(
            session.outcome(),
            Some(Completion {
                score: 120,
                stars: 2,
                won: true
            })
        );
    }

    #[test]
    fn test_completion_after_display_delay() {
        let mut session = Session::new(Some(60), 2000.0);
        session.start();
        session.finish(false, 30, 0);

        assert_eq!(session.advance_display(1999.0), None);
        let completion = session.advance_display(1.0).unwrap();
        assert_eq!(completion.score, 30);
        assert!(!completion.won);
        assert_eq!(session.advance_display(5000.0), None);
        assert!(matches!(session.phase, RoundPhase::Reported(_)));
    }

    #[test]
    fn test_cancel_suppresses_completion() {
        let mut session = Session::new(Some(60), 2000.0);
        session.start();
        session.finish(true, 10, 1);
        session.cancel();
        assert_eq!(session.advance_display(5000.0), None);
        assert_eq!(session.phase, RoundPhase::Cancelled);
    }

    #[test]
    fn test_stars_are_clamped() {
        let mut session = Session::new(None, 0.0);
        session.start();
        session.finish(true, 1, 9);
        assert_eq!(session.outcome().map(|c| c.stars), Some(3));
    }
}
