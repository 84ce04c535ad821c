//! Turn arbitration and scoring for the board game
//!
//! ```text
//! AwaitingShot(side) --shot--> BodiesMoving --all stopped--> AwaitingShot(next)
//!                                                        \-> RoundOver
//! ```
//!
//! Captures are scored as they happen. Whether the acting side shoots again
//! is decided by the last capture of the shot.

use serde::{Deserialize, Serialize};

use super::body::BodyKind;
use super::pocket::CaptureEvent;
use crate::tuning::BoardTuning;

/// One of the two players at the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The human, playing white
    Player,
    /// The scripted opponent, playing black
    Opponent,
}

impl Side {
    pub fn own_kind(self) -> BodyKind {
        match self {
            Side::Player => BodyKind::White,
            Side::Opponent => BodyKind::Black,
        }
    }

    pub fn other(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }

    fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Opponent => 1,
        }
    }
}

/// Scoring consequence of a single capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureOutcome {
    /// Striker pocketed
    StrikerFoul,
    /// Queen pocketed, by either side
    Queen,
    /// Acting side pocketed its own colour
    OwnPiece,
    /// Acting side pocketed the other colour
    WrongPiece,
}

impl CaptureOutcome {
    pub fn classify(kind: BodyKind, side: Side) -> Self {
        match kind {
            BodyKind::Striker => CaptureOutcome::StrikerFoul,
            BodyKind::Queen => CaptureOutcome::Queen,
            k if k == side.own_kind() => CaptureOutcome::OwnPiece,
            _ => CaptureOutcome::WrongPiece,
        }
    }

    pub fn is_foul(self) -> bool {
        matches!(self, CaptureOutcome::StrikerFoul | CaptureOutcome::WrongPiece)
    }

    pub fn earns_extra_turn(self) -> bool {
        matches!(self, CaptureOutcome::Queen | CaptureOutcome::OwnPiece)
    }

    /// Signed score change for the acting side
    pub fn score_delta(self, tuning: &BoardTuning) -> i64 {
        match self {
            CaptureOutcome::StrikerFoul => -(tuning.striker_foul_penalty as i64),
            CaptureOutcome::Queen => tuning.queen_points as i64,
            CaptureOutcome::OwnPiece => tuning.piece_points as i64,
            CaptureOutcome::WrongPiece => -(tuning.wrong_piece_penalty as i64),
        }
    }
}

/// Where the board is in its turn cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    AwaitingShot(Side),
    BodiesMoving,
    RoundOver,
}

/// Whose turn it is and the running score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnState {
    pub current_side: Side,
    pub phase: TurnPhase,
    /// Indexed by `Side`; never negative
    scores: [u32; 2],
    pub foul_count: u32,
    /// False exactly while a shot is in flight
    pub can_shoot: bool,
    /// Set by a capture that earns another shot, cleared by a foul
    pub last_captured_side: Option<Side>,
    /// Counts turn changes, starting at 1
    pub turn_number: u32,
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnState {
    pub fn new() -> Self {
        Self {
            current_side: Side::Player,
            phase: TurnPhase::AwaitingShot(Side::Player),
            scores: [0, 0],
            foul_count: 0,
            can_shoot: true,
            last_captured_side: None,
            turn_number: 1,
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        self.scores[side.index()]
    }

    /// Whether `side` may shoot right now
    pub fn awaiting(&self, side: Side) -> bool {
        self.can_shoot && self.phase == TurnPhase::AwaitingShot(side)
    }

    /// Put a shot in flight. Returns false if `side` may not shoot.
    pub fn begin_shot(&mut self, side: Side) -> bool {
        if !self.awaiting(side) {
            return false;
        }
        self.phase = TurnPhase::BodiesMoving;
        self.can_shoot = false;
        self.last_captured_side = None;
        true
    }

    /// Score one capture for the acting side
    pub fn record(&mut self, event: &CaptureEvent, tuning: &BoardTuning) -> CaptureOutcome {
        let outcome = CaptureOutcome::classify(event.kind, event.side);
        self.apply(event.side, outcome, tuning);
        outcome
    }

    fn apply(&mut self, side: Side, outcome: CaptureOutcome, tuning: &BoardTuning) {
        let score = &mut self.scores[side.index()];
        let delta = outcome.score_delta(tuning);
        *score = if delta >= 0 {
            score.saturating_add(delta as u32)
        } else {
            score.saturating_sub(delta.unsigned_abs() as u32)
        };

        if outcome.is_foul() {
            self.foul_count += 1;
        }
        self.last_captured_side = outcome.earns_extra_turn().then_some(side);
    }

    /// All bodies have stopped: hand the next shot to whoever earned it
    pub fn settle(&mut self) -> Side {
        let next = if self.last_captured_side == Some(self.current_side) {
            self.current_side
        } else {
            self.current_side.other()
        };

        if next != self.current_side {
            self.turn_number += 1;
        }
        self.current_side = next;
        self.phase = TurnPhase::AwaitingShot(next);
        self.can_shoot = true;
        self.last_captured_side = None;
        next
    }

    pub fn end_round(&mut self) {
        self.phase = TurnPhase::RoundOver;
        self.can_shoot = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn capture(kind: BodyKind, side: Side) -> CaptureEvent {
        CaptureEvent {
            body_id: 0,
            kind,
            pocket_id: 0,
            side,
        }
    }

    fn shot(state: &mut TurnState, captures: &[BodyKind]) -> Side {
        let side = state.current_side;
        assert!(state.begin_shot(side));
        let tuning = BoardTuning::default();
        for &kind in captures {
            state.record(&capture(kind, side), &tuning);
        }
        state.settle()
    }

    #[test]
    fn test_classify() {
        use CaptureOutcome::*;
        assert_eq!(CaptureOutcome::classify(BodyKind::Striker, Side::Player), StrikerFoul);
        assert_eq!(CaptureOutcome::classify(BodyKind::Queen, Side::Opponent), Queen);
        assert_eq!(CaptureOutcome::classify(BodyKind::White, Side::Player), OwnPiece);
        assert_eq!(CaptureOutcome::classify(BodyKind::White, Side::Opponent), WrongPiece);
        assert_eq!(CaptureOutcome::classify(BodyKind::Black, Side::Opponent), OwnPiece);
    }

    #[test]
    fn test_no_capture_passes_turn() {
        let mut state = TurnState::new();
        assert_eq!(shot(&mut state, &[]), Side::Opponent);
        assert_eq!(state.phase, TurnPhase::AwaitingShot(Side::Opponent));
        assert_eq!(state.turn_number, 2);
        assert_eq!(state.score(Side::Player), 0);
    }

    #[test]
    fn test_own_piece_keeps_turn() {
        let mut state = TurnState::new();
        assert_eq!(shot(&mut state, &[BodyKind::White]), Side::Player);
        assert_eq!(state.score(Side::Player), 10);
        assert_eq!(state.turn_number, 1);
    }

    #[test]
    fn test_queen_scores_for_acting_side() {
        let mut state = TurnState::new();
        shot(&mut state, &[]);
        assert_eq!(shot(&mut state, &[BodyKind::Queen]), Side::Opponent);
        assert_eq!(state.score(Side::Opponent), 50);
        assert_eq!(state.score(Side::Player), 0);
    }

    #[test]
    fn test_striker_foul_clamps_at_zero() {
        let mut state = TurnState::new();
        assert_eq!(shot(&mut state, &[BodyKind::Striker]), Side::Opponent);
        assert_eq!(state.score(Side::Player), 0);
        assert_eq!(state.foul_count, 1);
    }

    #[test]
    fn test_last_outcome_decides_continuation() {
        let mut state = TurnState::new();
        // Own piece then a foul: points kept, turn lost
        assert_eq!(shot(&mut state, &[BodyKind::White, BodyKind::Black]), Side::Opponent);
        assert_eq!(state.score(Side::Player), 5);

        // Foul then own piece: turn kept
        shot(&mut state, &[]);
        assert_eq!(shot(&mut state, &[BodyKind::Black, BodyKind::White]), Side::Player);
        assert_eq!(state.score(Side::Player), 10);
    }

    #[test]
    fn test_cannot_shoot_out_of_turn() {
        let mut state = TurnState::new();
        assert!(!state.begin_shot(Side::Opponent));
        assert!(state.begin_shot(Side::Player));
        assert!(!state.can_shoot);
        assert!(!state.begin_shot(Side::Player));
    }

    #[test]
    fn test_round_over_blocks_shots() {
        let mut state = TurnState::new();
        state.end_round();
        assert!(!state.begin_shot(Side::Player));
        assert_eq!(state.phase, TurnPhase::RoundOver);
    }

    fn kind_strategy() -> impl Strategy<Value = BodyKind> {
        prop_oneof![
            Just(BodyKind::White),
            Just(BodyKind::Black),
            Just(BodyKind::Queen),
            Just(BodyKind::Striker),
        ]
    }

    proptest! {
        #[test]
        fn prop_scores_match_clamped_model(
            shots in prop::collection::vec(prop::collection::vec(kind_strategy(), 0..4), 1..30)
        ) {
            let tuning = BoardTuning::default();
            let mut state = TurnState::new();
            let mut model = [0i64; 2];

            for captures in shots {
                let side = state.current_side;
                prop_assert!(state.begin_shot(side));
                for kind in captures {
                    let outcome = state.record(&capture(kind, side), &tuning);
                    let slot = &mut model[side.index()];
                    *slot = (*slot + outcome.score_delta(&tuning)).max(0);
                }
                state.settle();
                prop_assert!(state.can_shoot);
                prop_assert_eq!(state.score(Side::Player) as i64, model[0]);
                prop_assert_eq!(state.score(Side::Opponent) as i64, model[1]);
            }
        }
    }
}
