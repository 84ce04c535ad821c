//! Memory match
//!
//! Not a physics loop: a shuffled deck, two flips per move, and a short delay
//! before a flipped pair is either removed or turned back over.

use glam::Vec2;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::schedule::Delay;
use super::session::Session;
use crate::tuning::MemoryTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub pair_id: u32,
    pub face_up: bool,
    pub matched: bool,
}

/// What a card selection did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flip {
    /// Selection not allowed right now
    Ignored,
    /// First card of a move turned over
    First,
    /// Second card turned over; resolves after the delay
    Second { matched: bool },
}

/// Memory round state
#[derive(Debug, Clone)]
pub struct MemoryGame {
    tuning: MemoryTuning,
    pub pairs: u32,
    pub cards: Vec<Card>,
    flipped: Vec<usize>,
    resolve: Delay,
    pub matches: u32,
    pub moves: u32,
}

impl MemoryGame {
    pub fn new(pairs: u32, tuning: MemoryTuning, seed: u64) -> Self {
        let mut cards: Vec<Card> = (0..pairs)
            .flat_map(|pair_id| {
                let card = Card {
                    pair_id,
                    face_up: false,
                    matched: false,
                };
                [card, card]
            })
            .collect();
        cards.shuffle(&mut Pcg32::seed_from_u64(seed));

        Self {
            tuning,
            pairs,
            cards,
            flipped: Vec::with_capacity(2),
            resolve: Delay::Idle,
            matches: 0,
            moves: 0,
        }
    }

    /// Columns of the near-square grid the cards are dealt into
    pub fn columns(&self) -> usize {
        ((self.cards.len() as f64).sqrt().ceil() as usize).max(1)
    }

    pub fn rows(&self) -> usize {
        self.cards.len().div_ceil(self.columns())
    }

    /// Card under a point in grid units (one unit per card). Points on the far
    /// edges belong to the last column and row.
    pub fn card_at(&self, cell: Vec2) -> Option<usize> {
        if self.cards.is_empty() || !(cell.x >= 0.0 && cell.y >= 0.0) {
            return None;
        }
        let cols = self.columns();
        let col = (cell.x as usize).min(cols - 1);
        let row = (cell.y as usize).min(self.rows() - 1);
        let index = row * cols + col;
        (index < self.cards.len()).then_some(index)
    }

    /// Turn a card over
    pub fn select(&mut self, index: usize) -> Flip {
        if self.flipped.len() >= 2 {
            return Flip::Ignored;
        }
        match self.cards.get(index) {
            Some(card) if !card.face_up && !card.matched => {}
            _ => return Flip::Ignored,
        }

        self.cards[index].face_up = true;
        self.flipped.push(index);
        if self.flipped.len() == 1 {
            return Flip::First;
        }

        self.moves += 1;
        let (a, b) = (self.flipped[0], self.flipped[1]);
        let matched = self.cards[a].pair_id == self.cards[b].pair_id;
        self.resolve.schedule(if matched {
            self.tuning.match_delay_ms
        } else {
            self.tuning.mismatch_delay_ms
        });
        Flip::Second { matched }
    }

    /// Advance one tick; ends the round when the last pair resolves
    pub fn tick(&mut self, session: &mut Session) {
        if !session.is_running() || !self.resolve.advance(self.tuning.tick_ms) {
            return;
        }

        let (a, b) = (self.flipped[0], self.flipped[1]);
        if self.cards[a].pair_id == self.cards[b].pair_id {
            self.cards[a].matched = true;
            self.cards[b].matched = true;
            self.matches += 1;
        } else {
            self.cards[a].face_up = false;
            self.cards[b].face_up = false;
        }
        self.flipped.clear();

        if self.matches == self.pairs {
            let score = self.score_for(session.time_fraction());
            session.finish(true, score, stars_for(score));
        }
    }

    /// Final score given the fraction of round time left
    pub fn score_for(&self, time_fraction: f64) -> u32 {
        let time_bonus = (time_fraction * 300.0).floor() as i64;
        let penalty = ((self.moves as i64 - self.pairs as i64 * 2) * 10).max(0);
        (500 + time_bonus - penalty).max(100) as u32
    }

    /// Round clock ran out
    pub fn expire(&mut self, session: &mut Session) {
        self.resolve.cancel();
        session.finish(false, 0, 0);
    }
}

pub fn stars_for(score: u32) -> u8 {
    if score >= 800 {
        3
    } else if score >= 600 {
        2
    } else if score >= 300 {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(limit: u32) -> Session {
        let mut session = Session::new(Some(limit), 2000.0);
        session.start();
        session
    }

    /// Indices of both cards of a pair
    fn pair_indices(game: &MemoryGame, pair_id: u32) -> (usize, usize) {
        let found: Vec<usize> = game
            .cards
            .iter()
            .enumerate()
            .filter(|(_, c)| c.pair_id == pair_id)
            .map(|(i, _)| i)
            .collect();
        (found[0], found[1])
    }

    fn ticks(game: &mut MemoryGame, session: &mut Session, n: usize) {
        for _ in 0..n {
            game.tick(session);
        }
    }

    #[test]
    fn test_deck_has_every_pair_twice() {
        let game = MemoryGame::new(6, MemoryTuning::default(), 3);
        assert_eq!(game.cards.len(), 12);
        for pair in 0..6 {
            assert_eq!(game.cards.iter().filter(|c| c.pair_id == pair).count(), 2);
        }
    }

    #[test]
    fn test_match_resolves_after_delay() {
        let mut game = MemoryGame::new(2, MemoryTuning::default(), 3);
        let mut session = running(60);
        let (a, b) = pair_indices(&game, 0);

        assert_eq!(game.select(a), Flip::First);
        assert_eq!(game.select(a), Flip::Ignored);
        assert_eq!(game.select(b), Flip::Second { matched: true });

        ticks(&mut game, &mut session, 9);
        assert_eq!(game.matches, 0);
        ticks(&mut game, &mut session, 1);
        assert_eq!(game.matches, 1);
        assert!(game.cards[a].matched);
    }

    #[test]
    fn test_mismatch_flips_back() {
        let mut game = MemoryGame::new(2, MemoryTuning::default(), 3);
        let mut session = running(60);
        let (a, _) = pair_indices(&game, 0);
        let (c, _) = pair_indices(&game, 1);

        game.select(a);
        assert_eq!(game.select(c), Flip::Second { matched: false });
        // Third card blocked while the pair is showing
        let (_, d) = pair_indices(&game, 1);
        assert_eq!(game.select(d), Flip::Ignored);

        ticks(&mut game, &mut session, 20);
        assert!(!game.cards[a].face_up);
        assert!(!game.cards[c].face_up);
        assert_eq!(game.moves, 1);
    }

    #[test]
    fn test_perfect_game_score() {
        let mut game = MemoryGame::new(2, MemoryTuning::default(), 3);
        let mut session = running(60);

        for pair in 0..2 {
            let (a, b) = pair_indices(&game, pair);
            game.select(a);
            game.select(b);
            ticks(&mut game, &mut session, 10);
        }

        let outcome = session.outcome().unwrap();
        assert!(outcome.won);
        // Full time left: 500 + 300
        assert_eq!(outcome.score, 800);
        assert_eq!(outcome.stars, 3);
    }

    #[test]
    fn test_score_formula() {
        let mut game = MemoryGame::new(6, MemoryTuning::default(), 3);
        game.moves = 20;
        // 500 + 150 - (20 - 12) * 10
        assert_eq!(game.score_for(0.5), 570);
        game.moves = 200;
        assert_eq!(game.score_for(0.0), 100);
    }

    #[test]
    fn test_card_at_clamps_far_edges() {
        // 12 cards deal into 4 columns by 3 rows
        let game = MemoryGame::new(6, MemoryTuning::default(), 3);
        assert_eq!((game.columns(), game.rows()), (4, 3));
        assert_eq!(game.card_at(Vec2::new(1.5, 1.5)), Some(5));
        // Right and bottom edges stay on the last column and row
        assert_eq!(game.card_at(Vec2::new(4.0, 0.5)), Some(3));
        assert_eq!(game.card_at(Vec2::new(0.5, 3.0)), Some(8));
        assert_eq!(game.card_at(Vec2::new(-0.5, 0.5)), None);

        // 10 cards leave the last row short
        let game = MemoryGame::new(5, MemoryTuning::default(), 3);
        assert_eq!(game.card_at(Vec2::new(3.5, 2.5)), None);
        assert_eq!(game.card_at(Vec2::new(1.5, 2.5)), Some(9));
    }

    #[test]
    fn test_timeout_reports_zero() {
        let mut game = MemoryGame::new(3, MemoryTuning::default(), 3);
        let mut session = running(60);
        game.expire(&mut session);
        let outcome = session.outcome().unwrap();
        assert_eq!((outcome.score, outcome.stars, outcome.won), (0, 0, false));
    }
}
