use serde::Serialize;

use super::deck::Deck;
use super::error::EngineError;
use super::state::{Phase, SessionState};

/// Why a reveal attempt was dropped without touching the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    Resolving,
    AlreadyFaceUp,
    AlreadyMatched,
    Paused,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reveal {
    Ignored(IgnoreReason),
    First,
    Second,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairOutcome {
    Matched { pair_key: u32, completed: bool },
    Mismatched,
}

/// Turn state machine: at most two unmatched cards are face up at once,
/// and a pair is only judged once the resolving window has elapsed.
#[derive(Clone, Debug, Default)]
pub struct MatchEngine {
    first_revealed: Option<usize>,
    second_revealed: Option<usize>,
}

impl MatchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revealed(&self) -> (Option<usize>, Option<usize>) {
        (self.first_revealed, self.second_revealed)
    }

    pub fn attempt_reveal<A>(
        &mut self,
        deck: &mut Deck<A>,
        state: &mut SessionState,
        index: usize,
    ) -> Result<Reveal, EngineError> {
        let len = deck.len();
        let card = deck
            .card_mut(index)
            .ok_or(EngineError::UnknownCard { index, len })?;

        let reveal = match state.phase {
            Phase::Completed => return Ok(Reveal::Ignored(IgnoreReason::Completed)),
            Phase::Resolving => return Ok(Reveal::Ignored(IgnoreReason::Resolving)),
            Phase::Idle => Reveal::First,
            Phase::AwaitingSecondReveal => Reveal::Second,
        };
        if card.is_matched() {
            return Ok(Reveal::Ignored(IgnoreReason::AlreadyMatched));
        }
        if card.is_face_up() {
            return Ok(Reveal::Ignored(IgnoreReason::AlreadyFaceUp));
        }

        card.reveal();
        state.attempt_count = state.attempt_count.saturating_add(1);

        if reveal == Reveal::First {
            self.first_revealed = Some(index);
            state.phase = Phase::AwaitingSecondReveal;
        } else {
            self.second_revealed = Some(index);
            state.phase = Phase::Resolving;
        }
        Ok(reveal)
    }

    /// Judges the pending pair. Returns `None` when nothing is resolving.
    pub fn resolve<A>(&mut self, deck: &mut Deck<A>, state: &mut SessionState) -> Option<PairOutcome> {
        if state.phase != Phase::Resolving {
            return None;
        }
        let first = self.first_revealed.take();
        let second = self.second_revealed.take();
        let (Some(first), Some(second)) = (first, second) else {
            log::debug!("resolving window closed without two revealed cards");
            state.phase = Phase::Idle;
            return None;
        };

        let Some((first_key, same_pair)) = deck
            .card(first)
            .zip(deck.card(second))
            .map(|(a, b)| (a.pair_key(), a.same_pair(b)))
        else {
            state.phase = Phase::Idle;
            return None;
        };

        if same_pair {
            for idx in [first, second] {
                if let Some(card) = deck.card_mut(idx) {
                    card.set_matched();
                }
            }
            state.matched_pair_count += 1;
            let completed = state.matched_pair_count >= deck.pair_count();
            state.phase = if completed { Phase::Completed } else { Phase::Idle };
            Some(PairOutcome::Matched {
                pair_key: first_key,
                completed,
            })
        } else {
            for idx in [first, second] {
                if let Some(card) = deck.card_mut(idx) {
                    card.hide();
                }
            }
            state.phase = Phase::Idle;
            Some(PairOutcome::Mismatched)
        }
    }
}
