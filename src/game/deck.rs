use std::collections::HashSet;
use std::hash::Hash;

use rand::Rng;
use rand::seq::SliceRandom;

use super::card::Card;
use super::error::EngineError;

/// The shuffled grid of one session together with the identities its pair
/// keys refer to.
#[derive(Clone, Debug)]
pub struct Deck<A> {
    cards: Vec<Card>,
    faces: Vec<A>,
}

impl<A> Deck<A> {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn pair_count(&self) -> usize {
        self.faces.len()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub(crate) fn card_mut(&mut self, index: usize) -> Option<&mut Card> {
        self.cards.get_mut(index)
    }

    pub fn face(&self, pair_key: u32) -> Option<&A> {
        self.faces.get(pair_key as usize)
    }

    pub fn face_at(&self, index: usize) -> Option<&A> {
        self.card(index).and_then(|card| self.face(card.pair_key()))
    }

    pub fn remaining_pairs(&self) -> usize {
        let matched = self.cards.iter().filter(|card| card.is_matched()).count();
        (self.cards.len() - matched) / 2
    }
}

/// Builds shuffled decks from a pool of identities supplied by the asset
/// collaborator. The pool itself is never modified.
pub struct PairDeckBuilder<'a, A> {
    pool: &'a [A],
}

impl<'a, A: Clone + Eq + Hash> PairDeckBuilder<'a, A> {
    pub fn new(pool: &'a [A]) -> Self {
        PairDeckBuilder { pool }
    }

    fn distinct_identities(&self) -> Vec<A> {
        let mut seen = HashSet::with_capacity(self.pool.len());
        self.pool
            .iter()
            .filter(|identity| seen.insert(*identity))
            .cloned()
            .collect()
    }

    pub fn build_with<R: Rng + ?Sized>(
        &self,
        total_pairs: usize,
        rng: &mut R,
    ) -> Result<Deck<A>, EngineError> {
        let mut identities = self.distinct_identities();
        if identities.len() < total_pairs {
            return Err(EngineError::InsufficientAssets {
                required: total_pairs,
                available: identities.len(),
            });
        }

        identities.shuffle(rng);
        identities.truncate(total_pairs);

        let mut cards = Vec::with_capacity(total_pairs * 2);
        for pair_key in 0..total_pairs as u32 {
            cards.push(Card::new(pair_key));
            cards.push(Card::new(pair_key));
        }
        cards.shuffle(rng);

        Ok(Deck {
            cards,
            faces: identities,
        })
    }

    /// Same as [`Self::build_with`], drawing from the thread-local generator.
    pub fn build(&self, total_pairs: usize) -> Result<Deck<A>, EngineError> {
        let mut rng = rand::rng();
        self.build_with(total_pairs, &mut rng)
    }
}
