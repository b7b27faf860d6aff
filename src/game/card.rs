use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    #[default]
    Hidden,
    Flipped,
    Matched,
}

/// One face-down card of the grid. Cards sharing a `pair_key` form a pair.
///
/// Every transition is a no-op when its precondition does not hold, and a
/// matched card never changes again.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Card {
    pair_key: u32,
    status: CardStatus,
}

impl Card {
    pub fn new(pair_key: u32) -> Self {
        Card {
            pair_key,
            status: CardStatus::Hidden,
        }
    }

    pub fn pair_key(&self) -> u32 {
        self.pair_key
    }

    pub fn status(&self) -> CardStatus {
        self.status
    }

    pub fn is_face_up(&self) -> bool {
        self.status != CardStatus::Hidden
    }

    pub fn is_matched(&self) -> bool {
        self.status == CardStatus::Matched
    }

    pub fn reveal(&mut self) {
        if self.status == CardStatus::Hidden {
            self.status = CardStatus::Flipped;
        }
    }

    pub fn hide(&mut self) {
        if self.status == CardStatus::Flipped {
            self.status = CardStatus::Hidden;
        }
    }

    pub fn set_matched(&mut self) {
        self.status = CardStatus::Matched;
    }

    pub fn same_pair(&self, other: &Card) -> bool {
        self.pair_key == other.pair_key
    }
}
