pub mod card;
pub mod config;
pub mod deck;
pub mod error;
pub mod events;
pub mod matcher;
pub mod score;
pub mod session;
pub mod state;
pub mod tier;

pub use card::{Card, CardStatus};
pub use config::EngineConfig;
pub use deck::{Deck, PairDeckBuilder};
pub use error::EngineError;
pub use events::{EventHub, ListenerId, SessionEvent};
pub use matcher::{IgnoreReason, MatchEngine, PairOutcome, Reveal};
pub use score::score;
pub use session::{Resolution, ResolutionTicket, RevealOutcome, SessionController, SessionSummary};
pub use state::{Phase, SessionState, format_clock};
pub use tier::{ALL_TIERS, DifficultyProfile, Tier};
