use std::hash::Hash;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use super::config::EngineConfig;
use super::deck::{Deck, PairDeckBuilder};
use super::error::EngineError;
use super::events::{EventHub, ListenerId, SessionEvent};
use super::matcher::{IgnoreReason, MatchEngine, PairOutcome, Reveal};
use super::score::score;
use super::state::SessionState;
use super::tier::{DifficultyProfile, Tier};

/// Handle for one scheduled resolution. The host waits `delay` and hands it
/// back to [`SessionController::resolve`]; tickets from a replaced session
/// or an already resolved pair are rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolutionTicket {
    generation: u64,
    sequence: u64,
    delay: Duration,
}

impl ResolutionTicket {
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    Ignored(IgnoreReason),
    Revealed,
    AwaitingResolution(ResolutionTicket),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Stale,
    Mismatched,
    Matched { pair_key: u32 },
    Completed { final_score: u32 },
}

/// What a score-persistence collaborator submits for a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SessionSummary {
    pub tier: Tier,
    pub final_score: u32,
    pub attempts: u32,
    pub elapsed_seconds: f64,
    pub total_pairs: usize,
}

struct Session<A> {
    tier: Tier,
    profile: DifficultyProfile,
    deck: Deck<A>,
    state: SessionState,
    engine: MatchEngine,
    paused: bool,
    pending: Option<ResolutionTicket>,
}

impl<A> Session<A> {
    fn clock_running(&self) -> bool {
        !self.paused && !self.state.is_completed()
    }

    /// Recomputes the score and returns it if it changed.
    fn refresh_score(&mut self) -> Option<u32> {
        let next = score(
            &self.profile,
            self.state.attempt_count,
            self.state.elapsed_seconds,
        );
        if next == self.state.current_score {
            return None;
        }
        self.state.current_score = next;
        Some(next)
    }
}

/// Owns one play-through at a time: its deck, counters, pending resolution
/// and event subscribers.
pub struct SessionController<A> {
    pool: Vec<A>,
    config: EngineConfig,
    rng: StdRng,
    generation: u64,
    next_sequence: u64,
    last_tier: Option<Tier>,
    session: Option<Session<A>>,
    events: EventHub,
}

impl<A: Clone + Eq + Hash> SessionController<A> {
    pub fn new(pool: Vec<A>, config: EngineConfig) -> Result<Self, EngineError> {
        let rng = StdRng::from_rng(&mut rand::rng());
        Self::with_rng(pool, config, rng)
    }

    pub fn with_seed(pool: Vec<A>, config: EngineConfig, seed: u64) -> Result<Self, EngineError> {
        Self::with_rng(pool, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(pool: Vec<A>, config: EngineConfig, rng: StdRng) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(SessionController {
            pool,
            config,
            rng,
            generation: 0,
            next_sequence: 0,
            last_tier: None,
            session: None,
            events: EventHub::default(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn start(&mut self, tier: Tier) -> Result<(), EngineError> {
        let profile = tier.profile();
        let deck = PairDeckBuilder::new(&self.pool).build_with(profile.total_pairs, &mut self.rng)?;

        self.teardown();
        self.generation = self.generation.wrapping_add(1);
        self.last_tier = Some(tier);
        self.session = Some(Session {
            tier,
            profile,
            deck,
            state: SessionState::new(profile.base_score),
            engine: MatchEngine::new(),
            paused: false,
            pending: None,
        });
        log::info!(
            "started {} session #{} ({} pairs)",
            tier.name(),
            self.generation,
            profile.total_pairs
        );

        self.events.emit(SessionEvent::TimerTick { elapsed_seconds: 0.0 });
        self.events.emit(SessionEvent::ScoreChanged {
            score: profile.base_score,
        });
        Ok(())
    }

    pub fn restart(&mut self) -> Result<(), EngineError> {
        let tier = self.last_tier.ok_or(EngineError::NoActiveSession)?;
        log::info!("restarting {} session", tier.name());
        self.start(tier)
    }

    /// Discards the running session, cancelling any pending resolution.
    pub fn stop(&mut self) {
        if self.teardown() {
            log::info!("session #{} torn down", self.generation);
        }
    }

    fn teardown(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                if session.pending.is_some() {
                    log::debug!("cancelled pending resolution of session #{}", self.generation);
                }
                true
            }
            None => false,
        }
    }

    pub fn pause(&mut self) -> bool {
        match self.session.as_mut() {
            Some(session) if session.clock_running() => {
                session.paused = true;
                log::debug!("session paused at {:.1}s", session.state.elapsed_seconds);
                true
            }
            _ => false,
        }
    }

    pub fn resume(&mut self) -> bool {
        match self.session.as_mut() {
            Some(session) if session.paused => {
                session.paused = false;
                log::debug!("session resumed");
                true
            }
            _ => false,
        }
    }

    pub fn attempt_reveal(&mut self, index: usize) -> Result<RevealOutcome, EngineError> {
        let session = self.session.as_mut().ok_or(EngineError::NoActiveSession)?;
        let len = session.deck.len();
        if index >= len {
            return Err(EngineError::UnknownCard { index, len });
        }
        if session.paused {
            log::debug!("ignored reveal of card {index}: paused");
            return Ok(RevealOutcome::Ignored(IgnoreReason::Paused));
        }

        let reveal = session
            .engine
            .attempt_reveal(&mut session.deck, &mut session.state, index)?;
        if let Reveal::Ignored(reason) = reveal {
            log::debug!("ignored reveal of card {index}: {reason:?}");
            return Ok(RevealOutcome::Ignored(reason));
        }

        log::debug!(
            "revealed card {index} (attempt {})",
            session.state.attempt_count
        );
        if let Some(score) = session.refresh_score() {
            self.events.emit(SessionEvent::ScoreChanged { score });
        }

        if reveal == Reveal::First {
            return Ok(RevealOutcome::Revealed);
        }
        self.next_sequence = self.next_sequence.wrapping_add(1);
        let ticket = ResolutionTicket {
            generation: self.generation,
            sequence: self.next_sequence,
            delay: self.config.resolution_delay(),
        };
        session.pending = Some(ticket);
        Ok(RevealOutcome::AwaitingResolution(ticket))
    }

    /// Applies a scheduled resolution once its delay has elapsed.
    pub fn resolve(&mut self, ticket: ResolutionTicket) -> Resolution {
        let Some(session) = self.session.as_mut() else {
            log::debug!("dropped resolution ticket: no session");
            return Resolution::Stale;
        };
        if ticket.generation != self.generation || session.pending != Some(ticket) {
            log::debug!("dropped stale resolution ticket {:?}", ticket);
            return Resolution::Stale;
        }
        session.pending = None;

        match session.engine.resolve(&mut session.deck, &mut session.state) {
            None => Resolution::Stale,
            Some(PairOutcome::Mismatched) => {
                log::debug!("pair mismatched");
                Resolution::Mismatched
            }
            Some(PairOutcome::Matched {
                pair_key,
                completed: false,
            }) => {
                log::debug!(
                    "pair {pair_key} matched ({}/{})",
                    session.state.matched_pair_count,
                    session.profile.total_pairs
                );
                Resolution::Matched { pair_key }
            }
            Some(PairOutcome::Matched { completed: true, .. }) => {
                let final_score = session.state.current_score;
                log::info!(
                    "{} session completed: score {} after {} attempts in {}",
                    session.tier.name(),
                    final_score,
                    session.state.attempt_count,
                    session.state.clock_label()
                );
                self.events.emit(SessionEvent::SessionCompleted { final_score });
                Resolution::Completed { final_score }
            }
        }
    }

    /// Resolves the pending pair right away, for hosts that keep their own
    /// notion of time.
    pub fn resolve_pending(&mut self) -> Resolution {
        match self.pending_resolution() {
            Some(ticket) => self.resolve(ticket),
            None => Resolution::Stale,
        }
    }

    /// Applies one elapsed-time tick of `delta_seconds`.
    pub fn tick(&mut self, delta_seconds: f64) -> Result<(), EngineError> {
        if !delta_seconds.is_finite() || delta_seconds < 0.0 {
            return Err(EngineError::InvalidTick(delta_seconds));
        }
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        if !session.clock_running() {
            return Ok(());
        }

        session.state.elapsed_seconds += delta_seconds;
        self.events.emit(SessionEvent::TimerTick {
            elapsed_seconds: session.state.elapsed_seconds,
        });
        if let Some(score) = session.refresh_score() {
            self.events.emit(SessionEvent::ScoreChanged { score });
        }
        Ok(())
    }

    pub fn deck(&self) -> Option<&Deck<A>> {
        self.session.as_ref().map(|session| &session.deck)
    }

    pub fn state(&self) -> Option<&SessionState> {
        self.session.as_ref().map(|session| &session.state)
    }

    pub fn tier(&self) -> Option<Tier> {
        self.session.as_ref().map(|session| session.tier)
    }

    pub fn profile(&self) -> Option<&DifficultyProfile> {
        self.session.as_ref().map(|session| &session.profile)
    }

    pub fn is_paused(&self) -> bool {
        self.session.as_ref().is_some_and(|session| session.paused)
    }

    /// Whether ticks delivered now would advance the elapsed time.
    pub fn is_clock_running(&self) -> bool {
        self.session.as_ref().is_some_and(Session::clock_running)
    }

    pub fn pending_resolution(&self) -> Option<ResolutionTicket> {
        self.session.as_ref().and_then(|session| session.pending)
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        let session = self.session.as_ref()?;
        if !session.state.is_completed() {
            return None;
        }
        Some(SessionSummary {
            tier: session.tier,
            final_score: session.state.current_score,
            attempts: session.state.attempt_count,
            elapsed_seconds: session.state.elapsed_seconds,
            total_pairs: session.profile.total_pairs,
        })
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&SessionEvent) + 'static) -> ListenerId {
        self.events.subscribe(listener)
    }

    pub fn on_score_changed(&mut self, mut listener: impl FnMut(u32) + 'static) -> ListenerId {
        self.events.subscribe(move |event| {
            if let SessionEvent::ScoreChanged { score } = event {
                listener(*score);
            }
        })
    }

    pub fn on_timer_tick(&mut self, mut listener: impl FnMut(f64) + 'static) -> ListenerId {
        self.events.subscribe(move |event| {
            if let SessionEvent::TimerTick { elapsed_seconds } = event {
                listener(*elapsed_seconds);
            }
        })
    }

    pub fn on_session_completed(&mut self, mut listener: impl FnMut(u32) + 'static) -> ListenerId {
        self.events.subscribe(move |event| {
            if let SessionEvent::SessionCompleted { final_score } = event {
                listener(*final_score);
            }
        })
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }
}
