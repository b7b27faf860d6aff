use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use pairmatch::{
    Deck, EngineConfig, EngineError, RevealOutcome, SessionController, SessionSummary, Tier,
};

const SYMBOLS: [&str; 30] = [
    "🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼", "🐨", "🐯", "🦁", "🐮", "🐷", "🐸", "🐵",
    "🍏", "🍎", "🍐", "🍊", "🍋", "🍌", "🍉", "🍇", "🍓", "⚽", "🏀", "🏈", "⚾", "🎾", "🎲",
];

/// Seconds the bot "thinks" before each reveal in virtual time.
const THINK_SECONDS: f64 = 0.8;

#[derive(Parser, Debug)]
#[command(name = "pairmatch", about = "Plays one pair-matching session headlessly")]
struct Args {
    /// easy, medium, hard or a menu index 0-2
    #[arg(long)]
    tier: Option<String>,
    #[arg(long)]
    seed: Option<u64>,
    /// JSON engine configuration
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
    /// Play on a glib main loop with real delays
    #[cfg(feature = "glib")]
    #[arg(long)]
    realtime: bool,
}

/// Remembers every card it has seen face up and never forgets.
#[derive(Default)]
struct MemoryBot {
    seen: HashMap<u32, Vec<usize>>,
    seen_cards: HashSet<usize>,
}

impl MemoryBot {
    fn observe<A>(&mut self, deck: &Deck<A>) {
        for (idx, card) in deck.cards().iter().enumerate() {
            if card.is_face_up() && self.seen_cards.insert(idx) {
                self.seen.entry(card.pair_key()).or_default().push(idx);
            }
        }
    }

    fn next_pick<A>(&self, deck: &Deck<A>) -> Option<usize> {
        let cards = deck.cards();
        let open = cards
            .iter()
            .position(|card| card.is_face_up() && !card.is_matched());
        let unseen = |skip: Option<usize>| {
            (0..cards.len()).find(|idx| {
                Some(*idx) != skip && !self.seen_cards.contains(idx) && !cards[*idx].is_face_up()
            })
        };

        match open {
            Some(first) => {
                let key = cards[first].pair_key();
                self.seen
                    .get(&key)
                    .and_then(|spots| spots.iter().copied().find(|&idx| idx != first))
                    .or_else(|| unseen(Some(first)))
            }
            None => self
                .seen
                .values()
                .find(|spots| spots.len() == 2 && !cards[spots[0]].is_matched())
                .map(|spots| spots[0])
                .or_else(|| unseen(None)),
        }
    }
}

/// Plays until the board is cleared. `None` when the bot runs out of picks.
fn play_virtual(
    ctl: &mut SessionController<&'static str>,
) -> Result<Option<SessionSummary>, EngineError> {
    let mut bot = MemoryBot::default();
    loop {
        if let Some(summary) = ctl.summary() {
            return Ok(Some(summary));
        }
        let deck = ctl.deck().ok_or(EngineError::NoActiveSession)?;
        let Some(pick) = bot.next_pick(deck) else {
            log::error!("bot has no card left to reveal");
            return Ok(None);
        };

        ctl.tick(THINK_SECONDS)?;
        let outcome = ctl.attempt_reveal(pick)?;
        if let Some(deck) = ctl.deck() {
            bot.observe(deck);
        }
        match outcome {
            RevealOutcome::AwaitingResolution(ticket) => {
                ctl.tick(ticket.delay().as_secs_f64())?;
                ctl.resolve(ticket);
            }
            RevealOutcome::Revealed => {}
            RevealOutcome::Ignored(reason) => log::warn!("bot pick {pick} ignored: {reason:?}"),
        }
    }
}

#[cfg(feature = "glib")]
fn play_realtime(
    ctl: SessionController<&'static str>,
    tier: Tier,
) -> Result<Option<SessionSummary>, EngineError> {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use pairmatch::driver::GlibSession;

    let main_loop = glib::MainLoop::new(None, false);
    let session = Rc::new(GlibSession::new(ctl));
    session.start(tier)?;

    let summary = Rc::new(RefCell::new(None));
    let bot = Rc::new(RefCell::new(MemoryBot::default()));
    {
        let session = Rc::clone(&session);
        let summary = Rc::clone(&summary);
        let main_loop = main_loop.clone();
        glib::timeout_add_local(Duration::from_millis(400), move || {
            let ctl = session.controller();
            if let Some(done) = ctl.borrow().summary() {
                *summary.borrow_mut() = Some(done);
                main_loop.quit();
                return glib::ControlFlow::Break;
            }
            let pick = ctl.borrow().deck().and_then(|deck| bot.borrow().next_pick(deck));
            let Some(pick) = pick else {
                log::error!("bot has no card left to reveal");
                main_loop.quit();
                return glib::ControlFlow::Break;
            };
            if let Err(err) = session.click(pick) {
                log::error!("click on {pick} failed: {err}");
            }
            if let Some(deck) = ctl.borrow().deck() {
                bot.borrow_mut().observe(deck);
            }
            glib::ControlFlow::Continue
        });
    }
    main_loop.run();

    let summary = summary.borrow_mut().take();
    Ok(summary)
}

fn main() -> Result<(), EngineError> {
    let args = Args::parse();
    pairmatch::logging::init(args.log_level).expect("initialize logger");

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let tier = Tier::or_default(args.tier.as_deref())?;
    let pool = SYMBOLS.to_vec();
    let mut ctl = match args.seed {
        Some(seed) => SessionController::with_seed(pool, config, seed)?,
        None => SessionController::new(pool, config)?,
    };
    ctl.on_session_completed(|final_score| log::info!("final score {final_score}"));

    #[cfg(feature = "glib")]
    if args.realtime {
        let summary = play_realtime(ctl, tier)?;
        return print_summary(summary);
    }

    ctl.start(tier)?;
    let summary = play_virtual(&mut ctl)?;
    print_summary(summary)
}

fn print_summary(summary: Option<SessionSummary>) -> Result<(), EngineError> {
    match summary {
        Some(summary) => println!("{}", serde_json::to_string_pretty(&summary)?),
        None => log::warn!("session ended without a completed board"),
    }
    Ok(())
}
