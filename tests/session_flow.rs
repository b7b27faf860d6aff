//! Full play-throughs driven through the public controller API.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use pairmatch::{
    EngineConfig, IgnoreReason, Phase, Resolution, RevealOutcome, SessionController,
    SessionEvent, Tier,
};

fn controller(seed: u64) -> SessionController<String> {
    let pool = (0..40).map(|i| format!("asset-{i}")).collect();
    SessionController::with_seed(pool, EngineConfig::default(), seed).unwrap()
}

fn pairs_by_key(ctl: &SessionController<String>) -> HashMap<u32, Vec<usize>> {
    let mut pairs: HashMap<u32, Vec<usize>> = HashMap::new();
    for (idx, card) in ctl.deck().unwrap().cards().iter().enumerate() {
        pairs.entry(card.pair_key()).or_default().push(idx);
    }
    pairs
}

/// Two face-down cards from different pairs.
fn mismatched_pair(ctl: &SessionController<String>) -> (usize, usize) {
    let deck = ctl.deck().unwrap();
    let hidden: Vec<usize> = (0..deck.len())
        .filter(|&idx| !deck.card(idx).unwrap().is_face_up())
        .collect();
    let first = hidden[0];
    let key = deck.card(first).unwrap().pair_key();
    let other = hidden
        .iter()
        .copied()
        .find(|&idx| deck.card(idx).unwrap().pair_key() != key)
        .unwrap();
    (first, other)
}

fn record_events(ctl: &mut SessionController<String>) -> Rc<RefCell<Vec<SessionEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    ctl.subscribe(move |event| sink.borrow_mut().push(*event));
    events
}

#[test]
fn mismatch_on_easy_flips_both_cards_back() {
    let mut ctl = controller(1);
    ctl.start(Tier::Easy).unwrap();
    let (a, b) = mismatched_pair(&ctl);

    assert_eq!(ctl.attempt_reveal(a).unwrap(), RevealOutcome::Revealed);
    assert!(matches!(
        ctl.attempt_reveal(b).unwrap(),
        RevealOutcome::AwaitingResolution(_)
    ));
    assert_eq!(ctl.resolve_pending(), Resolution::Mismatched);

    let deck = ctl.deck().unwrap();
    for idx in [a, b] {
        let card = deck.card(idx).unwrap();
        assert!(!card.is_face_up());
        assert!(!card.is_matched());
    }
    let state = ctl.state().unwrap();
    assert_eq!(state.attempt_count, 2);
    assert_eq!(state.phase, Phase::Idle);
}

#[test]
fn resolving_window_freezes_counters_and_cards() {
    let mut ctl = controller(2);
    ctl.start(Tier::Medium).unwrap();
    let (a, b) = mismatched_pair(&ctl);
    ctl.attempt_reveal(a).unwrap();
    ctl.attempt_reveal(b).unwrap();

    for idx in 0..16 {
        let before = ctl.deck().unwrap().card(idx).unwrap().is_face_up();
        assert_eq!(
            ctl.attempt_reveal(idx).unwrap(),
            RevealOutcome::Ignored(IgnoreReason::Resolving)
        );
        assert_eq!(ctl.deck().unwrap().card(idx).unwrap().is_face_up(), before);
    }
    assert_eq!(ctl.state().unwrap().attempt_count, 2);
}

#[test]
fn clearing_the_board_completes_once_with_the_frozen_score() {
    let mut ctl = controller(3);
    let events = record_events(&mut ctl);
    let completions = Rc::new(RefCell::new(Vec::new()));
    let sink = completions.clone();
    ctl.on_session_completed(move |score| sink.borrow_mut().push(score));

    ctl.start(Tier::Easy).unwrap();
    let pairs = pairs_by_key(&ctl);
    let mut keys: Vec<u32> = pairs.keys().copied().collect();
    keys.sort();

    let mut last = Resolution::Stale;
    for key in &keys {
        ctl.tick(1.0).unwrap();
        let spots = &pairs[key];
        ctl.attempt_reveal(spots[0]).unwrap();
        ctl.attempt_reveal(spots[1]).unwrap();
        ctl.tick(1.0).unwrap();
        last = ctl.resolve_pending();
    }

    // 8 attempts and 8 seconds on Easy: 1000 - 40 - 8
    assert_eq!(last, Resolution::Completed { final_score: 952 });
    assert_eq!(*completions.borrow(), vec![952]);

    let state = *ctl.state().unwrap();
    assert_eq!(state.phase, Phase::Completed);
    assert_eq!(state.matched_pair_count, 4);
    assert!(ctl.deck().unwrap().cards().iter().all(|card| card.is_matched()));

    ctl.tick(30.0).unwrap();
    assert_eq!(
        ctl.attempt_reveal(0).unwrap(),
        RevealOutcome::Ignored(IgnoreReason::Completed)
    );
    let after = ctl.state().unwrap();
    assert_eq!(after.current_score, 952);
    assert_eq!(after.elapsed_seconds, 8.0);

    let completed_events = events
        .borrow()
        .iter()
        .filter(|event| matches!(event, SessionEvent::SessionCompleted { .. }))
        .count();
    assert_eq!(completed_events, 1);

    let summary = ctl.summary().unwrap();
    assert_eq!(summary.final_score, 952);
    assert_eq!(summary.attempts, 8);
    assert_eq!(summary.total_pairs, 4);
    let json = serde_json::to_value(summary).unwrap();
    assert_eq!(json["tier"], "easy");
    assert_eq!(json["final_score"], 952);
}

#[test]
fn restart_resets_everything_and_reshuffles() {
    let mut ctl = controller(4);
    ctl.start(Tier::Hard).unwrap();
    let first_layout: Vec<u32> = ctl
        .deck()
        .unwrap()
        .cards()
        .iter()
        .map(|card| card.pair_key())
        .collect();
    let first_faces: Vec<String> = (0..24)
        .map(|idx| ctl.deck().unwrap().face_at(idx).unwrap().clone())
        .collect();

    let pairs = pairs_by_key(&ctl);
    let spots = &pairs[&0];
    ctl.attempt_reveal(spots[0]).unwrap();
    ctl.attempt_reveal(spots[1]).unwrap();
    ctl.resolve_pending();
    ctl.tick(12.5).unwrap();
    let (a, b) = mismatched_pair(&ctl);
    ctl.attempt_reveal(a).unwrap();
    ctl.attempt_reveal(b).unwrap();

    ctl.restart().unwrap();
    let state = *ctl.state().unwrap();
    assert_eq!(state.attempt_count, 0);
    assert_eq!(state.elapsed_seconds, 0.0);
    assert_eq!(state.matched_pair_count, 0);
    assert_eq!(state.current_score, 3000);
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(ctl.pending_resolution(), None);
    assert_eq!(ctl.tier(), Some(Tier::Hard));

    let deck = ctl.deck().unwrap();
    assert_eq!(deck.len(), 24);
    assert!(deck.cards().iter().all(|card| !card.is_face_up()));
    let second_layout: Vec<u32> = deck.cards().iter().map(|card| card.pair_key()).collect();
    let second_faces: Vec<String> = (0..24).map(|idx| deck.face_at(idx).unwrap().clone()).collect();
    assert!(first_layout != second_layout || first_faces != second_faces);
}

#[test]
fn score_follows_attempts_and_ticks() {
    let mut ctl = controller(5);
    let scores = Rc::new(RefCell::new(Vec::new()));
    let ticks = Rc::new(RefCell::new(Vec::new()));
    {
        let scores = scores.clone();
        ctl.on_score_changed(move |score| scores.borrow_mut().push(score));
        let ticks = ticks.clone();
        ctl.on_timer_tick(move |elapsed| ticks.borrow_mut().push(elapsed));
    }

    ctl.start(Tier::Easy).unwrap();
    let (a, b) = mismatched_pair(&ctl);
    ctl.attempt_reveal(a).unwrap();
    ctl.attempt_reveal(b).unwrap();
    ctl.resolve_pending();
    let third = (0..8).find(|&idx| idx != a && idx != b).unwrap();
    ctl.attempt_reveal(third).unwrap();
    for _ in 0..4 {
        ctl.tick(2.5).unwrap();
    }

    assert_eq!(ctl.state().unwrap().current_score, 975);
    assert_eq!(*scores.borrow(), vec![1000, 995, 990, 985, 982, 980, 978, 975]);
    assert_eq!(*ticks.borrow(), vec![0.0, 2.5, 5.0, 7.5, 10.0]);
}

#[test]
fn scores_never_go_negative() {
    let mut ctl = controller(6);
    ctl.start(Tier::Easy).unwrap();
    ctl.tick(5000.0).unwrap();
    assert_eq!(ctl.state().unwrap().current_score, 0);
    ctl.attempt_reveal(0).unwrap();
    assert_eq!(ctl.state().unwrap().current_score, 0);
}

#[test]
fn unsubscribed_listener_misses_later_sessions() {
    let mut ctl = controller(7);
    let count = Rc::new(RefCell::new(0));
    let counter = count.clone();
    let id = ctl.on_score_changed(move |_| *counter.borrow_mut() += 1);
    ctl.start(Tier::Easy).unwrap();
    assert!(ctl.unsubscribe(id));
    ctl.restart().unwrap();
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn unknown_tier_does_not_start_a_session() {
    let mut ctl = controller(8);
    let result = "expert".parse::<Tier>().and_then(|tier| ctl.start(tier));
    assert!(result.is_err());
    assert!(ctl.state().is_none());
}
