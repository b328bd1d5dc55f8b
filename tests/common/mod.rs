//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::sync::Once;

use kabo_engine::{Card, Command, Deck, GameSession, ManualClock, Phase, Rank, SeatId, SessionConfig, Suit};
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Install a test subscriber once. Level comes from `TEST_LOG`, then
/// `RUST_LOG`, then `warn`.
pub fn init_logging() {
    INIT.call_once(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

/// Zero-based seat.
pub fn seat(index: u8) -> SeatId {
    SeatId::new(index)
}

/// Parse a short card name such as `"10H"`, `"QS"` or `"AC"`.
pub fn card(name: &str) -> Card {
    let (rank, suit) = name.split_at(name.len() - 1);
    let rank = Rank::ALL
        .into_iter()
        .find(|r| r.label() == rank)
        .unwrap_or_else(|| panic!("bad rank in {name}"));
    let suit = match suit {
        "S" => Suit::Spades,
        "H" => Suit::Hearts,
        "D" => Suit::Diamonds,
        "C" => Suit::Clubs,
        _ => panic!("bad suit in {name}"),
    };
    Card::new(rank, suit)
}

pub fn cards(names: &[&str]) -> Vec<Card> {
    names.iter().map(|n| card(n)).collect()
}

/// Deck that deals `hands` (indexed by turn-order position) and then yields
/// `next` from the head, followed by every unused card in standard order.
pub fn stacked_deck(hands: [&[&str]; 4], next: &[&str]) -> Deck {
    let hand_size = hands[0].len();
    let mut order = Vec::with_capacity(52);
    for slot in 0..hand_size {
        for hand in &hands {
            order.push(card(hand[slot]));
        }
    }
    order.extend(next.iter().map(|n| card(n)));
    for &c in Deck::standard().cards() {
        if !order.contains(&c) {
            order.push(c);
        }
    }
    assert_eq!(order.len(), 52, "stacked deck repeats a card");
    Deck::from_cards(order)
}

pub fn stacked_session(hands: [&[&str]; 4], next: &[&str]) -> GameSession<ManualClock> {
    stacked_session_with(SessionConfig::default(), hands, next)
}

pub fn stacked_session_with(
    config: SessionConfig,
    hands: [&[&str]; 4],
    next: &[&str],
) -> GameSession<ManualClock> {
    init_logging();
    GameSession::from_deck(config, stacked_deck(hands, next), ManualClock::new()).unwrap()
}

/// Fire the deadline of the open window.
pub fn expire(session: &mut GameSession<ManualClock>) {
    let generation = session.active_window().expect("no open window").generation;
    session.apply(Command::Expire { generation }).unwrap();
}

/// Deal and let every peek window time out.
pub fn skip_peek(session: &mut GameSession<ManualClock>) {
    session.deal_all().unwrap();
    while session.phase() == Phase::Peek {
        expire(session);
    }
}

/// Let every open power and respond window time out.
pub fn pass_windows(session: &mut GameSession<ManualClock>) {
    while matches!(session.phase(), Phase::Look | Phase::Joker | Phase::Respond) {
        expire(session);
    }
}

/// Draw from the deck, discard it, and let the windows lapse.
pub fn plain_turn(session: &mut GameSession<ManualClock>) {
    session.draw_from_deck().unwrap();
    session.resolve_by_discard().unwrap();
    pass_windows(session);
}

/// Hands with no powers and no shared ranks with the low hearts.
pub const SPADES: &[&str] = &["5S", "8S", "9S", "10S"];
pub const HEARTS: &[&str] = &["AH", "2H", "3H", "4H"];
pub const DIAMONDS: &[&str] = &["AD", "2D", "3D", "4D"];
pub const CLUBS: &[&str] = &["AC", "2C", "3C", "4C"];
