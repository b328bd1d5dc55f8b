use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kabo_engine::{Command, GameSession, ManualClock, Phase, SessionConfig};

fn expire(session: &mut GameSession<ManualClock>) {
    if let Some(window) = session.active_window() {
        let _ = session.apply(Command::Expire { generation: window.generation });
    }
}

/// Deal, skip every window, and discard from the deck until it runs dry.
fn scripted_game(seed: u64) -> GameSession<ManualClock> {
    let mut session =
        GameSession::with_clock(SessionConfig::default(), Some(seed), ManualClock::new()).unwrap();
    session.deal_all().unwrap();
    while session.phase() == Phase::Peek {
        expire(&mut session);
    }
    while session.draw_from_deck().is_ok() {
        session.resolve_by_discard().unwrap();
        while matches!(session.phase(), Phase::Look | Phase::Joker | Phase::Respond) {
            expire(&mut session);
        }
    }
    session
}

fn playing_scripted_game(c: &mut Criterion) {
    c.bench_function("play a scripted game to an empty deck", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed += 1;
            black_box(scripted_game(seed))
        })
    });
}

fn encoding_snapshot(c: &mut Criterion) {
    let session = scripted_game(42);
    c.bench_function("snapshot and encode a finished table", |b| {
        b.iter(|| black_box(session.snapshot().encode().unwrap()))
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .without_plots()
        .sample_size(20)
        .measurement_time(Duration::from_secs(2));
    targets = playing_scripted_game, encoding_snapshot
}
criterion_main!(benches);
