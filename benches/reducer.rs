//! Reducer and decode benchmark suite.
//!
//! Measures per-event cost as room history grows:
//! - Message history sizes: 100, 1000, 10000
//! - Room sizes: 10, 100 players
//!
//! Run with: cargo bench --bench reducer
//! Results saved to: target/criterion/

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use room_session::protocol::decode_frame;
use room_session::{Action, ChatMessage, MessageId, Player, PlayerId, SessionState, reduce};

// ============================================================================
// Benchmark Parameters
// ============================================================================

const HISTORY_SIZES: &[usize] = &[100, 1_000, 10_000];
const ROOM_SIZES: &[usize] = &[10, 100];

const MESSAGE_FRAME: &str = r#"{"event_type":"new_message","payload":{"message_id":"m1","player_id":"p1","player_name":"Alice","text":"hello there","timestamp":"2024-05-01T12:00:00"}}"#;

// ============================================================================
// Fixtures
// ============================================================================

fn message(n: usize) -> ChatMessage {
    ChatMessage {
        message_id: MessageId::new(format!("m{n}")),
        player_id: PlayerId::new(format!("p{}", n % 10)),
        player_name: format!("Player {}", n % 10),
        text: "lorem ipsum dolor sit amet".to_owned(),
        timestamp: "2024-05-01T12:00:00".to_owned(),
    }
}

fn state_with(players: usize, messages: usize) -> SessionState {
    SessionState {
        players: (0..players)
            .map(|n| Player::new(format!("p{n}"), format!("Player {n}")))
            .collect(),
        messages: (0..messages).map(message).collect(),
        ..SessionState::new()
    }
}

// ============================================================================
// Benchmark: Add Message
// ============================================================================

fn bench_add_message(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_message");

    for &size in HISTORY_SIZES {
        let state = state_with(10, size);
        group.bench_with_input(BenchmarkId::new("history", size), &state, |b, state| {
            b.iter(|| reduce(black_box(state), Action::AddMessage(message(size))));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Membership
// ============================================================================

fn bench_membership(c: &mut Criterion) {
    let mut group = c.benchmark_group("membership");

    for &size in ROOM_SIZES {
        let state = state_with(size, 100);
        let joining = Player::new("newcomer", "Newcomer");
        let leaving = PlayerId::new(format!("p{}", size / 2));

        group.bench_with_input(BenchmarkId::new("join", size), &state, |b, state| {
            b.iter(|| reduce(black_box(state), Action::AddPlayer(joining.clone())));
        });

        group.bench_with_input(BenchmarkId::new("leave", size), &state, |b, state| {
            b.iter(|| reduce(black_box(state), Action::RemovePlayer(leaving.clone())));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Decode
// ============================================================================

fn bench_decode(c: &mut Criterion) {
    c.bench_function("decode_new_message", |b| {
        b.iter(|| decode_frame(black_box(MESSAGE_FRAME)));
    });
}

criterion_group!(benches, bench_add_message, bench_membership, bench_decode);
criterion_main!(benches);
