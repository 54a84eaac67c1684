//! # moodtune Benchmarks
//!
//! - **Catalog**: mood filtering over a large generated catalog
//! - **Store**: saved-song reads and writes through the local store
//! - **Player**: track navigation with the silent engine
//! - **Validation**: preference form checks
//!
//! ```bash
//! cargo bench
//! cargo bench store
//! ```

use chrono::Utc;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use std::hint::black_box;
use tempfile::TempDir;

use moodtune::catalog::{Catalog, Mood, Song};
use moodtune::playback::SilentEngine;
use moodtune::player::Player;
use moodtune::store::{LocalStore, SavedSong, UserPreferences};
use moodtune::suggestions::displayed_songs;
use moodtune::validate::validate;

fn create_test_songs(count: u32) -> Vec<Song> {
    (1..=count)
        .map(|id| Song {
            id,
            title: format!("Song {id:04}"),
            artist: format!("Artist {}", id % 50),
            mood: Mood::ALL[(id as usize) % Mood::ALL.len()],
            url: format!("https://example.org/{id}.mp3"),
            length: 180 + id % 120,
        })
        .collect()
}

fn benchmark_catalog(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog");
    let prefs = UserPreferences {
        name: "Ada".to_string(),
        email: "ada@example.org".to_string(),
        mood: "focus".to_string(),
        saved_at: Utc::now(),
    };

    for size in [8_u32, 1_000, 10_000] {
        let catalog = Catalog::new(create_test_songs(size));
        group.bench_with_input(BenchmarkId::new("displayed_songs", size), &catalog, |b, catalog| {
            b.iter(|| black_box(displayed_songs(catalog, Some(&prefs))))
        });
    }

    group.finish();
}

fn benchmark_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("store");
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let store = LocalStore::open(&temp_dir.path().join("bench.db")).expect("Failed to open store");
    let saved: Vec<SavedSong> = create_test_songs(200)
        .iter()
        .map(|song| SavedSong::new(song, Utc::now()))
        .collect();

    group.bench_function("write_saved_songs", |b| {
        b.iter(|| store.set_saved_songs(black_box(&saved)).expect("write failed"))
    });

    store.set_saved_songs(&saved).expect("write failed");
    group.bench_function("read_saved_songs", |b| b.iter(|| black_box(store.saved_songs())));

    group.finish();
}

fn benchmark_player(c: &mut Criterion) {
    let mut group = c.benchmark_group("player");

    group.bench_function("cycle_100_tracks", |b| {
        b.iter_batched(
            || Player::new(Box::new(SilentEngine::new(80)), create_test_songs(100)),
            |mut player| {
                for _ in 0..100 {
                    player.next();
                }
                player.prev();
                black_box(player.current())
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn benchmark_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");

    group.bench_function("valid_form", |b| {
        b.iter(|| black_box(validate(black_box("Ada"), black_box("ada@example.org"), black_box("chill"))))
    });
    group.bench_function("bad_email", |b| {
        b.iter(|| black_box(validate(black_box("Ada"), black_box("ada at example"), black_box("chill"))))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_catalog,
    benchmark_store,
    benchmark_player,
    benchmark_validation
);

criterion_main!(benches);
