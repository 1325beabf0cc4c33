use criterion::{black_box, criterion_group, criterion_main, Criterion};
use trimatch::core::session::{GameSession, SessionConfig};
use trimatch::core::{scan, Grid, ShapeRng};
use trimatch::types::{Position, ShapeId, Tile};

fn quiet_session(seed: u32) -> GameSession {
    GameSession::new(SessionConfig {
        seed,
        ..SessionConfig::default()
    })
    .unwrap()
}

fn bench_scan_quiescent(c: &mut Criterion) {
    let session = quiet_session(12345);

    c.bench_function("scan_quiescent_6x6", |b| {
        b.iter(|| scan(black_box(session.grid())))
    });
}

fn bench_scan_with_matches(c: &mut Criterion) {
    let mut session = quiet_session(12345);
    // Seed a horizontal triple so every scan reports work.
    for col in 0..3 {
        session
            .grid_mut()
            .set(Position::new(0, col), Some(Tile::new(ShapeId(2))));
    }

    c.bench_function("scan_with_matches_6x6", |b| {
        b.iter(|| scan(black_box(session.grid())))
    });
}

fn bench_mark_and_settle(c: &mut Criterion) {
    c.bench_function("mark_and_settle_one_iteration", |b| {
        b.iter(|| {
            let mut session = quiet_session(777);
            for col in 0..3 {
                session
                    .grid_mut()
                    .set(Position::new(0, col), Some(Tile::new(ShapeId(2))));
            }
            let runs = session.scan_matches().unwrap();
            let plan = session.mark_matches(&runs);
            session.settle(&plan).unwrap();
        })
    });
}

fn bench_drop_and_refill(c: &mut Criterion) {
    c.bench_function("drop_and_refill_6x6", |b| {
        b.iter(|| {
            let mut grid = Grid::new(6, 6).unwrap();
            let mut rng = ShapeRng::new(99, 3);
            grid.fill(&mut rng);
            for col in 0..6 {
                grid.set(Position::new(2, col), None);
            }
            grid.drop_tiles();
            grid.refill(&mut rng);
        })
    });
}

fn bench_session_creation(c: &mut Criterion) {
    c.bench_function("session_creation_with_initial_resolution", |b| {
        let mut seed = 0u32;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            quiet_session(black_box(seed.max(1)))
        })
    });
}

criterion_group!(
    benches,
    bench_scan_quiescent,
    bench_scan_with_matches,
    bench_mark_and_settle,
    bench_drop_and_refill,
    bench_session_creation
);
criterion_main!(benches);
