use criterion::{Criterion, criterion_group, criterion_main};
use playhub_core::*;
use std::hint::black_box;

fn caro_ai(c: &mut Criterion) {
    let mut rng = seeded_rng(1);
    let mut game = CaroGame::new(15, 15).unwrap();
    for coords in [(7, 7), (3, 10), (11, 2), (2, 2), (12, 12)] {
        let Ok(next) = game.make_move(coords) else {
            continue;
        };
        game = next.play_computer_turn(&mut rng).unwrap_or(next);
    }

    c.bench_function("caro select_move 15x15", |b| {
        b.iter(|| select_move(black_box(game.board()), &mut rng))
    });
}

fn match3_generation(c: &mut Criterion) {
    let mut rng = seeded_rng(2);
    let size = BoardSize::new(8, 8).unwrap();

    c.bench_function("match3 generate 8x8", |b| {
        b.iter(|| generate_board(black_box(size), &mut rng))
    });
}

fn match3_swap(c: &mut Criterion) {
    let mut rng = seeded_rng(3);
    let game = Match3Game::new(8, 8, 60, &mut rng).unwrap();
    let Some((a, b)) = game.find_hint() else {
        return;
    };

    c.bench_function("match3 swap and cascade 8x8", |bench| {
        bench.iter(|| game.swap_tiles(black_box(a), black_box(b), &mut rng))
    });
}

criterion_group!(benches, caro_ai, match3_generation, match3_swap);
criterion_main!(benches);
