use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use sudoku_dlx::{DlxSolver, Sudoku, SudokuSolver};

const HARD_9X9: &str =
    "xx5x8xxxx78x3xxxxxx04x2xxxx84xx1xxxxx6xxxxxxx1x0x7xxxxxx3x6xxxxxxx5xxxxxxx120xxxx";

/// Produces a randomly re-blanked solvable grid from a fully solved base.
fn randomized_input(blanked: usize) -> String {
    let mut base = Sudoku::new(&"x".repeat(81), 3, 3).unwrap();
    assert!(DlxSolver::new().solve(&mut base));

    let mut rng = rand::thread_rng();

    for _ in 0..blanked {
        let row = rng.gen_range(0..9);
        let col = rng.gen_range(0..9);
        base.reset(row, col).unwrap();
    }

    base.serialize()
}

fn bench_solver(c: &mut Criterion) {
    let mut group = c.benchmark_group("DLX");
    let inputs = vec![
        ("hard", HARD_9X9.to_owned()),
        ("empty", "x".repeat(81)),
        ("random", randomized_input(50)),
    ];

    for (name, input) in inputs {
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, i| {
            b.iter(|| {
                let mut sudoku = Sudoku::new(black_box(i), 3, 3).unwrap();
                DlxSolver::new().solve(&mut sudoku)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_solver);
criterion_main!(benches);
