//! Benchmarks for compiled evaluation vs. re-parsing
//!
//! Run with: `cargo bench --bench evaluator`

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use xpr_core::{Engine, EngineOptions, Variable};

const FORMULAS: [(&str, &str); 4] = [
    ("linear", "1 + 2*a"),
    ("trig", "sin(a)^2 + cos(a)^2"),
    ("variadic", "sum(a, b, a*b, 3) / max(a, b, 1)"),
    ("folded", "a * (_pi * 2 + sqrt(16))"),
];

fn engine(options: EngineOptions, formula: &str, a: &Variable, b: &Variable) -> Engine {
    let mut engine = Engine::with_stdlib(options);
    engine.define_var("a", a.clone()).unwrap();
    engine.define_var("b", b.clone()).unwrap();
    engine.set_formula(formula);
    engine
}

fn bench_calc(c: &mut Criterion) {
    let mut group = c.benchmark_group("calc");
    let a = Variable::new(0.5);
    let b = Variable::new(2.0);

    let modes = [
        ("bytecode", EngineOptions::default()),
        (
            "bytecode_unoptimized",
            EngineOptions {
                optimizer: false,
                bytecode: true,
            },
        ),
        (
            "parse",
            EngineOptions {
                optimizer: true,
                bytecode: false,
            },
        ),
    ];

    for (name, formula) in FORMULAS {
        for (mode, options) in modes {
            let mut engine = engine(options, formula, &a, &b);
            group.bench_with_input(BenchmarkId::new(mode, name), &(), |bencher, _| {
                bencher.iter(|| {
                    a.set(black_box(0.5));
                    black_box(engine.calc().unwrap());
                });
            });
        }
    }

    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let a = Variable::new(0.5);
    let b = Variable::new(2.0);
    let mut group = c.benchmark_group("compile");

    for (name, formula) in FORMULAS {
        let mut engine = engine(EngineOptions::default(), formula, &a, &b);
        group.bench_function(name, |bencher| {
            bencher.iter(|| {
                engine.set_formula(black_box(formula));
                black_box(engine.calc().unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_calc, bench_compile);
criterion_main!(benches);
