//! FILENAME: benches/bracket_calculations.rs
//! Benchmarks for the bracket build/melt path.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bracket_engine::BracketDomain;
use table::{Frame, Value};

/// 24 months x 8 dayparts x 4 demographics, full income category set.
fn create_bench_frame() -> Frame {
    let categories = [
        ("Less than $25K", 100.0),
        ("$25K+", 400.0),
        ("$50K+", 250.0),
        ("$75K+", 150.0),
        ("$100K+", 90.0),
        ("$200K+", 20.0),
    ];
    let mut frame = Frame::new(vec![
        "daypart".into(),
        "demographic".into(),
        "month".into(),
        "characteristic".into(),
        "reach_imp".into(),
        "grp_imp".into(),
    ])
    .unwrap();
    for month in 0..24 {
        for daypart in 0..8 {
            for demographic in 0..4 {
                for (characteristic, base) in categories {
                    let value = base * (1.0 + demographic as f64);
                    frame
                        .push_row(vec![
                            Value::text(format!("daypart-{daypart}")),
                            Value::text(format!("demo-{demographic}")),
                            Value::text(format!("month-{month:02}")),
                            Value::text(characteristic),
                            Value::Number(value),
                            Value::Number(value * 3.0),
                        ])
                        .expect("bench frame row");
                }
            }
        }
    }
    frame
}

fn bench_decompose(c: &mut Criterion) {
    let frame = create_bench_frame();
    let domain = BracketDomain::income();

    c.bench_function("income_decompose_wide", |b| {
        b.iter(|| domain.decompose(black_box(&frame), false).expect("wide"))
    });

    c.bench_function("income_decompose_long", |b| {
        b.iter(|| domain.decompose(black_box(&frame), true).expect("long"))
    });
}

criterion_group!(benches, bench_decompose);
criterion_main!(benches);
