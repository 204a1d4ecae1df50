#[macro_use]
extern crate criterion;

use std::sync::Arc;

use criterion::{black_box, Criterion};
use timewarp_core::prelude::*;

/// Frame throughput of a full one-year warp driven by the manual scheduler.
fn benchmark_full_year_warp(c: &mut Criterion) {
    c.bench_function("full_year_warp", |b| {
        b.iter(|| {
            let clock = VirtualClock::new(0);
            let scheduler = Arc::new(ManualScheduler::new());
            let store = WarpStore::new(Arc::new(clock.clone()), scheduler.clone());
            store.start(100.0, "1y", 0.0);
            while scheduler.pending() > 0 {
                clock.advance_ms(1_000.0 / 60.0);
                scheduler.run_frame();
            }
            black_box(store.get_simulated_rewards())
        })
    });
}

fn benchmark_speed_ramp(c: &mut Criterion) {
    c.bench_function("speed_ramp", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for ms in (0..6_000).step_by(16) {
                acc += speed(black_box(ms as f64));
            }
            acc
        })
    });
}

criterion_group!(benches, benchmark_full_year_warp, benchmark_speed_ramp);
criterion_main!(benches);
