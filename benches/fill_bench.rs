//! Clone plan, reconcile and frame benchmarks.
#![allow(missing_docs, clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reel::animation::{LoopTimeline, Repeat, Timeline, TimelineSpec};
use reel::fill::{compute_fill_plan, FillPolicy};
use reel::host::MemoryHost;
use reel::util::EasingFunction;
use reel::{PluginRegistry, ReelOptions, Reeller};

fn fill_plan_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_plan");

    for count in [3, 30, 300].iter() {
        let widths: Vec<f64> = (0..*count).map(|i| 40.0 + f64::from(i % 7) * 13.0).collect();
        let policy = FillPolicy {
            overflow: true,
            finish_cycle: true,
            minimum_clones: 0,
        };
        group.bench_function(format!("{}_items", count), |b| {
            b.iter(|| black_box(compute_fill_plan(black_box(4000.0), &widths, policy)))
        });
    }
    group.finish();
}

fn timeline_advance_benchmark(c: &mut Criterion) {
    let mut timeline = LoopTimeline::from_spec(TimelineSpec {
        duration: 10.0,
        ease: EasingFunction::ExpoOut,
        repeat: Repeat::Yoyo,
        paused: false,
        reversed: false,
    });
    let start = || -1200.0;
    c.bench_function("timeline_advance", |b| {
        b.iter(|| black_box(timeline.advance(black_box(1.0 / 60.0), &start)))
    });
}

fn resize_benchmark(c: &mut Criterion) {
    let host = MemoryHost::new("#reel", 1000.0).with_items(&[120.0; 12]);
    let options = ReelOptions {
        container: Some("#reel".to_owned()),
        ..ReelOptions::default()
    };
    let mut reel = Reeller::new(host, options, &PluginRegistry::with_builtins()).unwrap();
    let mut wide = false;

    c.bench_function("resize_and_tick", |b| {
        b.iter(|| {
            wide = !wide;
            reel.host_mut()
                .set_container_width(if wide { 3000.0 } else { 1000.0 });
            let _ = black_box(reel.on_resize());
            black_box(reel.tick(1.0 / 60.0))
        })
    });
}

criterion_group!(benches, fill_plan_benchmark, timeline_advance_benchmark, resize_benchmark);
criterion_main!(benches);
