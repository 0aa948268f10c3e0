// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Size};
use understory_parallax::{
    Capabilities, Children, CurtainProps, HeadlessEnvironment, InputEvent, Orientation, Stage,
    StageOptions,
};

fn desktop() -> HeadlessEnvironment {
    HeadlessEnvironment::new(Size::new(1920.0, 1080.0))
        .with_element(Rect::new(320.0, 180.0, 1600.0, 900.0))
}

fn pointer_path(len: usize) -> Vec<InputEvent> {
    (0..len)
        .map(|i| {
            let t = i as f64 / len as f64;
            InputEvent::PointerMove(Point::new(1920.0 * t, 1080.0 * (1.0 - t)))
        })
        .collect()
}

fn bench_pointer_events(c: &mut Criterion) {
    let mut group = c.benchmark_group("stage/pointer");
    let events = pointer_path(1_024);
    group.throughput(Throughput::Elements(events.len() as u64));

    for (name, options) in [
        ("window", StageOptions::default()),
        (
            "element_clipped",
            StageOptions::default()
                .relative_to_element(true)
                .clip_to_element(true),
        ),
    ] {
        group.bench_with_input(BenchmarkId::new("handle_event", name), &events, |b, events| {
            let mut env = desktop();
            let mut stage = Stage::new(options).unwrap();
            stage.start(&mut env).unwrap();
            b.iter(|| {
                for event in events {
                    black_box(stage.handle_event(&env, *event));
                }
            });
        });
    }
    group.finish();
}

fn bench_orientation_events(c: &mut Criterion) {
    let mut env = desktop().with_capabilities(Capabilities::HANDHELD);
    let mut stage = Stage::new(StageOptions::default()).unwrap();
    stage.start(&mut env).unwrap();
    let samples: Vec<InputEvent> = (0..1_024)
        .map(|i| {
            let angle = f64::from(i % 60) - 30.0;
            InputEvent::Orientation(Orientation::new(angle, angle * 0.5 + 45.0))
        })
        .collect();

    c.bench_function("stage/orientation/handle_event", |b| {
        b.iter(|| {
            for event in &samples {
                black_box(stage.handle_event(&env, *event));
            }
        });
    });
}

fn bench_render_layers(c: &mut Criterion) {
    let mut group = c.benchmark_group("stage/render");
    let mut env = desktop();
    let mut stage = Stage::new(StageOptions::default()).unwrap();
    stage.start(&mut env).unwrap();
    stage.handle_event(&env, InputEvent::PointerMove(Point::new(1200.0, 300.0)));

    for layers in [4usize, 32, 256] {
        let mut children: Children<CurtainProps> = Children::Nodes(
            (0..layers)
                .map(|i| CurtainProps::default().with_rate(i as f64 / layers as f64))
                .collect(),
        );
        group.throughput(Throughput::Elements(layers as u64));
        group.bench_function(BenchmarkId::from_parameter(layers), |b| {
            b.iter(|| {
                let frame = stage.render(&Default::default(), &mut children);
                for layer in &frame.children {
                    black_box(layer.transform());
                }
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_pointer_events,
    bench_orientation_events,
    bench_render_layers
);
criterion_main!(benches);
