// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Size};
use understory_ripple::geometry::{Contact, cover_diameter, resolve_origin};
use understory_ripple::headless::{ElementId, HeadlessHost};
use understory_ripple::host::EventTarget;
use understory_ripple::input::{Input, TouchFlag};
use understory_ripple::{ExitPolicy, RippleEffect, RippleOptions};

static TOUCH: TouchFlag = TouchFlag::new();

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_points(count: usize, rect: Rect) -> Vec<Point> {
    let mut rng = Rng::new(0x5eed_cafe);
    (0..count)
        .map(|_| {
            Point::new(
                rect.x0 + rng.next_f64() * rect.width(),
                rect.y0 + rng.next_f64() * rect.height(),
            )
        })
        .collect()
}

fn setup(options: RippleOptions<ElementId>) -> (HeadlessHost, RippleEffect<ElementId>, ElementId) {
    let mut host = HeadlessHost::new();
    let button = host.insert(None, Rect::new(20.0, 20.0, 220.0, 68.0));
    let effect = RippleEffect::with_touch_flag(&mut host, button, options, &TOUCH).unwrap();
    (host, effect, button)
}

fn bench_geometry(c: &mut Criterion) {
    let rect = Rect::new(20.0, 20.0, 220.0, 68.0);
    let points = gen_points(1024, rect.inflate(16.0, 16.0));
    let mut group = c.benchmark_group("geometry");
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("resolve_and_cover", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for &p in &points {
                let origin = resolve_origin(Contact::Client(p), rect, false);
                acc += cover_diameter(rect.size(), origin);
            }
            black_box(acc)
        });
    });
    group.bench_function("cover_square", |b| {
        let size = Size::new(48.0, 48.0);
        b.iter(|| black_box(cover_diameter(black_box(size), Point::new(12.0, 30.0))));
    });
    group.finish();
}

fn bench_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("lifecycle");
    for &n in &[1_usize, 16, 128] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("timed_ripples_{n}"), |b| {
            b.iter_batched(
                || setup(RippleOptions::new()),
                |(mut host, mut effect, _)| {
                    for i in 0..n {
                        let x = (i % 200) as f64;
                        effect
                            .trigger(&mut host, x, 24.0, ExitPolicy::Timed)
                            .unwrap();
                    }
                    host.run_frame(&mut effect);
                    host.run_frame(&mut effect);
                    host.advance_timers(&mut effect, Duration::from_millis(800));
                    black_box(effect.ripples().count())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.bench_function("press_hold_release", |b| {
        let points = gen_points(64, Rect::new(20.0, 20.0, 220.0, 68.0));
        b.iter_batched(
            || setup(RippleOptions::new()),
            |(mut host, mut effect, button)| {
                for &p in &points {
                    host.dispatch(&mut effect, EventTarget::Element(button), &Input::MouseDown(p));
                    host.run_frame(&mut effect);
                    host.run_frame(&mut effect);
                    host.dispatch(&mut effect, EventTarget::Window, &Input::MouseUp);
                    host.advance_timers(&mut effect, Duration::from_millis(100));
                }
                host.advance_timers(&mut effect, Duration::from_secs(1));
                black_box(host.element_count())
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_attach(c: &mut Criterion) {
    c.bench_function("attach_destroy", |b| {
        b.iter_batched(
            HeadlessHost::new,
            |mut host| {
                let button = host.insert(None, Rect::new(0.0, 0.0, 100.0, 40.0));
                let mut effect =
                    RippleEffect::with_touch_flag(&mut host, button, RippleOptions::new(), &TOUCH)
                        .unwrap();
                effect.destroy(&mut host);
                black_box(host.listener_count())
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_geometry, bench_lifecycle, bench_attach);
criterion_main!(benches);
