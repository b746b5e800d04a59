// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use understory_key_focus::KeyQueue;
use understory_key_focus::event::HandlerEvents;
use understory_key_focus::ops::{HandlerOp, HideInputOp, Ops};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }
}

/// A flat list of `n` listeners; roughly one in `request_every` asks for focus.
fn build_flat(n: u32, request_every: u32, seed: u64) -> Ops<u32> {
    let mut ops = Ops::new();
    let mut rng = Lcg::new(seed);
    for key in 0..n {
        let focus = request_every != 0 && rng.next_u32() % request_every == 0;
        HandlerOp { key, focus }.add(&mut ops);
    }
    ops
}

/// A tree of scopes `depth` levels deep with `fanout` children per scope.
fn build_nested(ops: &mut Ops<u32>, next: &mut u32, depth: u32, fanout: u32) {
    for _ in 0..fanout {
        HandlerOp {
            key: *next,
            focus: false,
        }
        .add(ops);
        *next += 1;
        if depth > 0 {
            ops.scope(|ops| build_nested(ops, next, depth - 1, fanout));
        }
    }
    if depth == 0 {
        HideInputOp.add(ops);
    }
}

fn bench_key_focus(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_key_focus");
    group.sample_size(50);

    for &n in &[64_u32, 1_024, 16_384] {
        let steady = build_flat(n, 0, 0x4B45_0000_0000_0001);
        group.bench_function(format!("steady_frame_flat(n={n})"), |b| {
            let mut queue = KeyQueue::new();
            let mut events = HandlerEvents::new();
            queue.frame(&steady, &mut events).unwrap();
            b.iter(|| {
                queue.frame(black_box(&steady), &mut events).unwrap();
                black_box(queue.input_state());
            });
        });

        let requests = build_flat(n, 16, 0x4B45_0000_0000_0002);
        group.bench_function(format!("first_frame_flat(n={n})"), |b| {
            b.iter_batched(
                || (KeyQueue::new(), HandlerEvents::new()),
                |(mut queue, mut events)| {
                    queue.frame(&requests, &mut events).unwrap();
                    black_box(queue.focus());
                },
                BatchSize::SmallInput,
            );
        });
    }

    for &(depth, fanout) in &[(3_u32, 4_u32), (6, 3)] {
        let mut tree = Ops::new();
        build_nested(&mut tree, &mut 0, depth, fanout);
        group.bench_function(format!("steady_frame_nested(d={depth},f={fanout})"), |b| {
            let mut queue = KeyQueue::new();
            let mut events = HandlerEvents::new();
            queue.frame(&tree, &mut events).unwrap();
            b.iter(|| {
                queue.frame(black_box(&tree), &mut events).unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_key_focus);
criterion_main!(benches);
