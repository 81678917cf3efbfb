//! Benchmarks for the per-event decode/classify/accumulate path.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use ct_core::{EventRecord, Period, TriggerInput};
use ct_trigger::{classify, Accumulator, RunTable, TriggerInputMap};

fn make_events(n: usize, map: &TriggerInputMap) -> Vec<EventRecord> {
    let patterns: [&[TriggerInput]; 4] = [
        &[TriggerInput::V0aInGate, TriggerInput::V0cInGate, TriggerInput::SpdFastOr],
        &[TriggerInput::V0aInGate],
        &[TriggerInput::V0cInGate, TriggerInput::AdcInGate],
        &[],
    ];
    (0..n)
        .map(|i| {
            let (l0, l1) = map.mask(patterns[i % patterns.len()]);
            EventRecord { run: 295_585, l0_inputs: l0, l1_inputs: l1, ..Default::default() }
        })
        .collect()
}

fn bench_event_path(c: &mut Criterion) {
    let map = TriggerInputMap::for_period(Period::PbPb2018);
    let table = RunTable::for_period(Period::PbPb2018);
    let mut group = c.benchmark_group("event_path");

    for n in [100, 10_000] {
        let events = make_events(n, &map);

        group.bench_with_input(BenchmarkId::new("classify", n), &n, |b, _| {
            b.iter(|| {
                let mut acc = Accumulator::new();
                for ev in &events {
                    let flags = map.decode(black_box(ev.l0_inputs), black_box(ev.l1_inputs));
                    acc.update(classify(&flags), ev, table.lookup(ev.run));
                }
                black_box(acc)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_event_path);
criterion_main!(benches);
