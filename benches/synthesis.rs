//! Synthesis pipeline benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fsmc_graph::{Fsm, StateId};
use fsmc_netlist::Simulator;
use fsmc_synth::{
    build_table, encode_inputs, encode_states, minimize_all, synthesize, MintermCover,
    SynthConfig, Synthesizer,
};

/// Ring of `states` states over `inputs` symbols: symbol k advances by k + 1
fn ring(states: usize, inputs: usize) -> Fsm {
    let mut fsm = Fsm::new();
    let ids: Vec<StateId> = (0..states)
        .map(|i| fsm.add_state(if i % 2 == 0 { "10" } else { "01" }))
        .collect();
    for (i, &from) in ids.iter().enumerate() {
        for k in 0..inputs {
            let to = ids[(i + k + 1) % states];
            let _ = fsm.add_transition(from, to, format!("in{}", k));
        }
    }
    fsm
}

const SIZES: [(usize, usize); 3] = [(4, 2), (16, 4), (64, 8)];

fn benchmark_truth_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("truth_table");

    for (states, inputs) in SIZES {
        let fsm = ring(states, inputs);
        let name = format!("{}x{}", states, inputs);
        group.bench_with_input(BenchmarkId::from_parameter(name), &fsm, |b, fsm| {
            b.iter(|| {
                let s = encode_states(fsm.states());
                let i = encode_inputs(fsm.transitions());
                let table = build_table(fsm, &s, &i).unwrap();
                black_box(table.len())
            });
        });
    }
    group.finish();
}

fn benchmark_minimization(c: &mut Criterion) {
    let mut group = c.benchmark_group("minimization");

    let fsm = ring(64, 8);
    let table = build_table(
        &fsm,
        &encode_states(fsm.states()),
        &encode_inputs(fsm.transitions()),
    )
    .unwrap();

    for parallel in [false, true] {
        let name = if parallel { "parallel" } else { "serial" };
        group.bench_function(name, |b| {
            b.iter(|| {
                let logic = minimize_all(&table, &MintermCover, parallel, true).unwrap();
                black_box(logic.next_state.len())
            });
        });
    }
    group.finish();
}

fn benchmark_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    for (states, inputs) in SIZES {
        let fsm = ring(states, inputs);
        let name = format!("{}x{}", states, inputs);
        group.bench_with_input(BenchmarkId::new("synthesize", &name), &fsm, |b, fsm| {
            b.iter(|| black_box(synthesize(fsm).unwrap().netlist.stats()));
        });
        group.bench_with_input(BenchmarkId::new("skeleton", &name), &fsm, |b, fsm| {
            let synthesizer = Synthesizer::new(SynthConfig::serial());
            b.iter(|| black_box(synthesizer.skeleton(fsm).unwrap().netlist.stats()));
        });
    }
    group.finish();
}

fn benchmark_simulation(c: &mut Criterion) {
    let fsm = ring(16, 4);
    let synthesis = synthesize(&fsm).unwrap();
    let stimulus: Vec<Vec<bool>> = (0..4)
        .map(|k| {
            synthesis
                .input_encoding
                .code(&format!("in{}", k))
                .unwrap()
                .as_slice()
                .to_vec()
        })
        .collect();

    c.bench_function("simulate_1000_cycles", |b| {
        b.iter(|| {
            let mut sim = Simulator::new(&synthesis.netlist);
            for cycle in 0..1000 {
                sim.step(&stimulus[cycle % stimulus.len()]).unwrap();
            }
            black_box(sim.state().to_vec())
        });
    });
}

criterion_group!(
    benches,
    benchmark_truth_table,
    benchmark_minimization,
    benchmark_pipeline,
    benchmark_simulation
);
criterion_main!(benches);
