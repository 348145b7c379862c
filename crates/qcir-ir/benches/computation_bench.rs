//! Benchmarks for circuit container operations
//!
//! Run with: cargo bench -p qcir-ir

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qcir_ir::{ClbitId, QuantumComputation, QubitId};
use std::f64::consts::PI;

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for num_qubits in &[2, 5, 10, 20, 50] {
        group.bench_with_input(
            BenchmarkId::new("with_size", num_qubits),
            num_qubits,
            |b, &n| {
                b.iter(|| QuantumComputation::with_size(black_box(n), black_box(n)));
            },
        );
    }

    group.finish();
}

fn bench_gate_emission(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_emission");

    group.bench_function("h", |b| {
        let mut qc = QuantumComputation::with_size(10, 0);
        b.iter(|| {
            qc.h(black_box(QubitId(0))).unwrap();
        });
    });

    group.bench_function("rx", |b| {
        let mut qc = QuantumComputation::with_size(10, 0);
        b.iter(|| {
            qc.rx(black_box(PI / 4.0), black_box(QubitId(0))).unwrap();
        });
    });

    group.bench_function("cx", |b| {
        let mut qc = QuantumComputation::with_size(10, 0);
        b.iter(|| {
            qc.cx(black_box(QubitId(0)), black_box(QubitId(1))).unwrap();
        });
    });

    group.finish();
}

fn bench_ghz(c: &mut Criterion) {
    let mut group = c.benchmark_group("ghz");

    for num_qubits in &[3u32, 10, 50, 100] {
        group.bench_with_input(
            BenchmarkId::new("create", num_qubits),
            num_qubits,
            |b, &n| {
                b.iter(|| {
                    let mut qc = QuantumComputation::with_size(n as usize, n as usize);
                    qc.h(QubitId(0)).unwrap();
                    for i in 0..n - 1 {
                        qc.cx(QubitId(i), QubitId(i + 1)).unwrap();
                    }
                    for i in 0..n {
                        qc.measure(QubitId(i), ClbitId(i)).unwrap();
                    }
                    black_box(qc)
                });
            },
        );
    }

    group.finish();
}

fn bench_strip_idle(c: &mut Criterion) {
    let mut group = c.benchmark_group("strip_idle");

    for num_qubits in &[10u32, 50, 100] {
        // every other qubit stays idle
        let mut qc = QuantumComputation::with_size(*num_qubits as usize, 0);
        for i in (0..*num_qubits).step_by(2) {
            qc.h(QubitId(i)).unwrap();
        }

        group.bench_with_input(BenchmarkId::new("strip", num_qubits), &qc, |b, qc| {
            b.iter(|| {
                let mut qc = qc.clone();
                qc.strip_idle_qubits(true, true).unwrap();
                black_box(qc)
            });
        });
    }

    group.finish();
}

fn bench_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("depth");

    for num_qubits in &[5usize, 20, 50] {
        let qc = QuantumComputation::random_clifford_circuit(*num_qubits, 20, 7);
        group.bench_with_input(BenchmarkId::new("random_clifford", num_qubits), &qc, |b, qc| {
            b.iter(|| black_box(qc.depth()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_construction,
    bench_gate_emission,
    bench_ghz,
    bench_strip_idle,
    bench_depth,
);

criterion_main!(benches);
