//! Property-based tests for the register algebra, the graph and the container.

use proptest::prelude::*;
use qcir_ir::register::{self, Register, RegisterMap};
use qcir_ir::{Graph, QuantumComputation, QubitId};
use std::collections::BTreeSet;
use std::f64::consts::PI;

/// Indices covered by the map, failing on overlap.
fn covered(regs: &RegisterMap) -> Option<BTreeSet<u32>> {
    let mut seen = BTreeSet::new();
    for reg in regs.values() {
        for i in reg.indices() {
            if !seen.insert(i) {
                return None;
            }
        }
    }
    Some(seen)
}

/// A size and a permutation of a subset of its indices.
fn arb_removals() -> impl Strategy<Value = (u32, Vec<u32>)> {
    (1_u32..=12).prop_flat_map(|n| {
        let all: Vec<u32> = (0..n).collect();
        (Just(n), Just(all).prop_shuffle(), 0..=n as usize)
            .prop_map(|(n, order, k)| (n, order.into_iter().take(k).collect()))
    })
}

/// Gates whose double inversion is exact.
#[derive(Debug, Clone)]
enum GateOp {
    H(u32),
    S(u32),
    T(u32),
    Rx(f64, u32),
    U(f64, f64, f64, u32),
    Cx(u32, u32),
    Iswap(u32, u32),
}

impl GateOp {
    fn apply(self, qc: &mut QuantumComputation) {
        let _ = match self {
            GateOp::H(q) => qc.h(QubitId(q)).map(|_| ()),
            GateOp::S(q) => qc.s(QubitId(q)).map(|_| ()),
            GateOp::T(q) => qc.t(QubitId(q)).map(|_| ()),
            GateOp::Rx(theta, q) => qc.rx(theta, QubitId(q)).map(|_| ()),
            GateOp::U(theta, phi, lambda, q) => qc.u(theta, phi, lambda, QubitId(q)).map(|_| ()),
            GateOp::Cx(c, t) => qc.cx(QubitId(c), QubitId(t)).map(|_| ()),
            GateOp::Iswap(a, b) => qc.iswap(QubitId(a), QubitId(b)).map(|_| ()),
        };
    }
}

fn arb_gate_op() -> impl Strategy<Value = GateOp> {
    let angle = -PI..PI;
    prop_oneof![
        (0_u32..3).prop_map(GateOp::H),
        (0_u32..3).prop_map(GateOp::S),
        (0_u32..3).prop_map(GateOp::T),
        (angle.clone(), 0_u32..3).prop_map(|(a, q)| GateOp::Rx(a, q)),
        (angle.clone(), angle.clone(), angle, 0_u32..3)
            .prop_map(|(t, p, l, q)| GateOp::U(t, p, l, q)),
        (0_u32..3, 0_u32..3)
            .prop_filter("control and target must differ", |(c, t)| c != t)
            .prop_map(|(c, t)| GateOp::Cx(c, t)),
        (0_u32..3, 0_u32..3)
            .prop_filter("targets must differ", |(a, b)| a != b)
            .prop_map(|(a, b)| GateOp::Iswap(a, b)),
    ]
}

proptest! {
    #[test]
    fn removals_keep_registers_tiled((n, removed) in arb_removals()) {
        let mut regs = RegisterMap::new();
        regs.insert("q".to_string(), Register::new(0, n));

        for &index in &removed {
            let (name, _) = register::register_and_index(&regs, index).unwrap();
            let name = name.to_string();
            register::remove(&mut regs, &name, index).unwrap();
        }

        let expected: BTreeSet<u32> =
            (0..n).filter(|i| !removed.contains(i)).collect();
        prop_assert_eq!(covered(&regs), Some(expected));
        prop_assert_eq!(register::total_size(&regs) as usize, n as usize - removed.len());
    }

    #[test]
    fn readding_restores_full_cover((n, removed) in arb_removals()) {
        let mut regs = RegisterMap::new();
        regs.insert("q".to_string(), Register::new(0, n));
        for &index in &removed {
            let (name, _) = register::register_and_index(&regs, index).unwrap();
            let name = name.to_string();
            register::remove(&mut regs, &name, index).unwrap();
        }
        for &index in removed.iter().rev() {
            register::add(&mut regs, index, "q");
        }

        let expected: BTreeSet<u32> = (0..n).collect();
        prop_assert_eq!(covered(&regs), Some(expected));
    }

    #[test]
    fn consolidation_is_idempotent((n, removed) in arb_removals()) {
        let mut regs = RegisterMap::new();
        regs.insert("q".to_string(), Register::new(0, n));
        for &index in &removed {
            let (name, _) = register::register_and_index(&regs, index).unwrap();
            let name = name.to_string();
            register::remove(&mut regs, &name, index).unwrap();
        }

        register::consolidate(&mut regs);
        let once = regs.clone();
        register::consolidate(&mut regs);
        prop_assert_eq!(once, regs);
    }

    #[test]
    fn degree_matches_neighbour_count(
        edges in prop::collection::vec((0_u8..8, 0_u8..8, any::<i32>()), 0..40)
    ) {
        let mut g = Graph::new();
        let mut distinct = BTreeSet::new();
        for (u, v, label) in edges {
            g.add_edge(u, v, label);
            distinct.insert((u.min(v), u.max(v)));
        }

        prop_assert_eq!(g.num_edges(), distinct.len());
        let vertices: Vec<u8> = g.vertices().copied().collect();
        for v in vertices {
            prop_assert_eq!(g.degree(&v).unwrap(), g.get_neighbours(&v).unwrap().len());
        }
    }

    #[test]
    fn global_phase_stays_normalized(angles in prop::collection::vec(-100.0_f64..100.0, 0..20)) {
        let mut qc = QuantumComputation::with_size(1, 0);
        for angle in angles {
            qc.gphase(angle);
            prop_assert!(qc.global_phase() >= 0.0);
            prop_assert!(qc.global_phase() < 2.0 * PI);
        }
    }

    #[test]
    fn double_inversion_is_identity(ops in prop::collection::vec(arb_gate_op(), 0..15)) {
        let mut qc = QuantumComputation::with_size(3, 0);
        for op in ops {
            op.apply(&mut qc);
        }
        let original: Vec<_> = qc.iter().cloned().collect();

        qc.invert();
        qc.invert();

        let restored: Vec<_> = qc.iter().cloned().collect();
        prop_assert_eq!(original, restored);
    }
}
