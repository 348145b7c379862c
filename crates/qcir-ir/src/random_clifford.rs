//! Random Clifford circuit generation.
//!
//! The two-qubit Clifford group modulo phases has 11520 elements. An index
//! `idx` is decomposed as `idx % 16` (Pauli frame) and `idx / 16`, which
//! selects one of four classes: local Cliffords (36), one CNOT (324), two
//! CNOTs (324) and three CNOTs (36).

use rand::Rng;
use std::collections::BTreeSet;

use crate::computation::QuantumComputation;
use crate::op_type::OpType;
use crate::operation::{CompoundOperation, Operation, StandardOperation};
use crate::qubit::{Control, QubitId};

/// Size of the two-qubit Clifford group modulo global phase.
pub const NUM_2Q_CLIFFORDS: u16 = 11520;

/// Size of the single-qubit Clifford group modulo global phase.
pub const NUM_1Q_CLIFFORDS: u16 = 24;

fn gate(op_type: OpType, target: QubitId) -> Operation {
    Operation::Standard(StandardOperation::new(op_type, BTreeSet::new(), vec![target], vec![]))
}

fn cnot(control: QubitId, target: QubitId) -> Operation {
    let controls = BTreeSet::from([Control::pos(control)]);
    Operation::Standard(StandardOperation::new(OpType::X, controls, vec![target], vec![]))
}

/// Cyclic permutation of the Pauli axes: identity, H·S or S†·H.
fn axis_rotation(ops: &mut Vec<Operation>, selector: u16, target: QubitId) {
    match selector {
        1 => {
            ops.push(gate(OpType::H, target));
            ops.push(gate(OpType::S, target));
        }
        2 => {
            ops.push(gate(OpType::Sdg, target));
            ops.push(gate(OpType::H, target));
        }
        _ => {}
    }
}

fn pauli(ops: &mut Vec<Operation>, selector: u16, target: QubitId) {
    match selector {
        1 => ops.push(gate(OpType::Z, target)),
        2 => ops.push(gate(OpType::X, target)),
        3 => ops.push(gate(OpType::Y, target)),
        _ => {}
    }
}

/// Gate sequence of the single-qubit Clifford with index `idx % 24`.
pub fn single_qubit_clifford(idx: u16, target: QubitId) -> CompoundOperation {
    let id = idx % NUM_1Q_CLIFFORDS;
    let mut ops = Vec::new();
    if (id / 12) % 2 != 0 {
        ops.push(gate(OpType::H, target));
    }
    axis_rotation(&mut ops, (id / 4) % 3, target);
    pauli(&mut ops, id % 4, target);
    CompoundOperation::new(ops)
}

/// Gate sequence of the two-qubit Clifford with index `idx % 11520`.
pub fn two_qubit_clifford(idx: u16, control: QubitId, target: QubitId) -> CompoundOperation {
    let idx = idx % NUM_2Q_CLIFFORDS;
    let pauli_idx = idx % 16;
    let mut id = idx / 16;
    let mut ops = Vec::new();

    if id < 36 {
        if (id / 9) % 2 != 0 {
            ops.push(gate(OpType::H, control));
        }
        if (id / 18) % 2 != 0 {
            ops.push(gate(OpType::H, target));
        }
        axis_rotation(&mut ops, (id / 3) % 3, control);
        axis_rotation(&mut ops, id % 3, target);
    } else if id < 684 {
        let double = id >= 360;
        id -= if double { 360 } else { 36 };
        if (id / 81) % 2 != 0 {
            ops.push(gate(OpType::H, control));
        }
        if (id / 162) % 2 != 0 {
            ops.push(gate(OpType::H, target));
        }
        axis_rotation(&mut ops, (id / 27) % 3, control);
        axis_rotation(&mut ops, (id / 9) % 3, target);
        ops.push(cnot(control, target));
        if double {
            ops.push(cnot(target, control));
        }
        axis_rotation(&mut ops, (id / 3) % 3, control);
        axis_rotation(&mut ops, id % 3, target);
    } else {
        id -= 684;
        if (id / 9) % 2 != 0 {
            ops.push(gate(OpType::H, control));
        }
        if (id / 18) % 2 != 0 {
            ops.push(gate(OpType::H, target));
        }
        axis_rotation(&mut ops, (id / 3) % 3, control);
        axis_rotation(&mut ops, id % 3, target);
        ops.push(cnot(control, target));
        ops.push(cnot(target, control));
        ops.push(cnot(control, target));
    }

    pauli(&mut ops, pauli_idx % 4, control);
    pauli(&mut ops, pauli_idx / 4, target);
    CompoundOperation::new(ops)
}

impl QuantumComputation {
    /// Append the single-qubit Clifford with index `idx` as one compound operation.
    pub fn append_1q_clifford(&mut self, idx: u16, target: QubitId) {
        self.push(Operation::Compound(single_qubit_clifford(idx, target)));
    }

    /// Append the two-qubit Clifford with index `idx` as one compound operation.
    pub fn append_2q_clifford(&mut self, idx: u16, control: QubitId, target: QubitId) {
        self.push(Operation::Compound(two_qubit_clifford(idx, control, target)));
    }

    /// Build a brick-wall circuit of `depth` layers of random two-qubit Cliffords.
    ///
    /// Even layers act on `(0, 1), (2, 3), …`, odd layers on `(1, 2), (3, 4), …`.
    /// A single qubit receives one random single-qubit Clifford per layer, and
    /// two qubits receive one two-qubit Clifford per layer. Indices are drawn
    /// from the container's generator, so equal non-zero seeds give equal circuits.
    pub fn random_clifford_circuit(num_qubits: usize, depth: usize, seed: u64) -> Self {
        let mut qc = Self::with_seed(num_qubits, 0, seed);
        qc.set_name(format!("random_clifford_{num_qubits}"));

        for layer in 0..depth {
            match num_qubits {
                0 => break,
                1 => {
                    let idx = qc.rng.gen_range(0..NUM_2Q_CLIFFORDS);
                    qc.append_1q_clifford(idx, QubitId(0));
                }
                2 => {
                    let idx = qc.rng.gen_range(0..NUM_2Q_CLIFFORDS);
                    qc.append_2q_clifford(idx, QubitId(0), QubitId(1));
                }
                n => {
                    let start = layer % 2;
                    for i in (start..n - 1).step_by(2) {
                        let idx = qc.rng.gen_range(0..NUM_2Q_CLIFFORDS);
                        qc.append_2q_clifford(idx, QubitId::from(i), QubitId::from(i + 1));
                    }
                }
            }
        }
        qc
    }
}
