//! Tensor export against the dense backend.

use ndarray::Array2;
use num_complex::Complex64;
use proptest::prelude::*;
use qcir_ir::{Control, OpType, Operation, QuantumComputation, QubitId};
use qcir_tensor::{
    DecisionDiagram, DecisionDiagramBackend, DenseBackend, ExportOptions, TensorError,
    TensorRecord, TensorResult, dump_tensor_network,
};

fn export(qc: &QuantumComputation) -> Vec<TensorRecord> {
    let mut out = Vec::new();
    dump_tensor_network(qc, &mut out, &mut DenseBackend::new(), ExportOptions::default()).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    serde_json::from_value(value["tensors"].clone()).unwrap()
}

#[test]
fn test_single_qubit_gate_record() {
    let mut qc = QuantumComputation::with_size(1, 0);
    qc.ry(0.7, QubitId(0)).unwrap();

    let records = export(&qc);
    assert_eq!(records.len(), 1);
    let TensorRecord(tags, legs, shape, data) = &records[0];
    assert_eq!(tags, &["ry", "Q0", "GATE0"]);
    assert_eq!(legs, &["q0_0", "q0_1"]);
    assert_eq!(shape, &[2, 2]);
    assert_eq!(data.len(), 4);
    assert!((data[0][0] - (0.35_f64).cos()).abs() < 1e-15);
}

#[test]
fn test_floats_round_trip_exactly() {
    let mut qc = QuantumComputation::with_size(1, 0);
    qc.p(1.0 / 3.0, QubitId(0)).unwrap();

    let records = export(&qc);
    let phase = Complex64::from_polar(1.0, 1.0 / 3.0);
    assert_eq!(records[0].3[3], [phase.re, phase.im]);
}

#[test]
fn test_legs_are_descending_and_shared() {
    let mut qc = QuantumComputation::with_size(3, 0);
    qc.ccx(QubitId(2), QubitId(0), QubitId(1)).unwrap();
    qc.h(QubitId(1)).unwrap();

    let records = export(&qc);
    assert_eq!(records[0].0, vec!["ccx", "Q0", "Q2", "Q1", "GATE0"]);
    assert_eq!(records[0].1, vec!["q2_0", "q1_0", "q0_0", "q2_1", "q1_1", "q0_1"]);
    assert_eq!(records[0].2, vec![2; 6]);
    assert_eq!(records[0].3.len(), 64);
    assert_eq!(records[1].1, vec!["q1_1", "q1_2"]);
}

#[test]
fn test_negative_control_local_frame() {
    let mut qc = QuantumComputation::with_size(3, 0);
    qc.mcx([Control::neg(QubitId(2))].into_iter().collect(), QubitId(0))
        .unwrap();

    let records = export(&qc);
    let data = &records[0].3;
    // local frame: q0 → 0 (target), q2 → 1 (negative control)
    let entry = |row: usize, col: usize| data[row * 4 + col];
    assert_eq!(entry(1, 0), [1.0, 0.0]);
    assert_eq!(entry(0, 1), [1.0, 0.0]);
    assert_eq!(entry(2, 2), [1.0, 0.0]);
    assert_eq!(entry(3, 3), [1.0, 0.0]);
}

#[test]
fn test_symbolic_gate_is_rejected() {
    let mut qc = QuantumComputation::with_size(1, 0);
    qc.rz(qcir_ir::Variable::new("theta"), QubitId(0)).unwrap();

    let mut out = Vec::new();
    let mut backend = DenseBackend::new();
    let result = dump_tensor_network(&qc, &mut out, &mut backend, ExportOptions::default());
    assert!(matches!(result, Err(TensorError::UnsupportedOperation(_))));
}

/// Records the local operations it is asked to build.
#[derive(Default)]
struct RecordingBackend {
    seen: Vec<Operation>,
}

struct Identity(usize);

impl DecisionDiagram for Identity {
    fn get_matrix(&self, num_qubits: usize) -> Array2<Complex64> {
        let n = num_qubits.max(self.0);
        Array2::eye(1 << n)
    }
}

impl DecisionDiagramBackend for RecordingBackend {
    type Diagram = Identity;

    fn build(&mut self, op: &Operation) -> TensorResult<Identity> {
        self.seen.push(op.clone());
        Ok(Identity(op.used_qubits().len()))
    }
}

#[test]
fn test_backend_receives_local_frame() {
    let mut qc = QuantumComputation::with_size(6, 0);
    qc.ecr(QubitId(5), QubitId(3)).unwrap();
    qc.cp(0.25, QubitId(4), QubitId(1)).unwrap();

    let mut backend = RecordingBackend::default();
    let mut out = Vec::new();
    let n = dump_tensor_network(&qc, &mut out, &mut backend, ExportOptions::default()).unwrap();
    assert_eq!(n, 2);

    // target order survives re-indexing
    assert_eq!(backend.seen[0].op_type(), OpType::ECR);
    assert_eq!(backend.seen[0].targets(), &[QubitId(1), QubitId(0)]);
    assert_eq!(backend.seen[1].targets(), &[QubitId(0)]);
    assert!(backend.seen[1].controls().contains(&Control::pos(QubitId(1))));
}

proptest! {
    #[test]
    fn exported_rotations_are_unitary(theta in -10.0_f64..10.0, kind in 0_usize..4) {
        let mut qc = QuantumComputation::with_size(2, 0);
        match kind {
            0 => qc.rx(theta, QubitId(0)),
            1 => qc.crz(theta, QubitId(1), QubitId(0)),
            2 => qc.rzz(theta, QubitId(0), QubitId(1)),
            _ => qc.xx_plus_yy(theta, 0.5, QubitId(1), QubitId(0)),
        }
        .unwrap();

        let records = export(&qc);
        let TensorRecord(_, _, shape, data) = &records[0];
        let dim = 1usize << (shape.len() / 2);
        prop_assert_eq!(data.len(), dim * dim);

        let m = Array2::from_shape_fn((dim, dim), |(r, c)| {
            let [re, im] = data[r * dim + c];
            Complex64::new(re, im)
        });
        let product = m.dot(&m.t().mapv(|z| z.conj()));
        for ((r, c), z) in product.indexed_iter() {
            let expected = if r == c { 1.0 } else { 0.0 };
            prop_assert!((z.re - expected).abs() < 1e-9 && z.im.abs() < 1e-9);
        }
    }
}
