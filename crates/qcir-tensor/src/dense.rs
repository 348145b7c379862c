//! Dense reference backend.
//!
//! Builds full `2^k × 2^k` matrices instead of decision diagrams. Exponential
//! in the number of local qubits, which is fine for the handful of qubits a
//! single gate touches.
//!
//! Two-target gate matrices are written with `targets[0]` as the more
//! significant bit of the gate's own index.

use ndarray::{Array2, array};
use num_complex::Complex64;
use qcir_ir::{ControlKind, OpType, Operation};
use std::f64::consts::{FRAC_1_SQRT_2, PI};

use crate::backend::{DecisionDiagram, DecisionDiagramBackend};
use crate::error::{TensorError, TensorResult};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Backend producing dense matrices.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenseBackend;

impl DenseBackend {
    /// Create a dense backend.
    pub fn new() -> Self {
        Self
    }
}

/// A dense operator over its local qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseDiagram {
    num_qubits: usize,
    matrix: Array2<Complex64>,
}

impl DenseDiagram {
    /// Number of local qubits the operator acts on.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The operator over its own qubits.
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }
}

impl DecisionDiagram for DenseDiagram {
    /// Requests for fewer qubits than the operator spans return the full operator.
    fn get_matrix(&self, num_qubits: usize) -> Array2<Complex64> {
        if num_qubits <= self.num_qubits {
            return self.matrix.clone();
        }
        // identity on the additional, more significant qubits
        let dim = 1usize << self.num_qubits;
        let blocks = 1usize << (num_qubits - self.num_qubits);
        let mut full = Array2::zeros((dim * blocks, dim * blocks));
        for block in 0..blocks {
            let offset = block * dim;
            for ((r, c), value) in self.matrix.indexed_iter() {
                full[[offset + r, offset + c]] = *value;
            }
        }
        full
    }
}

impl DecisionDiagramBackend for DenseBackend {
    type Diagram = DenseDiagram;

    fn build(&mut self, op: &Operation) -> TensorResult<DenseDiagram> {
        let Operation::Standard(gate) = op else {
            return Err(TensorError::UnsupportedOperation(op.name()));
        };
        let unitary = gate_matrix(op.op_type(), gate.params())?;

        let num_qubits = op.used_qubits().last().map_or(0, |q| q.index() + 1);
        let targets: Vec<usize> = op.targets().iter().map(|q| q.index()).collect();
        let controls: Vec<(usize, bool)> = op
            .controls()
            .iter()
            .map(|c| (c.qubit.index(), c.kind == ControlKind::Pos))
            .collect();

        let dim = 1usize << num_qubits;
        let t = targets.len();
        let mut matrix = Array2::zeros((dim, dim));
        for col in 0..dim {
            let active = controls
                .iter()
                .all(|&(q, positive)| ((col >> q) & 1 == 1) == positive);
            if !active {
                matrix[[col, col]] = ONE;
                continue;
            }

            let sub_in = targets
                .iter()
                .enumerate()
                .fold(0, |acc, (j, &q)| acc | (((col >> q) & 1) << (t - 1 - j)));
            let cleared = targets.iter().fold(col, |acc, &q| acc & !(1 << q));
            for sub_out in 0..(1usize << t) {
                let row = targets.iter().enumerate().fold(cleared, |acc, (j, &q)| {
                    acc | (((sub_out >> (t - 1 - j)) & 1) << q)
                });
                matrix[[row, col]] = unitary[[sub_out, sub_in]];
            }
        }

        Ok(DenseDiagram { num_qubits, matrix })
    }
}

fn param(params: &[f64], i: usize) -> f64 {
    params.get(i).copied().unwrap_or(0.0)
}

fn u_matrix(theta: f64, phi: f64, lambda: f64) -> Array2<Complex64> {
    let c = (theta / 2.0).cos();
    let s = (theta / 2.0).sin();
    array![
        [Complex64::new(c, 0.0), -Complex64::from_polar(s, lambda)],
        [Complex64::from_polar(s, phi), Complex64::from_polar(c, phi + lambda)]
    ]
}

fn permutation(images: [usize; 4]) -> Array2<Complex64> {
    let mut m = Array2::zeros((4, 4));
    for (input, &output) in images.iter().enumerate() {
        m[[output, input]] = ONE;
    }
    m
}

/// Target-space matrix of a gate type.
pub fn gate_matrix(op_type: OpType, params: &[f64]) -> TensorResult<Array2<Complex64>> {
    let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
    let theta = param(params, 0);
    let (c, s) = ((theta / 2.0).cos(), (theta / 2.0).sin());

    let m = match op_type {
        OpType::I => array![[ONE, ZERO], [ZERO, ONE]],
        OpType::H => array![[h, h], [h, -h]],
        OpType::X => array![[ZERO, ONE], [ONE, ZERO]],
        OpType::Y => array![[ZERO, -I], [I, ZERO]],
        OpType::Z => array![[ONE, ZERO], [ZERO, -ONE]],
        OpType::S => array![[ONE, ZERO], [ZERO, I]],
        OpType::Sdg => array![[ONE, ZERO], [ZERO, -I]],
        OpType::T => array![[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, PI / 4.0)]],
        OpType::Tdg => array![[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, -PI / 4.0)]],
        OpType::V => array![[h, -I * h], [-I * h, h]],
        OpType::Vdg => array![[h, I * h], [I * h, h]],
        OpType::SX => {
            let (a, b) = (Complex64::new(0.5, 0.5), Complex64::new(0.5, -0.5));
            array![[a, b], [b, a]]
        }
        OpType::SXdg => {
            let (a, b) = (Complex64::new(0.5, -0.5), Complex64::new(0.5, 0.5));
            array![[a, b], [b, a]]
        }
        OpType::U => u_matrix(theta, param(params, 1), param(params, 2)),
        OpType::U2 => u_matrix(PI / 2.0, param(params, 0), param(params, 1)),
        OpType::P => array![[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, theta)]],
        OpType::RX => array![
            [Complex64::new(c, 0.0), Complex64::new(0.0, -s)],
            [Complex64::new(0.0, -s), Complex64::new(c, 0.0)]
        ],
        OpType::RY => array![
            [Complex64::new(c, 0.0), Complex64::new(-s, 0.0)],
            [Complex64::new(s, 0.0), Complex64::new(c, 0.0)]
        ],
        OpType::RZ => array![
            [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
            [ZERO, Complex64::from_polar(1.0, theta / 2.0)]
        ],

        OpType::SWAP => permutation([0, 2, 1, 3]),
        OpType::ISWAP | OpType::ISWAPdg => {
            let phase = if op_type == OpType::ISWAP { I } else { -I };
            let mut m = permutation([0, 2, 1, 3]);
            m[[1, 2]] = phase;
            m[[2, 1]] = phase;
            m
        }
        // |a b⟩ → |¬a, a ⊕ b⟩
        OpType::Peres => permutation([2, 3, 1, 0]),
        OpType::Peresdg => permutation([3, 2, 0, 1]),
        // |a b⟩ → |b, a ⊕ b⟩
        OpType::DCX => permutation([0, 3, 1, 2]),
        OpType::ECR => {
            let (one, i) = (ONE * h, I * h);
            array![
                [ZERO, one, ZERO, i],
                [one, ZERO, -i, ZERO],
                [ZERO, i, ZERO, one],
                [-i, ZERO, one, ZERO]
            ]
        }
        OpType::RXX => {
            let (d, o) = (Complex64::new(c, 0.0), Complex64::new(0.0, -s));
            array![
                [d, ZERO, ZERO, o],
                [ZERO, d, o, ZERO],
                [ZERO, o, d, ZERO],
                [o, ZERO, ZERO, d]
            ]
        }
        OpType::RYY => {
            let (d, o) = (Complex64::new(c, 0.0), Complex64::new(0.0, s));
            array![
                [d, ZERO, ZERO, o],
                [ZERO, d, -o, ZERO],
                [ZERO, -o, d, ZERO],
                [o, ZERO, ZERO, d]
            ]
        }
        OpType::RZZ => {
            let a = Complex64::from_polar(1.0, -theta / 2.0);
            let b = Complex64::from_polar(1.0, theta / 2.0);
            array![
                [a, ZERO, ZERO, ZERO],
                [ZERO, b, ZERO, ZERO],
                [ZERO, ZERO, b, ZERO],
                [ZERO, ZERO, ZERO, a]
            ]
        }
        OpType::RZX => {
            let (d, o) = (Complex64::new(c, 0.0), Complex64::new(0.0, s));
            array![
                [d, -o, ZERO, ZERO],
                [-o, d, ZERO, ZERO],
                [ZERO, ZERO, d, o],
                [ZERO, ZERO, o, d]
            ]
        }
        OpType::XXminusYY => {
            let beta = param(params, 1);
            let d = Complex64::new(c, 0.0);
            let upper = Complex64::new(0.0, -s) * Complex64::from_polar(1.0, -beta);
            let lower = Complex64::new(0.0, -s) * Complex64::from_polar(1.0, beta);
            array![
                [d, ZERO, ZERO, upper],
                [ZERO, ONE, ZERO, ZERO],
                [ZERO, ZERO, ONE, ZERO],
                [lower, ZERO, ZERO, d]
            ]
        }
        OpType::XXplusYY => {
            let beta = param(params, 1);
            let d = Complex64::new(c, 0.0);
            let upper = Complex64::new(0.0, -s) * Complex64::from_polar(1.0, -beta);
            let lower = Complex64::new(0.0, -s) * Complex64::from_polar(1.0, beta);
            array![
                [ONE, ZERO, ZERO, ZERO],
                [ZERO, d, upper, ZERO],
                [ZERO, lower, d, ZERO],
                [ZERO, ZERO, ZERO, ONE]
            ]
        }

        other => return Err(TensorError::UnsupportedOperation(other.name().to_string())),
    };
    Ok(m)
}
