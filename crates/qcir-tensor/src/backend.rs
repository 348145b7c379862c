//! Contract with the numeric decision-diagram backend.
//!
//! The export pass never computes gate matrices itself. It hands a copy of
//! each gate, re-indexed onto local qubits `0..k`, to a backend and reads the
//! dense matrix back from the returned diagram.

use ndarray::Array2;
use num_complex::Complex64;
use qcir_ir::Operation;

use crate::error::TensorResult;

/// A built decision diagram for one operation.
pub trait DecisionDiagram {
    /// Dense row-major `2^n × 2^n` matrix of the diagram over `num_qubits` qubits.
    ///
    /// Local qubit 0 is the least significant bit of the row and column index.
    fn get_matrix(&self, num_qubits: usize) -> Array2<Complex64>;
}

/// Builds decision diagrams for operations expressed in a local qubit frame.
pub trait DecisionDiagramBackend {
    /// Diagram type produced by this backend.
    type Diagram: DecisionDiagram;

    /// Build the diagram of a unitary operation.
    fn build(&mut self, op: &Operation) -> TensorResult<Self::Diagram>;
}
