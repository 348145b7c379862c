//! Tensor-network export for quantum circuits
//!
//! Linearizes a [`QuantumComputation`](qcir_ir::QuantumComputation),
//! including nested compound operations, into a list of indexed tensors that
//! tensor-network tooling can contract. The numeric content of every gate is
//! delegated to a [`DecisionDiagramBackend`]; [`DenseBackend`] is a reference
//! implementation built on dense matrices.
//!
//! # Example
//!
//! ```rust
//! use qcir_ir::{QuantumComputation, QubitId};
//! use qcir_tensor::{DenseBackend, ExportOptions, dump_tensor_network};
//!
//! let mut qc = QuantumComputation::with_size(2, 0);
//! qc.h(QubitId(0)).unwrap();
//! qc.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let mut out = Vec::new();
//! let n = dump_tensor_network(&qc, &mut out, &mut DenseBackend::new(), ExportOptions::default())
//!     .unwrap();
//! assert_eq!(n, 2);
//! ```

pub mod backend;
pub mod dense;
pub mod error;
pub mod export;

pub use backend::{DecisionDiagram, DecisionDiagramBackend};
pub use dense::{DenseBackend, DenseDiagram, gate_matrix};
pub use error::{TensorError, TensorResult};
pub use export::{ExportOptions, TensorRecord, dump_tensor, dump_tensor_network};
