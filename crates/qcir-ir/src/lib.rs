//! Quantum circuit intermediate representation
//!
//! This crate provides the core data structures for representing quantum
//! programs: an ordered sequence of operations over qubit and classical-bit
//! registers, together with the logical/physical qubit bookkeeping that
//! layout transformations depend on.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`], and [`Control`]
//!   with positive or negative polarity
//! - **Parameters**: [`SymbolOrNumber`] and linear [`Expression`]s over
//!   [`Variable`]s for parameterized circuits
//! - **Operations**: [`Operation`] with standard, symbolic, non-unitary,
//!   classic-controlled and compound variants, tagged by [`OpType`]
//! - **Registers**: [`Register`] and the [`register`] algebra that keeps
//!   register maps tiled as qubits come and go
//! - **Circuit**: [`QuantumComputation`], the container with layouts,
//!   ancilla/garbage flags and a gate-emission API
//! - **Graph**: [`Graph`], a labeled undirected graph for coupling maps
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qcir_ir::{QuantumComputation, QubitId};
//!
//! let mut qc = QuantumComputation::with_size(2, 0);
//! qc.h(QubitId(0)).unwrap();
//! qc.cx(QubitId(0), QubitId(1)).unwrap();
//! qc.measure_all(true).unwrap();
//!
//! assert_eq!(qc.num_qubits(), 2);
//! assert_eq!(qc.num_classical_bits(), 2);
//! assert!(!qc.is_dynamic());
//! ```
//!
//! # Example: Parameterized Circuit
//!
//! ```rust
//! use qcir_ir::{QuantumComputation, QubitId, Variable, VariableAssignment};
//! use std::f64::consts::PI;
//!
//! let mut qc = QuantumComputation::with_size(1, 0);
//! qc.rx(Variable::new("theta"), QubitId(0)).unwrap();
//! assert!(!qc.is_variable_free());
//!
//! let mut assignment = VariableAssignment::default();
//! assignment.insert(Variable::new("theta"), PI / 4.0);
//! qc.instantiate_inplace(&assignment);
//!
//! // Every variable is bound, but the operation stays symbolic.
//! assert!(qc.variables().is_empty());
//! assert!(!qc.is_variable_free());
//! ```

pub mod computation;
pub mod config;
pub mod error;
pub mod gates;
pub mod graph;
pub mod op_type;
pub mod operation;
pub mod parameter;
pub mod qubit;
pub mod random_clifford;
pub mod register;

pub use computation::{CircuitStats, QuantumComputation};
pub use config::CircuitConfig;
pub use error::{IrError, IrResult};
pub use graph::Graph;
pub use op_type::OpType;
pub use operation::{
    ClassicControlledOperation, ComparisonKind, CompoundOperation, NonUnitaryOperation,
    Operation, StandardOperation, SymbolicOperation,
};
pub use parameter::{Expression, SymbolOrNumber, Term, Variable, VariableAssignment};
pub use qubit::{ClbitId, Control, ControlKind, Controls, Permutation, QubitId};
pub use register::{Register, RegisterMap};
