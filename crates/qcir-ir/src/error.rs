//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit index beyond the current number of qubits.
    #[error("Qubit {qubit} out of range ({num_qubits} qubits){}", format_gate_context(.gate_name))]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Total number of qubits at the time of the call.
        num_qubits: usize,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Classical bit index beyond the current number of bits.
    #[error("Classical bit {clbit} out of range ({num_clbits} bits){}", format_gate_context(.gate_name))]
    ClbitOutOfRange {
        /// The offending bit.
        clbit: ClbitId,
        /// Total number of classical bits at the time of the call.
        num_clbits: usize,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Classical register does not fit into the classical bits.
    #[error("Classical register [{start}, {start}+{size}) exceeds {num_clbits} classical bits")]
    ClassicalRegisterOutOfRange {
        /// First bit of the register.
        start: u32,
        /// Number of bits in the register.
        size: u32,
        /// Total number of classical bits.
        num_clbits: usize,
    },

    /// Logical qubit not present in the initial layout.
    #[error("Logical qubit {0} not found in initial layout")]
    LogicalQubitNotFound(QubitId),

    /// Physical qubit not covered by any quantum or ancillary register.
    #[error("Physical qubit {0} is not part of any register")]
    PhysicalQubitNotInRegister(QubitId),

    /// Physical qubit already assigned in the initial layout or output permutation.
    #[error("Physical qubit {0} is already assigned")]
    PhysicalQubitOccupied(QubitId),

    /// Logical qubit index too large to be inserted.
    #[error("Cannot add logical qubit {logical}: only {num_qubits} qubits present")]
    LogicalQubitTooLarge {
        /// Requested logical index.
        logical: QubitId,
        /// Current number of (non-ancillary) qubits.
        num_qubits: usize,
    },

    /// Register with this name does not exist.
    #[error("Register '{0}' not found")]
    RegisterNotFound(String),

    /// Register with this name already exists and cannot be extended.
    #[error("Register '{0}' already exists")]
    DuplicateRegister(String),

    /// Index is not inside the named register.
    #[error("Index {index} is not part of register '{register}' [{start}, {start}+{size})")]
    IndexOutsideRegister {
        /// Name of the register.
        register: String,
        /// Requested index.
        index: u32,
        /// First index of the register.
        start: u32,
        /// Size of the register.
        size: u32,
    },

    /// Quantum registers must be added before any ancillary register.
    #[error("Cannot add quantum register '{0}' after ancillary qubits were added")]
    AncillaePresent(String),

    /// Not enough classical bits for the requested measurements.
    #[error("Not enough classical bits: {required} required, {available} available")]
    InsufficientClassicalBits {
        /// Bits required.
        required: usize,
        /// Bits present.
        available: usize,
    },

    /// Qubit and classical bit lists of a measurement differ in length.
    #[error("Measurement of {qubits} qubits into {clbits} classical bits")]
    MeasurementArityMismatch {
        /// Number of qubits.
        qubits: usize,
        /// Number of classical bits.
        clbits: usize,
    },

    /// Gate requires a different number of target qubits.
    #[error("Gate '{gate_name}' requires {expected} targets, got {got}")]
    TargetCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of targets.
        expected: usize,
        /// Actual number of targets provided.
        got: usize,
    },

    /// Gate requires a different number of parameters.
    #[error("Gate '{gate_name}' requires {expected} parameters, got {got}")]
    ParameterCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of parameters.
        expected: usize,
        /// Actual number of parameters provided.
        got: usize,
    },

    /// Operation type cannot be used in this position.
    #[error("Operation '{0}' is not a unitary gate")]
    NotAGate(String),

    /// Unknown operation name.
    #[error("Unknown operation '{0}'")]
    UnknownOperation(String),

    /// Qubit range with lower bound above upper bound.
    #[error("Invalid qubit range [{lo}, {hi}]")]
    InvalidRange {
        /// Lower bound.
        lo: QubitId,
        /// Upper bound.
        hi: QubitId,
    },

    /// Vertex already present in a graph.
    #[error("The vertex {0} is already in the graph")]
    DuplicateVertex(String),

    /// Vertex not present in a graph.
    #[error("The vertex {0} is not in the graph")]
    VertexNotFound(String),

    /// Edge not present in a graph.
    #[error("The edge ({0}, {1}) does not exist")]
    EdgeNotFound(String, String),
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
