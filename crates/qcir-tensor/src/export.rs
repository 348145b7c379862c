//! Tensor-network export.
//!
//! Every unitary gate becomes one JSON record
//!
//! ```text
//! [tags, legs, shape, data]
//! ```
//!
//! - `tags`: the gate name, `"Q<n>"` for each control then each target, and
//!   `"GATE<i>"` with the running gate ordinal.
//! - `legs`: input leg names followed by output leg names, one per touched
//!   qubit in descending qubit order. Leg `q<n>_<k>` is the `k`-th wire
//!   segment of qubit `n`, so consecutive gates on a qubit share a leg.
//! - `shape`: `2, 2` per touched qubit.
//! - `data`: the row-major gate matrix as `[re, im]` pairs.

use qcir_ir::{Control, IrError, OpType, Operation, QuantumComputation, QubitId, StandardOperation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use tracing::{debug, info};

use crate::backend::{DecisionDiagram, DecisionDiagramBackend};
use crate::error::{TensorError, TensorResult};

/// Options for [`dump_tensor_network`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Wrap the records in `{"tensors": [ ... ]}`.
    pub envelope: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { envelope: true }
    }
}

impl ExportOptions {
    /// Set whether the records are wrapped in the `tensors` envelope.
    #[must_use]
    pub fn with_envelope(mut self, envelope: bool) -> Self {
        self.envelope = envelope;
        self
    }
}

/// One serialized tensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorRecord(
    /// Tags.
    pub Vec<String>,
    /// Input legs followed by output legs.
    pub Vec<String>,
    /// Dimensions.
    pub Vec<usize>,
    /// Row-major matrix entries as `[re, im]`.
    pub Vec<[f64; 2]>,
);

#[derive(Debug, Clone, Copy)]
enum Role {
    Control(Control),
    Target,
}

/// Write the tensor records of `op`.
///
/// `inds` holds the next leg counter of every qubit and `gate_idx` the next
/// gate ordinal; both advance by the records written. A `",\n"` separator
/// precedes every record except the one with ordinal 0. Barriers are skipped
/// silently and measurements with a log message; any other non-gate fails.
pub fn dump_tensor<W, B>(
    op: &Operation,
    writer: &mut W,
    inds: &mut [usize],
    gate_idx: &mut usize,
    backend: &mut B,
) -> TensorResult<()>
where
    W: Write,
    B: DecisionDiagramBackend,
{
    match op {
        Operation::Standard(_) if op.op_type() == OpType::Barrier => Ok(()),
        Operation::Standard(gate) => {
            let record = tensor_record(op, gate, inds, *gate_idx, backend)?;
            if *gate_idx != 0 {
                writer.write_all(b",\n")?;
            }
            serde_json::to_writer(&mut *writer, &record)?;
            debug!("exported {} as GATE{}", op.name(), gate_idx);
            *gate_idx += 1;
            Ok(())
        }
        Operation::Compound(compound) => {
            for child in compound.ops() {
                dump_tensor(child, writer, inds, gate_idx, backend)?;
            }
            Ok(())
        }
        Operation::NonUnitary(_) if op.op_type() == OpType::Measure => {
            info!("skipping measurement on {:?} in tensor dump", op.targets());
            Ok(())
        }
        _ => Err(TensorError::UnsupportedOperation(op.name())),
    }
}

fn tensor_record<B: DecisionDiagramBackend>(
    op: &Operation,
    gate: &StandardOperation,
    inds: &mut [usize],
    gate_idx: usize,
    backend: &mut B,
) -> TensorResult<TensorRecord> {
    let name = op.name();

    let mut tags = Vec::with_capacity(2 + op.controls().len() + op.targets().len());
    tags.push(name.clone());
    let mut ordered: BTreeMap<QubitId, Role> = BTreeMap::new();
    for &control in op.controls() {
        ordered.insert(control.qubit, Role::Control(control));
        tags.push(format!("Q{}", control.qubit.0));
    }
    for &target in op.targets() {
        ordered.insert(target, Role::Target);
        tags.push(format!("Q{}", target.0));
    }
    tags.push(format!("GATE{gate_idx}"));

    // Validate every counter before touching any of them.
    for &qubit in ordered.keys() {
        if qubit.index() >= inds.len() {
            return Err(IrError::QubitOutOfRange {
                qubit,
                num_qubits: inds.len(),
                gate_name: Some(name),
            }
            .into());
        }
    }

    let mut legs_in = Vec::with_capacity(ordered.len());
    let mut legs_out = Vec::with_capacity(ordered.len());
    for &qubit in ordered.keys().rev() {
        let counter = &mut inds[qubit.index()];
        legs_in.push(format!("q{}_{}", qubit.0, *counter));
        *counter += 1;
        legs_out.push(format!("q{}_{}", qubit.0, *counter));
    }
    legs_in.extend(legs_out);

    let local_qubits = ordered.len();
    let shape = vec![2; 2 * local_qubits];

    // Local frame: rank of each qubit in ascending order. Target order is kept.
    let rank: BTreeMap<QubitId, QubitId> = ordered
        .keys()
        .enumerate()
        .map(|(i, &q)| (q, QubitId::from(i)))
        .collect();
    let local_controls = ordered
        .iter()
        .filter_map(|(q, role)| match role {
            Role::Control(c) => Some(Control {
                qubit: rank[q],
                kind: c.kind,
            }),
            Role::Target => None,
        })
        .collect();
    let local_targets = op.targets().iter().map(|q| rank[q]).collect();
    let local = Operation::Standard(StandardOperation::new(
        op.op_type(),
        local_controls,
        local_targets,
        gate.params().to_vec(),
    ));

    let diagram = backend.build(&local)?;
    let matrix = diagram.get_matrix(local_qubits);
    let data = matrix.iter().map(|z| [z.re, z.im]).collect();

    Ok(TensorRecord(tags, legs_in, shape, data))
}

/// Export a whole computation.
///
/// Leg counters start at zero for every qubit. Returns the number of tensor
/// records written.
pub fn dump_tensor_network<W, B>(
    qc: &QuantumComputation,
    writer: &mut W,
    backend: &mut B,
    options: ExportOptions,
) -> TensorResult<usize>
where
    W: Write,
    B: DecisionDiagramBackend,
{
    let width = qc
        .highest_physical_qubit_index()
        .map_or(0, |q| q.index() + 1)
        .max(qc.num_total_qubits());
    let mut inds = vec![0; width];
    let mut gate_idx = 0;

    if options.envelope {
        writer.write_all(b"{\"tensors\": [\n")?;
    }
    for op in qc {
        dump_tensor(op, writer, &mut inds, &mut gate_idx, backend)?;
    }
    if options.envelope {
        writer.write_all(b"\n]}\n")?;
    }
    info!("exported {} tensors for {} qubits", gate_idx, width);
    Ok(gate_idx)
}
