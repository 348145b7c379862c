//! The circuit container.
//!
//! A [`QuantumComputation`] owns an ordered list of [`Operation`]s together
//! with the bookkeeping needed to move between logical and physical qubits:
//! named registers, the initial layout, the output permutation and the
//! ancillary/garbage flags of every logical qubit.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt;
use std::io;
use std::ops::{Index, IndexMut, RangeBounds};
use tracing::{debug, warn};

use crate::config::CircuitConfig;
use crate::error::{IrError, IrResult};
use crate::op_type::OpType;
use crate::operation::{CompoundOperation, NonUnitaryOperation, Operation};
use crate::parameter::{Variable, VariableAssignment};
use crate::qubit::{ClbitId, Permutation, QubitId};
use crate::register::{self, Register, RegisterMap};

/// Phases beyond this many turns are reduced with `rem_euclid` before stepping.
const MAX_PHASE_STEPS: f64 = 1024.0;

/// Convert a count or index to the `u32` used by identifiers.
pub(crate) fn index_u32(i: usize) -> u32 {
    u32::try_from(i).expect("qubit index exceeds u32::MAX")
}

/// A quantum program: operations plus register and layout bookkeeping.
#[derive(Debug, Clone)]
pub struct QuantumComputation {
    name: String,
    ops: Vec<Operation>,
    nqubits: usize,
    nclassics: usize,
    nancillae: usize,
    qregs: RegisterMap,
    cregs: RegisterMap,
    ancregs: RegisterMap,
    initial_layout: Permutation,
    output_permutation: Permutation,
    ancillary: Vec<bool>,
    garbage: Vec<bool>,
    occurring_variables: FxHashSet<Variable>,
    global_phase: f64,
    qreg_name: String,
    ancreg_name: String,
    seed: u64,
    pub(crate) rng: SmallRng,
}

impl Default for QuantumComputation {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary counts of a computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitStats {
    /// Circuit name.
    pub name: String,
    /// Non-ancillary qubits.
    pub num_qubits: usize,
    /// Ancillary qubits.
    pub num_ancillae: usize,
    /// Classical bits.
    pub num_classical_bits: usize,
    /// Top-level operations.
    pub num_ops: usize,
    /// Operations counted through compounds.
    pub num_individual_ops: usize,
    /// Single-qubit gates.
    pub num_single_qubit_ops: usize,
    /// Circuit depth.
    pub depth: usize,
    /// Global phase in `[0, 2π)`.
    pub global_phase: f64,
    /// Occurrences of each operation name.
    pub op_counts: BTreeMap<String, usize>,
}

impl QuantumComputation {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Create an empty computation without registers.
    pub fn new() -> Self {
        Self::from_config(&CircuitConfig::default())
    }

    /// Create a computation with one quantum and one classical register.
    pub fn with_size(num_qubits: usize, num_clbits: usize) -> Self {
        Self::with_seed(num_qubits, num_clbits, 0)
    }

    /// Like [`with_size`](Self::with_size) with a fixed random seed.
    pub fn with_seed(num_qubits: usize, num_clbits: usize, seed: u64) -> Self {
        Self::from_config(
            &CircuitConfig::default()
                .with_num_qubits(num_qubits)
                .with_num_clbits(num_clbits)
                .with_seed(seed),
        )
    }

    /// Create a computation from a configuration.
    pub fn from_config(config: &CircuitConfig) -> Self {
        let seed = if config.seed == 0 {
            rand::random()
        } else {
            config.seed
        };
        let mut qc = Self {
            name: config.name.clone(),
            ops: vec![],
            nqubits: 0,
            nclassics: 0,
            nancillae: 0,
            qregs: RegisterMap::new(),
            cregs: RegisterMap::new(),
            ancregs: RegisterMap::new(),
            initial_layout: Permutation::new(),
            output_permutation: Permutation::new(),
            ancillary: vec![],
            garbage: vec![],
            occurring_variables: FxHashSet::default(),
            global_phase: 0.0,
            qreg_name: config.qreg_name.clone(),
            ancreg_name: config.ancreg_name.clone(),
            seed,
            rng: SmallRng::seed_from_u64(seed),
        };
        if config.num_qubits > 0 {
            qc.insert_qubit_register(config.num_qubits, &config.qreg_name);
        }
        if config.num_clbits > 0 {
            qc.cregs.insert(
                config.creg_name.clone(),
                Register::new(0, index_u32(config.num_clbits)),
            );
            qc.nclassics = config.num_clbits;
        }
        qc
    }

    /// Wrap the children of a compound operation into a computation.
    ///
    /// The qubit count is one more than the highest qubit used, the
    /// classical bit count one more than the highest bit measured into.
    pub fn from_compound_operation(op: CompoundOperation) -> Self {
        fn highest_clbit(op: &Operation) -> Option<u32> {
            match op {
                Operation::NonUnitary(m) => m.clbits().iter().map(|c| c.0).max(),
                Operation::Compound(c) => c.ops().iter().filter_map(highest_clbit).max(),
                _ => None,
            }
        }

        let num_qubits = op
            .ops()
            .iter()
            .filter_map(|o| o.used_qubits().last().map(|q| q.index() + 1))
            .max()
            .unwrap_or(0);
        let num_clbits = op
            .ops()
            .iter()
            .filter_map(highest_clbit)
            .max()
            .map_or(0, |c| c as usize + 1);

        let mut qc = Self::with_size(num_qubits, num_clbits);
        for child in op.into_ops() {
            qc.push(child);
        }
        qc
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Name of the computation.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the computation.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Number of non-ancillary qubits.
    pub fn num_qubits(&self) -> usize {
        self.nqubits
    }

    /// Number of ancillary qubits.
    pub fn num_ancillae(&self) -> usize {
        self.nancillae
    }

    /// Qubits including ancillae.
    pub fn num_total_qubits(&self) -> usize {
        self.nqubits + self.nancillae
    }

    /// Number of classical bits.
    pub fn num_classical_bits(&self) -> usize {
        self.nclassics
    }

    /// Quantum registers.
    pub fn qregs(&self) -> &RegisterMap {
        &self.qregs
    }

    /// Classical registers.
    pub fn cregs(&self) -> &RegisterMap {
        &self.cregs
    }

    /// Ancillary registers.
    pub fn ancregs(&self) -> &RegisterMap {
        &self.ancregs
    }

    /// Ancillary flag per logical qubit.
    pub fn ancillary(&self) -> &[bool] {
        &self.ancillary
    }

    /// Garbage flag per logical qubit.
    pub fn garbage(&self) -> &[bool] {
        &self.garbage
    }

    /// Physical → logical mapping at the start of the program.
    pub fn initial_layout(&self) -> &Permutation {
        &self.initial_layout
    }

    /// Mutable initial layout.
    pub fn initial_layout_mut(&mut self) -> &mut Permutation {
        &mut self.initial_layout
    }

    /// Physical → logical mapping at the end of the program.
    pub fn output_permutation(&self) -> &Permutation {
        &self.output_permutation
    }

    /// Mutable output permutation.
    pub fn output_permutation_mut(&mut self) -> &mut Permutation {
        &mut self.output_permutation
    }

    /// Global phase in `[0, 2π)`.
    pub fn global_phase(&self) -> f64 {
        self.global_phase
    }

    /// Seed of the per-circuit random generator.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Reseed the per-circuit random generator.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = SmallRng::seed_from_u64(seed);
    }

    /// Symbolic variables referenced by operations, sorted by name.
    pub fn variables(&self) -> Vec<&Variable> {
        let mut vars: Vec<_> = self.occurring_variables.iter().collect();
        vars.sort();
        vars
    }

    /// True if no operation is symbolic.
    ///
    /// Instantiation does not reclassify symbolic operations, so this stays
    /// false after every variable is bound. [`variables`](Self::variables)
    /// lists the ones still unbound.
    pub fn is_variable_free(&self) -> bool {
        fn symbolic(op: &Operation) -> bool {
            match op {
                Operation::Symbolic(_) => true,
                Operation::Compound(c) => c.ops().iter().any(symbolic),
                Operation::ClassicControlled(cc) => symbolic(cc.operation()),
                _ => false,
            }
        }
        !self.ops.iter().any(symbolic)
    }

    // =========================================================================
    // Global phase
    // =========================================================================

    /// Add `angle` to the global phase, keeping it in `[0, 2π)`.
    pub fn gphase(&mut self, angle: f64) {
        if !angle.is_finite() {
            warn!("ignoring non-finite global phase {}", angle);
            return;
        }
        self.global_phase += angle;
        // Stepping by 2π stalls once the step drops below an ulp of the phase.
        if self.global_phase.abs() >= MAX_PHASE_STEPS * 2.0 * PI {
            self.global_phase = self.global_phase.rem_euclid(2.0 * PI);
        }
        while self.global_phase < 0.0 {
            self.global_phase += 2.0 * PI;
        }
        while self.global_phase >= 2.0 * PI {
            self.global_phase -= 2.0 * PI;
        }
    }

    // =========================================================================
    // Registers
    // =========================================================================

    fn insert_qubit_register(&mut self, n: usize, name: &str) {
        let total = self.num_total_qubits();
        match self.qregs.get_mut(name) {
            Some(reg) => reg.size += index_u32(n),
            None => {
                self.qregs
                    .insert(name.to_string(), Register::new(index_u32(total), index_u32(n)));
            }
        }
        for i in total..total + n {
            let q = QubitId::from(i);
            self.initial_layout.insert(q, q);
            self.output_permutation.insert(q, q);
        }
        self.nqubits += n;
        self.ancillary.resize(total + n, false);
        self.garbage.resize(total + n, false);
    }

    /// Add `n` qubits under register `name`.
    ///
    /// An existing register may only be extended if it ends at the current
    /// qubit count. Fails once ancillary qubits are present.
    pub fn add_qubit_register(&mut self, n: usize, name: &str) -> IrResult<&mut Self> {
        if self.nancillae > 0 {
            return Err(IrError::AncillaePresent(name.to_string()));
        }
        if let Some(reg) = self.qregs.get(name) {
            if reg.end() as usize != self.num_total_qubits() {
                return Err(IrError::DuplicateRegister(name.to_string()));
            }
        }
        if n > 0 {
            self.insert_qubit_register(n, name);
        }
        Ok(self)
    }

    /// Add `n` classical bits under register `name`.
    pub fn add_classical_register(&mut self, n: usize, name: &str) -> IrResult<&mut Self> {
        if self.cregs.contains_key(name) {
            return Err(IrError::DuplicateRegister(name.to_string()));
        }
        if n > 0 {
            self.cregs.insert(
                name.to_string(),
                Register::new(index_u32(self.nclassics), index_u32(n)),
            );
            self.nclassics += n;
        }
        Ok(self)
    }

    /// Add `n` ancillary qubits under register `name`.
    pub fn add_ancillary_register(&mut self, n: usize, name: &str) -> IrResult<&mut Self> {
        let total = self.num_total_qubits();
        if let Some(reg) = self.ancregs.get(name) {
            if reg.end() as usize != total {
                return Err(IrError::DuplicateRegister(name.to_string()));
            }
        }
        if n == 0 {
            return Ok(self);
        }
        match self.ancregs.get_mut(name) {
            Some(reg) => reg.size += index_u32(n),
            None => {
                self.ancregs
                    .insert(name.to_string(), Register::new(index_u32(total), index_u32(n)));
            }
        }
        for i in total..total + n {
            let q = QubitId::from(i);
            self.initial_layout.insert(q, q);
            self.output_permutation.insert(q, q);
        }
        self.nancillae += n;
        self.ancillary.resize(total + n, true);
        self.garbage.resize(total + n, false);
        Ok(self)
    }

    /// Replace all quantum and ancillary registers by one register spanning every qubit.
    ///
    /// Ancillary qubits are counted as regular qubits afterwards.
    pub fn unify_quantum_registers(&mut self, name: &str) {
        self.ancregs.clear();
        self.qregs.clear();
        self.nqubits += self.nancillae;
        self.nancillae = 0;
        if self.nqubits > 0 {
            self.qregs
                .insert(name.to_string(), Register::new(0, index_u32(self.nqubits)));
        }
    }

    /// Flat table: physical qubit → `(register, "reg[i]")`, ancillae included.
    pub fn qubit_register_names(&self) -> BTreeMap<u32, (String, String)> {
        let mut names = register::register_names(&self.qregs);
        names.extend(register::register_names(&self.ancregs));
        names
    }

    /// Flat table: classical bit → `(register, "reg[i]")`.
    pub fn classical_register_names(&self) -> BTreeMap<u32, (String, String)> {
        register::register_names(&self.cregs)
    }

    /// Register and local index of a physical qubit.
    pub fn qubit_register_and_index(&self, physical: QubitId) -> IrResult<(&str, u32)> {
        register::register_and_index(&self.qregs, physical.0)
            .or_else(|| register::register_and_index(&self.ancregs, physical.0))
            .ok_or(IrError::PhysicalQubitNotInRegister(physical))
    }

    /// Register and local index of a classical bit.
    pub fn classical_register_and_index(&self, bit: ClbitId) -> IrResult<(&str, u32)> {
        register::register_and_index(&self.cregs, bit.0).ok_or(IrError::ClbitOutOfRange {
            clbit: bit,
            num_clbits: self.nclassics,
            gate_name: None,
        })
    }

    // =========================================================================
    // Layout queries
    // =========================================================================

    /// Physical qubit that holds `logical` in the initial layout, if any.
    pub fn contains_logical_qubit(&self, logical: QubitId) -> Option<QubitId> {
        self.initial_layout
            .iter()
            .find(|&(_, &l)| l == logical)
            .map(|(&p, _)| p)
    }

    /// Physical qubit that holds `logical` in the initial layout.
    pub fn physical_qubit_index(&self, logical: QubitId) -> IrResult<QubitId> {
        self.contains_logical_qubit(logical)
            .ok_or(IrError::LogicalQubitNotFound(logical))
    }

    /// True if `physical` belongs to an ancillary register.
    pub fn physical_qubit_is_ancillary(&self, physical: QubitId) -> bool {
        self.ancregs.values().any(|r| r.contains(physical.0))
    }

    /// True if logical qubit `logical` is flagged ancillary.
    pub fn logical_qubit_is_ancillary(&self, logical: QubitId) -> bool {
        self.ancillary.get(logical.index()).copied().unwrap_or(false)
    }

    /// True if logical qubit `logical` is flagged garbage.
    pub fn logical_qubit_is_garbage(&self, logical: QubitId) -> bool {
        self.garbage.get(logical.index()).copied().unwrap_or(false)
    }

    /// True if no operation acts on `physical`.
    pub fn is_idle_qubit(&self, physical: QubitId) -> bool {
        !self.ops.iter().any(|op| op.acts_on(physical))
    }

    /// Highest logical index in the initial layout.
    pub fn highest_logical_qubit_index(&self) -> Option<QubitId> {
        self.initial_layout.values().max().copied()
    }

    /// Highest physical index in the initial layout.
    pub fn highest_physical_qubit_index(&self) -> Option<QubitId> {
        self.initial_layout.keys().next_back().copied()
    }

    /// Qubits that are neither ancillary nor garbage.
    pub fn num_measured_qubits(&self) -> usize {
        (0..self.num_total_qubits())
            .filter(|&i| {
                !self.ancillary.get(i).copied().unwrap_or(false)
                    && !self.garbage.get(i).copied().unwrap_or(false)
            })
            .count()
    }

    /// Qubits flagged garbage.
    pub fn num_garbage_qubits(&self) -> usize {
        self.garbage.iter().filter(|&&g| g).count()
    }

    // =========================================================================
    // Adding and removing qubits
    // =========================================================================

    /// Remove logical qubit `logical`.
    ///
    /// Returns the physical qubit it occupied and its output-permutation entry.
    /// Indices of the remaining qubits are left untouched.
    pub fn remove_qubit(&mut self, logical: QubitId) -> IrResult<(QubitId, Option<QubitId>)> {
        let physical = self.physical_qubit_index(logical)?;
        let in_ancregs = self.physical_qubit_is_ancillary(physical);
        let (reg_name, _) = if in_ancregs {
            register::register_and_index(&self.ancregs, physical.0)
        } else {
            register::register_and_index(&self.qregs, physical.0)
        }
        .ok_or(IrError::PhysicalQubitNotInRegister(physical))?;
        let reg_name = reg_name.to_string();

        if in_ancregs {
            register::remove(&mut self.ancregs, &reg_name, physical.0)?;
            self.nancillae -= 1;
        } else {
            register::remove(&mut self.qregs, &reg_name, physical.0)?;
            if self.logical_qubit_is_ancillary(logical) {
                self.nancillae -= 1;
            } else {
                self.nqubits -= 1;
            }
        }

        self.initial_layout.remove(&physical);
        let output = self.output_permutation.remove(&physical);

        if logical.index() < self.ancillary.len() {
            self.ancillary.remove(logical.index());
        }
        if logical.index() < self.garbage.len() {
            self.garbage.remove(logical.index());
        }

        debug!("removed logical qubit {} (physical {})", logical, physical);
        Ok((physical, output))
    }

    fn check_free_physical(&self, physical: QubitId) -> IrResult<()> {
        if self.initial_layout.contains_key(&physical)
            || self.output_permutation.contains_key(&physical)
        {
            return Err(IrError::PhysicalQubitOccupied(physical));
        }
        Ok(())
    }

    /// Add logical qubit `logical` on physical qubit `physical`.
    pub fn add_qubit(
        &mut self,
        logical: QubitId,
        physical: QubitId,
        output: Option<QubitId>,
    ) -> IrResult<&mut Self> {
        self.check_free_physical(physical)?;
        if logical.index() > self.nqubits {
            return Err(IrError::LogicalQubitTooLarge {
                logical,
                num_qubits: self.nqubits,
            });
        }

        register::add(&mut self.qregs, physical.0, &self.qreg_name);
        self.nqubits += 1;
        self.initial_layout.insert(physical, logical);
        if let Some(out) = output {
            self.output_permutation.insert(physical, out);
        }
        self.ancillary.insert(logical.index(), false);
        self.garbage.insert(logical.index(), false);
        Ok(self)
    }

    /// Add an ancillary qubit on `physical` with the next free logical index.
    ///
    /// Without an output index the qubit is also marked garbage.
    pub fn add_ancillary_qubit(
        &mut self,
        physical: QubitId,
        output: Option<QubitId>,
    ) -> IrResult<&mut Self> {
        self.check_free_physical(physical)?;
        let logical = QubitId::from(self.num_total_qubits());

        register::add(&mut self.ancregs, physical.0, &self.ancreg_name);
        self.nancillae += 1;
        self.ancillary.resize(logical.index(), false);
        self.ancillary.push(true);
        self.garbage.resize(logical.index(), false);
        self.garbage.push(output.is_none());
        self.initial_layout.insert(physical, logical);
        if let Some(out) = output {
            self.output_permutation.insert(physical, out);
        }
        Ok(self)
    }

    fn check_logical_range(&self, lo: QubitId, hi: QubitId) -> IrResult<()> {
        if lo > hi {
            return Err(IrError::InvalidRange { lo, hi });
        }
        if hi.index() >= self.ancillary.len() {
            return Err(IrError::QubitOutOfRange {
                qubit: hi,
                num_qubits: self.ancillary.len(),
                gate_name: None,
            });
        }
        Ok(())
    }

    /// Mark logical qubit `logical` as ancillary and move it to the ancillary registers.
    pub fn set_logical_qubit_ancillary(&mut self, logical: QubitId) -> IrResult<&mut Self> {
        self.set_logical_qubits_ancillary(logical, logical)
    }

    /// Mark logical qubits `lo..=hi` as ancillary.
    pub fn set_logical_qubits_ancillary(
        &mut self,
        lo: QubitId,
        hi: QubitId,
    ) -> IrResult<&mut Self> {
        self.check_logical_range(lo, hi)?;
        let mut moves = Vec::new();
        for l in lo.0..=hi.0 {
            let logical = QubitId(l);
            if self.logical_qubit_is_ancillary(logical) {
                continue;
            }
            moves.push((logical, self.physical_qubit_index(logical)?));
        }

        // Highest index first: registers shrink from their upper end.
        for (logical, physical) in moves.into_iter().rev() {
            let reg = register::register_and_index(&self.qregs, physical.0)
                .map(|(name, _)| name.to_string());
            if let Some(name) = reg {
                register::remove(&mut self.qregs, &name, physical.0)?;
                register::add(&mut self.ancregs, physical.0, &self.ancreg_name);
            }
            self.ancillary[logical.index()] = true;
            self.nqubits -= 1;
            self.nancillae += 1;
        }
        Ok(self)
    }

    /// Mark logical qubit `logical` as garbage.
    pub fn set_logical_qubit_garbage(&mut self, logical: QubitId) -> IrResult<&mut Self> {
        self.set_logical_qubits_garbage(logical, logical)
    }

    /// Mark logical qubits `lo..=hi` as garbage.
    pub fn set_logical_qubits_garbage(&mut self, lo: QubitId, hi: QubitId) -> IrResult<&mut Self> {
        self.check_logical_range(lo, hi)?;
        for flag in &mut self.garbage[lo.index()..=hi.index()] {
            *flag = true;
        }
        Ok(self)
    }

    /// Remove every qubit no operation acts on, scanning from the highest
    /// physical index down.
    ///
    /// Without `force`, an idle qubit is kept if its output-permutation entry
    /// differs from its initial layout entry or its logical index is the
    /// output of another physical qubit. With `reduce_io_permutations` the
    /// remaining logical and physical indices are compacted, including the
    /// qubit references of all operations and the register ranges.
    pub fn strip_idle_qubits(&mut self, force: bool, reduce_io_permutations: bool) -> IrResult<()> {
        let candidates: Vec<_> = self.initial_layout.keys().rev().copied().collect();
        for physical in candidates {
            if !self.is_idle_qubit(physical) {
                continue;
            }
            let Some(&logical) = self.initial_layout.get(&physical) else {
                continue;
            };
            if !force {
                let passthrough = self
                    .output_permutation
                    .get(&physical)
                    .is_some_and(|&out| out != logical);
                let referenced = self
                    .output_permutation
                    .iter()
                    .any(|(&p, &l)| p != physical && l == logical);
                if passthrough || referenced {
                    debug!("keeping idle qubit {} referenced by the output permutation", physical);
                    continue;
                }
            }

            self.remove_qubit(logical)?;
            debug!("stripped idle qubit {}", physical);
            if reduce_io_permutations {
                self.compact_after_removal(logical, physical);
            }
        }
        Ok(())
    }

    fn compact_after_removal(&mut self, logical: QubitId, physical: QubitId) {
        let shift = |q: QubitId, removed: QubitId| {
            if q > removed { QubitId(q.0 - 1) } else { q }
        };
        for map in [&mut self.initial_layout, &mut self.output_permutation] {
            *map = map
                .iter()
                .map(|(&p, &l)| (shift(p, physical), shift(l, logical)))
                .collect();
        }
        for op in &mut self.ops {
            op.remap_qubits(&|q| shift(q, physical));
        }
        for regs in [&mut self.qregs, &mut self.ancregs] {
            for reg in regs.values_mut() {
                if reg.start > physical.0 {
                    reg.start -= 1;
                }
            }
            register::consolidate(regs);
        }
    }

    // =========================================================================
    // Whole-circuit transformations
    // =========================================================================

    /// Replace the computation by its inverse.
    ///
    /// Layouts are swapped only if they have the same size.
    pub fn invert(&mut self) {
        for op in &mut self.ops {
            op.invert();
        }
        self.ops.reverse();

        if self.initial_layout.len() == self.output_permutation.len() {
            std::mem::swap(&mut self.initial_layout, &mut self.output_permutation);
        } else {
            warn!(
                "initial layout ({} entries) and output permutation ({} entries) differ in size, \
                 layouts not swapped",
                self.initial_layout.len(),
                self.output_permutation.len()
            );
        }
    }

    /// Reorder operations canonically while respecting per-qubit order.
    ///
    /// Scheduling runs in rounds. Each round sweeps the qubits in ascending
    /// order and emits the next operation of every qubit whose operation is
    /// ready on all the qubits it acts on. Operations that act on no qubit are
    /// moved to the end.
    pub fn reorder_operations(&mut self) {
        let used: Vec<Vec<usize>> = self
            .ops
            .iter()
            .map(|op| op.used_qubits().into_iter().map(QubitId::index).collect())
            .collect();
        let width = used.iter().flatten().max().map_or(0, |&q| q + 1);

        let mut chains: Vec<Vec<usize>> = vec![vec![]; width];
        for (idx, qubits) in used.iter().enumerate() {
            for &q in qubits {
                chains[q].push(idx);
            }
        }
        let mut cursors = vec![0usize; width];
        let mut order = Vec::with_capacity(self.ops.len());
        let mut scheduled = vec![false; self.ops.len()];

        loop {
            let mut progressed = false;
            for q in 0..width {
                let Some(&idx) = chains[q].get(cursors[q]) else {
                    continue;
                };
                let ready = used[idx]
                    .iter()
                    .all(|&u| chains[u].get(cursors[u]) == Some(&idx));
                if ready {
                    for &u in &used[idx] {
                        cursors[u] += 1;
                    }
                    scheduled[idx] = true;
                    order.push(idx);
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }

        let unscheduled = scheduled.iter().filter(|&&s| !s).count();
        if unscheduled > 0 {
            debug!("{} operations without qubits moved to the end", unscheduled);
        }
        order.extend((0..self.ops.len()).filter(|&i| !scheduled[i]));

        let mut slots: Vec<Option<Operation>> = self.ops.drain(..).map(Some).collect();
        self.ops = order.into_iter().filter_map(|i| slots[i].take()).collect();
        debug!("reordered {} operations", self.ops.len());
    }

    /// True if the circuit uses mid-circuit measurements, resets or
    /// classically controlled operations.
    pub fn is_dynamic(&self) -> bool {
        fn visit(op: &Operation, measured: &mut FxHashSet<QubitId>) -> bool {
            match op {
                Operation::ClassicControlled(_) => true,
                Operation::NonUnitary(_) if op.op_type() == OpType::Reset => true,
                Operation::NonUnitary(_) => {
                    measured.extend(op.targets().iter().copied());
                    false
                }
                Operation::Compound(c) => c.ops().iter().any(|child| visit(child, measured)),
                _ if op.op_type() == OpType::Barrier => false,
                _ => op.used_qubits().iter().any(|q| measured.contains(q)),
            }
        }
        let mut measured = FxHashSet::default();
        self.ops.iter().any(|op| visit(op, &mut measured))
    }

    /// Move all operations out as a single operation.
    ///
    /// Returns `None` for an empty computation, the operation itself if there
    /// is exactly one, and a compound operation otherwise.
    pub fn as_operation(&mut self) -> Option<Operation> {
        match self.ops.len() {
            0 => None,
            1 => self.ops.pop(),
            _ => Some(Operation::Compound(self.as_compound_operation())),
        }
    }

    /// Move all operations out into a compound operation.
    pub fn as_compound_operation(&mut self) -> CompoundOperation {
        CompoundOperation::new(std::mem::take(&mut self.ops))
    }

    /// Copy of this computation with the given variables substituted.
    pub fn instantiate(&self, assignment: &VariableAssignment) -> Self {
        let mut qc = self.clone();
        qc.instantiate_inplace(assignment);
        qc
    }

    /// Substitute the given variables in every symbolic operation.
    ///
    /// Symbolic operations stay symbolic even if all of their parameters
    /// become concrete.
    pub fn instantiate_inplace(&mut self, assignment: &VariableAssignment) {
        fn visit(op: &mut Operation, assignment: &VariableAssignment) {
            match op {
                Operation::Symbolic(s) => s.instantiate(assignment),
                Operation::Compound(c) => {
                    for child in c.ops_mut() {
                        visit(child, assignment);
                    }
                }
                _ => {}
            }
        }
        for op in &mut self.ops {
            visit(op, assignment);
        }
        self.occurring_variables
            .retain(|v| !assignment.contains_key(v));
    }

    // =========================================================================
    // Measurements derived from the layout
    // =========================================================================

    /// Measure every qubit into the classical bit of the same index.
    ///
    /// With `add_bits` a new classical register `meas` is added first.
    pub fn measure_all(&mut self, add_bits: bool) -> IrResult<&mut Self> {
        let n = self.nqubits;
        if n == 0 {
            return Ok(self);
        }
        if add_bits {
            self.add_classical_register(n, "meas")?;
        } else if self.nclassics < n {
            return Err(IrError::InsufficientClassicalBits {
                required: n,
                available: self.nclassics,
            });
        }
        let start = if add_bits {
            self.cregs.get("meas").map_or(0, |r| r.start)
        } else {
            0
        };

        self.barrier()?;
        for q in 0..index_u32(n) {
            self.measure(QubitId(q), ClbitId(start + q))?;
        }
        Ok(self)
    }

    /// Measure each physical qubit into the bit given by its output logical index.
    pub fn append_measurements_according_to_output_permutation(
        &mut self,
        reg_name: &str,
    ) -> IrResult<&mut Self> {
        let required = self.output_permutation.len();
        if self.cregs.is_empty() {
            self.add_classical_register(required, reg_name)?;
        } else if self.nclassics < required {
            if self.cregs.contains_key(reg_name) {
                return Err(IrError::InsufficientClassicalBits {
                    required,
                    available: self.nclassics,
                });
            }
            self.add_classical_register(required - self.nclassics, reg_name)?;
        }

        let pairs: Vec<_> = self
            .output_permutation
            .iter()
            .map(|(&p, &l)| (p, ClbitId(l.0)))
            .collect();
        for &(p, c) in &pairs {
            self.check_qubit(p, Some("measure"))?;
            self.check_clbit(c, Some("measure"))?;
        }
        self.barrier()?;
        for (p, c) in pairs {
            self.push(Operation::NonUnitary(NonUnitaryOperation::measure(vec![p], vec![c])));
        }
        Ok(self)
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Number of operations, counting the children of compounds.
    pub fn num_individual_ops(&self) -> usize {
        fn count(op: &Operation) -> usize {
            match op {
                Operation::Compound(c) => c.ops().iter().map(count).sum(),
                _ => 1,
            }
        }
        self.ops.iter().map(count).sum()
    }

    /// Number of single-qubit unitary gates, counting the children of compounds.
    pub fn num_single_qubit_ops(&self) -> usize {
        fn count(op: &Operation) -> usize {
            match op {
                Operation::Compound(c) => c.ops().iter().map(count).sum(),
                Operation::Standard(_) | Operation::Symbolic(_)
                    if op.op_type() != OpType::Barrier && op.used_qubits().len() == 1 =>
                {
                    1
                }
                _ => 0,
            }
        }
        self.ops.iter().map(count).sum()
    }

    /// Length of the longest chain of operations on any qubit.
    pub fn depth(&self) -> usize {
        let width = self
            .ops
            .iter()
            .filter_map(|op| op.used_qubits().last().map(|q| q.index() + 1))
            .max()
            .unwrap_or(0)
            .max(self.num_total_qubits());
        let mut depths = vec![0; width];
        for op in &self.ops {
            op.add_depth_contribution(&mut depths);
        }
        depths.into_iter().max().unwrap_or(0)
    }

    /// Summary of the computation.
    pub fn statistics(&self) -> CircuitStats {
        let mut op_counts: FxHashMap<String, usize> = FxHashMap::default();
        for op in &self.ops {
            *op_counts.entry(op.name()).or_insert(0) += 1;
        }
        CircuitStats {
            name: self.name.clone(),
            num_qubits: self.nqubits,
            num_ancillae: self.nancillae,
            num_classical_bits: self.nclassics,
            num_ops: self.ops.len(),
            num_individual_ops: self.num_individual_ops(),
            num_single_qubit_ops: self.num_single_qubit_ops(),
            depth: self.depth(),
            global_phase: self.global_phase,
            op_counts: op_counts.into_iter().collect(),
        }
    }

    fn fmt_registers(&self, f: &mut impl fmt::Write) -> fmt::Result {
        let groups = [
            ("qreg", &self.qregs, 'q'),
            ("anc", &self.ancregs, 'q'),
            ("creg", &self.cregs, 'c'),
        ];
        for (kind, regs, prefix) in groups {
            for (name, reg) in register::sorted(regs) {
                if reg.size == 0 {
                    continue;
                }
                writeln!(
                    f,
                    "{kind} {name}[{}] {{{prefix}{}..{prefix}{}}}",
                    reg.size,
                    reg.start,
                    reg.end() - 1
                )?;
            }
        }
        Ok(())
    }

    /// Write one line per register, ordered by start index.
    pub fn print_registers<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        let mut text = String::new();
        self.fmt_registers(&mut text).map_err(io::Error::other)?;
        out.write_all(text.as_bytes())
    }

    // =========================================================================
    // Range checks
    // =========================================================================

    pub(crate) fn check_qubit(&self, qubit: QubitId, gate_name: Option<&str>) -> IrResult<()> {
        if qubit.index() >= self.num_total_qubits() {
            return Err(IrError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_total_qubits(),
                gate_name: gate_name.map(str::to_string),
            });
        }
        Ok(())
    }

    pub(crate) fn check_clbit(&self, clbit: ClbitId, gate_name: Option<&str>) -> IrResult<()> {
        if clbit.index() >= self.nclassics {
            return Err(IrError::ClbitOutOfRange {
                clbit,
                num_clbits: self.nclassics,
                gate_name: gate_name.map(str::to_string),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Sequence access
    // =========================================================================

    /// Append an operation, registering its symbolic variables.
    pub fn push(&mut self, op: Operation) {
        collect_variables(&op, &mut self.occurring_variables);
        self.ops.push(op);
    }

    /// Insert an operation at `index`.
    pub fn insert(&mut self, index: usize, op: Operation) {
        collect_variables(&op, &mut self.occurring_variables);
        self.ops.insert(index, op);
    }

    /// Remove and return the operation at `index`.
    pub fn remove(&mut self, index: usize) -> Operation {
        self.ops.remove(index)
    }

    /// Remove and return the last operation.
    pub fn pop(&mut self) -> Option<Operation> {
        self.ops.pop()
    }

    /// Remove a range of operations.
    pub fn drain<R: RangeBounds<usize>>(&mut self, range: R) -> std::vec::Drain<'_, Operation> {
        self.ops.drain(range)
    }

    /// Keep only the first `len` operations.
    pub fn truncate(&mut self, len: usize) {
        self.ops.truncate(len);
    }

    /// Remove all operations.
    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Reserve capacity for `additional` operations.
    pub fn reserve(&mut self, additional: usize) {
        self.ops.reserve(additional);
    }

    /// Reverse the operation order without inverting anything.
    pub fn reverse(&mut self) {
        self.ops.reverse();
    }

    /// Operation at `index`.
    pub fn get(&self, index: usize) -> Option<&Operation> {
        self.ops.get(index)
    }

    /// Mutable operation at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Operation> {
        self.ops.get_mut(index)
    }

    /// First operation.
    pub fn first(&self) -> Option<&Operation> {
        self.ops.first()
    }

    /// Last operation.
    pub fn last(&self) -> Option<&Operation> {
        self.ops.last()
    }

    /// Number of top-level operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True if there are no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Iterate over the operations in program order.
    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.ops.iter()
    }

    /// Iterate mutably over the operations.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Operation> {
        self.ops.iter_mut()
    }
}

fn collect_variables(op: &Operation, out: &mut FxHashSet<Variable>) {
    match op {
        Operation::Symbolic(s) => out.extend(s.variables().cloned()),
        Operation::Compound(c) => {
            for child in c.ops() {
                collect_variables(child, out);
            }
        }
        Operation::ClassicControlled(cc) => collect_variables(cc.operation(), out),
        _ => {}
    }
}

impl Index<usize> for QuantumComputation {
    type Output = Operation;

    fn index(&self, index: usize) -> &Self::Output {
        &self.ops[index]
    }
}

impl IndexMut<usize> for QuantumComputation {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.ops[index]
    }
}

impl<'a> IntoIterator for &'a QuantumComputation {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

impl<'a> IntoIterator for &'a mut QuantumComputation {
    type Item = &'a mut Operation;
    type IntoIter = std::slice::IterMut<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter_mut()
    }
}

impl Extend<Operation> for QuantumComputation {
    fn extend<T: IntoIterator<Item = Operation>>(&mut self, iter: T) {
        for op in iter {
            self.push(op);
        }
    }
}

impl fmt::Display for QuantumComputation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.name.is_empty() {
            writeln!(f, "// {}", self.name)?;
        }
        self.fmt_registers(f)?;
        let layout = |perm: &Permutation| {
            perm.iter()
                .map(|(p, l)| format!("{p}->{l}"))
                .collect::<Vec<_>>()
                .join(" ")
        };
        writeln!(f, "initial layout: {}", layout(&self.initial_layout))?;
        for (i, op) in self.ops.iter().enumerate() {
            writeln!(f, "{i:>4}: {op}")?;
        }
        writeln!(f, "output permutation: {}", layout(&self.output_permutation))?;
        if self.global_phase != 0.0 {
            writeln!(f, "global phase: {}", self.global_phase)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::StandardOperation;
    use crate::parameter::SymbolOrNumber;
    use crate::qubit::Controls;

    fn h(q: u32) -> Operation {
        Operation::Standard(StandardOperation::new(
            OpType::H,
            Controls::new(),
            vec![QubitId(q)],
            vec![],
        ))
    }

    #[test]
    fn test_with_size() {
        let qc = QuantumComputation::with_size(3, 2);
        assert_eq!(qc.num_qubits(), 3);
        assert_eq!(qc.num_classical_bits(), 2);
        assert_eq!(qc.qregs().get("q"), Some(&Register::new(0, 3)));
        assert_eq!(qc.cregs().get("c"), Some(&Register::new(0, 2)));
        assert_eq!(qc.initial_layout().len(), 3);
        assert_eq!(qc.initial_layout()[&QubitId(2)], QubitId(2));
        assert_eq!(qc.ancillary(), &[false, false, false]);
    }

    #[test]
    fn test_seed_is_kept() {
        let qc = QuantumComputation::with_seed(1, 0, 42);
        assert_eq!(qc.seed(), 42);
        assert_ne!(QuantumComputation::new().seed(), 0);
    }

    #[test]
    fn test_gphase_wraps() {
        let mut qc = QuantumComputation::new();
        qc.gphase(-PI / 2.0);
        assert!((qc.global_phase() - 1.5 * PI).abs() < 1e-12);
        qc.gphase(PI);
        assert!((qc.global_phase() - 0.5 * PI).abs() < 1e-12);
        qc.gphase(f64::NAN);
        assert!((qc.global_phase() - 0.5 * PI).abs() < 1e-12);
    }

    #[test]
    fn test_gphase_huge_angle_terminates() {
        let mut qc = QuantumComputation::new();
        qc.gphase(1.0e20);
        assert!((0.0..2.0 * PI).contains(&qc.global_phase()));
        qc.gphase(-1.0e300);
        assert!((0.0..2.0 * PI).contains(&qc.global_phase()));
        qc.gphase(1.0e17);
        assert!((0.0..2.0 * PI).contains(&qc.global_phase()));
    }

    #[test]
    fn test_add_registers() {
        let mut qc = QuantumComputation::with_size(2, 0);
        qc.add_qubit_register(2, "q").unwrap();
        assert_eq!(qc.qregs().get("q"), Some(&Register::new(0, 4)));
        qc.add_qubit_register(1, "r").unwrap();
        assert!(matches!(
            qc.add_qubit_register(1, "q"),
            Err(IrError::DuplicateRegister(_))
        ));

        qc.add_ancillary_register(2, "anc").unwrap();
        assert_eq!(qc.num_total_qubits(), 7);
        assert_eq!(qc.ancregs().get("anc"), Some(&Register::new(5, 2)));
        assert!(qc.logical_qubit_is_ancillary(QubitId(6)));
        assert!(matches!(
            qc.add_qubit_register(1, "late"),
            Err(IrError::AncillaePresent(_))
        ));

        qc.add_classical_register(3, "c").unwrap();
        assert!(qc.add_classical_register(1, "c").is_err());
        assert_eq!(qc.num_classical_bits(), 3);
    }

    #[test]
    fn test_remove_and_readd_qubit() {
        let mut qc = QuantumComputation::with_size(3, 0);
        let before_layout = qc.initial_layout().clone();
        let (p, out) = qc.remove_qubit(QubitId(1)).unwrap();
        assert_eq!(p, QubitId(1));
        assert_eq!(out, Some(QubitId(1)));
        assert_eq!(qc.num_qubits(), 2);
        assert!(qc.qregs().contains_key("q_l"));
        assert!(qc.qregs().contains_key("q_h"));

        qc.add_qubit(QubitId(1), QubitId(1), Some(QubitId(1))).unwrap();
        assert_eq!(qc.initial_layout(), &before_layout);
        assert_eq!(qc.qregs().get("q"), Some(&Register::new(0, 3)));
    }

    #[test]
    fn test_remove_unknown_qubit_fails() {
        let mut qc = QuantumComputation::with_size(2, 0);
        assert!(matches!(
            qc.remove_qubit(QubitId(5)),
            Err(IrError::LogicalQubitNotFound(QubitId(5)))
        ));
        assert_eq!(qc.num_qubits(), 2);
    }

    #[test]
    fn test_add_qubit_occupied() {
        let mut qc = QuantumComputation::with_size(2, 0);
        assert!(matches!(
            qc.add_qubit(QubitId(2), QubitId(0), None),
            Err(IrError::PhysicalQubitOccupied(_))
        ));
    }

    #[test]
    fn test_add_ancillary_qubit_without_output_is_garbage() {
        let mut qc = QuantumComputation::with_size(2, 0);
        qc.add_ancillary_qubit(QubitId(2), None).unwrap();
        assert_eq!(qc.num_ancillae(), 1);
        assert_eq!(qc.initial_layout()[&QubitId(2)], QubitId(2));
        assert!(qc.logical_qubit_is_ancillary(QubitId(2)));
        assert!(qc.logical_qubit_is_garbage(QubitId(2)));
        assert!(qc.physical_qubit_is_ancillary(QubitId(2)));
        assert_eq!(qc.num_measured_qubits(), 2);
    }

    #[test]
    fn test_set_ancillary_moves_register() {
        let mut qc = QuantumComputation::with_size(3, 0);
        qc.set_logical_qubits_ancillary(QubitId(1), QubitId(2)).unwrap();
        assert_eq!(qc.num_qubits(), 1);
        assert_eq!(qc.num_ancillae(), 2);
        assert_eq!(qc.qregs().get("q"), Some(&Register::new(0, 1)));
        assert_eq!(qc.ancregs().get("anc"), Some(&Register::new(1, 2)));
        assert_eq!(qc.qubit_register_and_index(QubitId(2)).unwrap(), ("anc", 1));

        assert!(matches!(
            qc.set_logical_qubits_ancillary(QubitId(2), QubitId(1)),
            Err(IrError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_garbage_flags_only() {
        let mut qc = QuantumComputation::with_size(3, 0);
        qc.set_logical_qubits_garbage(QubitId(0), QubitId(1)).unwrap();
        assert_eq!(qc.garbage(), &[true, true, false]);
        assert_eq!(qc.num_garbage_qubits(), 2);
        assert_eq!(qc.num_measured_qubits(), 1);
        assert_eq!(qc.qregs().get("q"), Some(&Register::new(0, 3)));
        assert!(qc.set_logical_qubit_garbage(QubitId(3)).is_err());
    }

    #[test]
    fn test_unify_registers() {
        let mut qc = QuantumComputation::with_size(2, 0);
        qc.add_ancillary_register(1, "anc").unwrap();
        qc.unify_quantum_registers("all");
        assert_eq!(qc.num_qubits(), 3);
        assert_eq!(qc.num_ancillae(), 0);
        assert_eq!(qc.qregs().len(), 1);
        assert_eq!(qc.qregs().get("all"), Some(&Register::new(0, 3)));
        assert!(qc.ancregs().is_empty());
    }

    #[test]
    fn test_strip_keeps_permuted_idle_qubit() {
        let mut qc = QuantumComputation::with_size(3, 0);
        qc.push(h(0));
        qc.output_permutation_mut().insert(QubitId(1), QubitId(2));
        qc.output_permutation_mut().insert(QubitId(2), QubitId(1));
        qc.strip_idle_qubits(false, true).unwrap();
        assert_eq!(qc.num_qubits(), 3);

        qc.strip_idle_qubits(true, true).unwrap();
        assert_eq!(qc.num_qubits(), 1);
    }

    #[test]
    fn test_reorder_operations() {
        let mut qc = QuantumComputation::with_size(2, 0);
        qc.push(h(1));
        qc.push(h(0));
        qc.push(h(1));
        qc.reorder_operations();
        let targets: Vec<_> = qc.iter().map(|op| op.targets()[0].0).collect();
        assert_eq!(targets, vec![0, 1, 1]);
    }

    #[test]
    fn test_reorder_sweeps_all_qubits_per_round() {
        let mut qc = QuantumComputation::with_size(3, 0);
        qc.push(h(0));
        qc.push(h(0));
        qc.push(h(2));
        qc.push(h(1));
        qc.reorder_operations();
        let targets: Vec<_> = qc.iter().map(|op| op.targets()[0].0).collect();
        assert_eq!(targets, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_as_operation() {
        let mut qc = QuantumComputation::with_size(1, 0);
        assert!(qc.as_operation().is_none());
        qc.push(h(0));
        assert_eq!(qc.as_operation(), Some(h(0)));
        assert!(qc.is_empty());
        qc.push(h(0));
        qc.push(h(0));
        let op = qc.as_operation().unwrap();
        assert!(op.is_compound());
        assert!(qc.is_empty());
    }

    #[test]
    fn test_instantiate_keeps_symbolic_variant() {
        let mut qc = QuantumComputation::with_size(1, 0);
        qc.rz(Variable::new("theta"), QubitId(0)).unwrap();
        assert!(!qc.is_variable_free());

        let mut assignment = VariableAssignment::default();
        assignment.insert(Variable::new("theta"), 0.5);
        let bound = qc.instantiate(&assignment);
        assert!(bound.variables().is_empty());
        assert!(!bound.is_variable_free());
        let Operation::Symbolic(op) = &bound[0] else { panic!("expected symbolic") };
        assert_eq!(op.params(), &[SymbolOrNumber::Number(0.5)]);
        assert_eq!(qc.variables().len(), 1);
    }

    #[test]
    fn test_measure_all() {
        let mut qc = QuantumComputation::with_size(2, 0);
        qc.measure_all(true).unwrap();
        assert_eq!(qc.cregs().get("meas"), Some(&Register::new(0, 2)));
        assert_eq!(qc.len(), 3);
        assert_eq!(qc[0].op_type(), OpType::Barrier);

        let mut qc = QuantumComputation::with_size(2, 1);
        assert!(matches!(
            qc.measure_all(false),
            Err(IrError::InsufficientClassicalBits { required: 2, available: 1 })
        ));
        assert!(qc.is_empty());
    }

    #[test]
    fn test_append_measurements_according_to_output_permutation() {
        let mut qc = QuantumComputation::with_size(2, 0);
        qc.output_permutation_mut().insert(QubitId(0), QubitId(1));
        qc.output_permutation_mut().insert(QubitId(1), QubitId(0));
        qc.append_measurements_according_to_output_permutation("c")
            .unwrap();
        assert_eq!(qc.num_classical_bits(), 2);
        let Operation::NonUnitary(m) = &qc[1] else { panic!("expected measure") };
        assert_eq!(m.clbits(), &[ClbitId(1)]);
    }

    #[test]
    fn test_depth_and_stats() {
        let mut qc = QuantumComputation::with_size(2, 0);
        qc.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        qc.h(QubitId(1)).unwrap();
        assert_eq!(qc.depth(), 3);
        let stats = qc.statistics();
        assert_eq!(stats.num_ops, 3);
        assert_eq!(stats.num_single_qubit_ops, 2);
        assert_eq!(stats.op_counts["h"], 2);
        assert_eq!(stats.op_counts["cx"], 1);
    }

    #[test]
    fn test_display_and_registers() {
        let mut qc = QuantumComputation::with_size(2, 1);
        qc.set_name("demo");
        qc.h(QubitId(0)).unwrap();
        let text = format!("{qc}");
        assert!(text.starts_with("// demo\nqreg q[2] {q0..q1}\ncreg c[1] {c0..c0}\n"));
        assert!(text.contains("   0: h q0\n"));

        let mut out = Vec::new();
        qc.print_registers(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "qreg q[2] {q0..q1}\ncreg c[1] {c0..c0}\n");
    }

    #[test]
    fn test_from_compound_operation() {
        let compound = CompoundOperation::new(vec![h(0), h(3)]);
        let qc = QuantumComputation::from_compound_operation(compound);
        assert_eq!(qc.num_qubits(), 4);
        assert_eq!(qc.len(), 2);
        assert_eq!(qc.num_classical_bits(), 0);
    }
}
