//! Named index ranges and the algebra that keeps them consistent.
//!
//! A register map assigns names to disjoint `[start, start + size)` ranges.
//! Adding an index extends a neighbouring register when possible, removing
//! one shrinks or splits the owning register into `<name>_l` / `<name>_h`,
//! and [`consolidate`] merges such halves back once they touch again.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{IrError, IrResult};

/// A contiguous index range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Register {
    /// First index.
    pub start: u32,
    /// Number of indices.
    pub size: u32,
}

impl Register {
    /// Create a register covering `[start, start + size)`.
    pub fn new(start: u32, size: u32) -> Self {
        Self { start, size }
    }

    /// One past the last index.
    #[inline]
    pub fn end(&self) -> u32 {
        self.start + self.size
    }

    /// True if `index` lies inside the range.
    #[inline]
    pub fn contains(&self, index: u32) -> bool {
        index >= self.start && index < self.end()
    }

    /// Iterate over the covered indices.
    pub fn indices(&self) -> std::ops::Range<u32> {
        self.start..self.end()
    }
}

/// Registers keyed by name.
pub type RegisterMap = BTreeMap<String, Register>;

/// Return `base`, or `base` with a numeric suffix if that name is taken.
fn unique_name(regs: &RegisterMap, base: String) -> String {
    if !regs.contains_key(&base) {
        return base;
    }
    let mut n = 1;
    loop {
        let candidate = format!("{base}_{n}");
        if !regs.contains_key(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Add `index` to the register map.
///
/// An empty map receives a single register `default_name`. Otherwise the
/// first register (by name) that starts at `index + 1` or ends at `index`
/// is extended; if none does, a singleton `<default_name>_<index>` is created.
pub fn add(regs: &mut RegisterMap, index: u32, default_name: &str) {
    if regs.is_empty() {
        regs.insert(default_name.to_string(), Register::new(index, 1));
        return;
    }

    let mut fused = false;
    for reg in regs.values_mut() {
        if reg.start == index + 1 {
            reg.start -= 1;
            reg.size += 1;
            fused = true;
            break;
        }
        if reg.end() == index {
            reg.size += 1;
            fused = true;
            break;
        }
    }

    if fused {
        consolidate(regs);
    } else {
        let name = unique_name(regs, format!("{default_name}_{index}"));
        regs.insert(name, Register::new(index, 1));
    }
}

/// Remove the global `index` from register `name`.
///
/// The register is deleted when `index` is its only element, shrunk when
/// `index` is at either end, and split into `<name>_l` and `<name>_h` otherwise.
pub fn remove(regs: &mut RegisterMap, name: &str, index: u32) -> IrResult<()> {
    let reg = *regs
        .get(name)
        .ok_or_else(|| IrError::RegisterNotFound(name.to_string()))?;
    if !reg.contains(index) {
        return Err(IrError::IndexOutsideRegister {
            register: name.to_string(),
            index,
            start: reg.start,
            size: reg.size,
        });
    }

    if reg.size == 1 {
        regs.remove(name);
    } else if index == reg.start {
        regs.insert(name.to_string(), Register::new(reg.start + 1, reg.size - 1));
    } else if index == reg.end() - 1 {
        regs.insert(name.to_string(), Register::new(reg.start, reg.size - 1));
    } else {
        regs.remove(name);
        let low = Register::new(reg.start, index - reg.start);
        let high = Register::new(index + 1, reg.end() - index - 1);
        let low_name = unique_name(regs, format!("{name}_l"));
        regs.insert(low_name, low);
        let high_name = unique_name(regs, format!("{name}_h"));
        regs.insert(high_name, high);
        debug!("split register '{}' at index {}", name, index);
    }
    Ok(())
}

/// Merge `<name>_l` / `<name>_h` pairs into `<name>` until no pair is contiguous.
///
/// A pair is merged only if `<name>` itself is not taken.
pub fn consolidate(regs: &mut RegisterMap) {
    loop {
        let merge = regs.iter().find_map(|(low_name, low)| {
            let base = low_name.strip_suffix("_l").filter(|b| !b.is_empty())?;
            let high_name = format!("{base}_h");
            let high = regs.get(&high_name)?;
            (low.end() == high.start && !regs.contains_key(base)).then(|| {
                (
                    low_name.clone(),
                    high_name,
                    base.to_string(),
                    Register::new(low.start, low.size + high.size),
                )
            })
        });

        let Some((low_name, high_name, base, merged)) = merge else {
            break;
        };
        regs.remove(&low_name);
        regs.remove(&high_name);
        regs.insert(base, merged);
    }
}

/// Registers ordered by ascending start index.
pub fn sorted(regs: &RegisterMap) -> Vec<(&str, Register)> {
    let mut view: Vec<_> = regs.iter().map(|(n, r)| (n.as_str(), *r)).collect();
    view.sort_by_key(|(_, r)| r.start);
    view
}

/// The register containing `index` and the index relative to its start.
pub fn register_and_index(regs: &RegisterMap, index: u32) -> Option<(&str, u32)> {
    regs.iter()
        .find(|(_, r)| r.contains(index))
        .map(|(n, r)| (n.as_str(), index - r.start))
}

/// Flat lookup table: global index → `(register name, "name[i]")`.
pub fn register_names(regs: &RegisterMap) -> BTreeMap<u32, (String, String)> {
    sorted(regs)
        .into_iter()
        .flat_map(|(name, reg)| {
            reg.indices()
                .map(move |i| (i, (name.to_string(), format!("{name}[{}]", i - reg.start))))
        })
        .collect()
}

/// Total number of indices covered.
pub fn total_size(regs: &RegisterMap) -> u32 {
    regs.values().map(|r| r.size).sum()
}
