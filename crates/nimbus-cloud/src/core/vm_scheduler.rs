//! Host-level VM schedulers deciding how host processing elements are
//! shared among resident VMs.

use std::collections::HashMap;

use serde::Serialize;

use nimbus_core::EPSILON;

use crate::core::common::Pe;

/// Decides how the host's processing elements are divided among resident
/// VMs and accounts the granted shares.
///
/// Implementations must guarantee that the total MIPS handed out never
/// exceeds the host aggregate capacity, and that deallocating a VM
/// instantly frees its share for reallocation.
pub trait VmScheduler {
    /// Checks whether a VM with the given PE requirements can be admitted.
    fn can_allocate(&self, pes: u32, mips: f64) -> bool;

    /// Tries to reserve capacity for the VM, returns the per-PE MIPS shares
    /// granted to it (one entry per requested PE) or `None` on failure.
    fn allocate(&mut self, vm_id: u32, pes: u32, mips: f64) -> Option<Vec<f64>>;

    /// Releases the VM's grant, if any.
    fn deallocate(&mut self, vm_id: u32);

    /// Aggregate MIPS capacity of the host.
    fn total_mips(&self) -> f64;

    /// Aggregate MIPS not yet granted to any VM.
    fn available_mips(&self) -> f64;

    fn allocated_mips(&self) -> f64 {
        self.total_mips() - self.available_mips()
    }
}

/// Host PE sharing modes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum VmSharing {
    /// Each VM is bound to a disjoint fixed subset of whole PEs.
    SpaceShared,
    /// All VMs share the aggregate MIPS of the full PE pool.
    TimeShared,
}

impl VmSharing {
    /// Builds the scheduler implementation for the given host PEs.
    pub fn scheduler(&self, pes: &[Pe]) -> Box<dyn VmScheduler> {
        match self {
            VmSharing::SpaceShared => Box::new(SpaceSharedVmScheduler::new(pes)),
            VmSharing::TimeShared => Box::new(TimeSharedVmScheduler::new(pes)),
        }
    }
}

/// Binds each VM to a disjoint, fixed subset of the host's PEs for its
/// lifetime.
///
/// PEs are scanned in index order and the first free ones whose native
/// rate satisfies the VM's required rate are taken; the VM then enjoys the
/// PEs' native rates (a whole PE cannot be granted fractionally, so the
/// requested rate acts as an admission floor). Placement fails if no
/// sufficiently-sized free subset exists, even when aggregate free MIPS
/// would suffice.
pub struct SpaceSharedVmScheduler {
    pes: Vec<Pe>,
    free: Vec<bool>,
    grants: HashMap<u32, Vec<usize>>,
}

impl SpaceSharedVmScheduler {
    pub fn new(pes: &[Pe]) -> Self {
        Self {
            pes: pes.to_vec(),
            free: vec![true; pes.len()],
            grants: HashMap::new(),
        }
    }

    fn find_fit(&self, pes: u32, mips: f64) -> Option<Vec<usize>> {
        let mut picked = Vec::with_capacity(pes as usize);
        for (idx, pe) in self.pes.iter().enumerate() {
            if self.free[idx] && pe.mips + EPSILON >= mips {
                picked.push(idx);
                if picked.len() == pes as usize {
                    return Some(picked);
                }
            }
        }
        None
    }
}

impl VmScheduler for SpaceSharedVmScheduler {
    fn can_allocate(&self, pes: u32, mips: f64) -> bool {
        self.find_fit(pes, mips).is_some()
    }

    fn allocate(&mut self, vm_id: u32, pes: u32, mips: f64) -> Option<Vec<f64>> {
        let picked = self.find_fit(pes, mips)?;
        let shares = picked.iter().map(|&idx| self.pes[idx].mips).collect();
        for &idx in &picked {
            self.free[idx] = false;
        }
        self.grants.insert(vm_id, picked);
        Some(shares)
    }

    fn deallocate(&mut self, vm_id: u32) {
        if let Some(picked) = self.grants.remove(&vm_id) {
            for idx in picked {
                self.free[idx] = true;
            }
        }
    }

    fn total_mips(&self) -> f64 {
        self.pes.iter().map(|pe| pe.mips).sum()
    }

    fn available_mips(&self) -> f64 {
        self.pes
            .iter()
            .zip(self.free.iter())
            .filter(|(_, &free)| free)
            .map(|(pe, _)| pe.mips)
            .sum()
    }
}

/// Shares the aggregate MIPS of the full PE pool among all resident VMs.
///
/// Admission is checked against aggregate available MIPS; an admitted VM is
/// granted exactly its demand (PE count times required rate) as equal
/// per-PE shares, so the sum of grants never exceeds host capacity.
pub struct TimeSharedVmScheduler {
    total: f64,
    available: f64,
    grants: HashMap<u32, f64>,
}

impl TimeSharedVmScheduler {
    pub fn new(pes: &[Pe]) -> Self {
        let total = pes.iter().map(|pe| pe.mips).sum();
        Self {
            total,
            available: total,
            grants: HashMap::new(),
        }
    }
}

impl VmScheduler for TimeSharedVmScheduler {
    fn can_allocate(&self, pes: u32, mips: f64) -> bool {
        pes as f64 * mips <= self.available + EPSILON
    }

    fn allocate(&mut self, vm_id: u32, pes: u32, mips: f64) -> Option<Vec<f64>> {
        let demand = pes as f64 * mips;
        if demand > self.available + EPSILON || self.grants.contains_key(&vm_id) {
            return None;
        }
        self.available -= demand;
        self.grants.insert(vm_id, demand);
        Some(vec![mips; pes as usize])
    }

    fn deallocate(&mut self, vm_id: u32) {
        if let Some(demand) = self.grants.remove(&vm_id) {
            self.available += demand;
        }
    }

    fn total_mips(&self) -> f64 {
        self.total
    }

    fn available_mips(&self) -> f64 {
        self.available
    }
}
