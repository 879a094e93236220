//! VM allocation policies selecting a host for each placement request.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::common::AllocationVerdict;
use crate::core::host::Host;
use crate::core::vm::Vm;

/// Selects the target host for a VM placement request.
///
/// Policies are pure functions of the current host states and the host
/// registration order, so placement is deterministic. Returning `None`
/// means no host can satisfy the VM's resource vector right now; the
/// request fails without partial reservation.
pub trait VmAllocationPolicy {
    fn select_host(&self, vm: &Vm, hosts: &[Rc<RefCell<Host>>]) -> Option<u32>;
}

/// Picks the first host in registration order that can fit the VM.
pub struct FirstFit;

impl FirstFit {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for FirstFit {
    fn default() -> Self {
        Self::new()
    }
}

impl VmAllocationPolicy for FirstFit {
    fn select_host(&self, vm: &Vm, hosts: &[Rc<RefCell<Host>>]) -> Option<u32> {
        for host in hosts {
            let host = host.borrow();
            if host.can_accept(vm) == AllocationVerdict::Success {
                return Some(host.id);
            }
        }
        None
    }
}

/// Picks the fitting host with the most available MIPS, spreading load.
///
/// Ties are broken by registration order.
pub struct WorstFit;

impl WorstFit {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for WorstFit {
    fn default() -> Self {
        Self::new()
    }
}

impl VmAllocationPolicy for WorstFit {
    fn select_host(&self, vm: &Vm, hosts: &[Rc<RefCell<Host>>]) -> Option<u32> {
        let mut best: Option<(u32, f64)> = None;
        for host in hosts {
            let host = host.borrow();
            if host.can_accept(vm) != AllocationVerdict::Success {
                continue;
            }
            match best {
                Some((_, available)) if available >= host.available_mips() => {}
                _ => best = Some((host.id, host.available_mips())),
            }
        }
        best.map(|(id, _)| id)
    }
}
