//! Shared arena of simulation entities.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use sugars::{rc, refcell};

use crate::core::cloudlet::Cloudlet;
use crate::core::vm::Vm;

/// Holds all VMs and cloudlets and assigns their identifiers.
///
/// Components share a single registry and pass entity ids in events, so no
/// ownership cycles arise between brokers, datacenters and hosts. Entities
/// are kept in registration order.
#[derive(Default)]
pub struct Registry {
    vms: IndexMap<u32, Rc<RefCell<Vm>>>,
    cloudlets: IndexMap<u32, Rc<RefCell<Cloudlet>>>,
    vm_counter: u32,
    cloudlet_counter: u32,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a VM, assigns its id and returns the shared handle.
    pub fn register_vm(&mut self, mut vm: Vm) -> Rc<RefCell<Vm>> {
        self.vm_counter += 1;
        vm.id = self.vm_counter;
        let vm = rc!(refcell!(vm));
        self.vms.insert(self.vm_counter, vm.clone());
        vm
    }

    /// Registers a cloudlet, assigns its id and returns the shared handle.
    pub fn register_cloudlet(&mut self, mut cloudlet: Cloudlet) -> Rc<RefCell<Cloudlet>> {
        self.cloudlet_counter += 1;
        cloudlet.id = self.cloudlet_counter;
        let cloudlet = rc!(refcell!(cloudlet));
        self.cloudlets.insert(self.cloudlet_counter, cloudlet.clone());
        cloudlet
    }

    pub fn vm(&self, id: u32) -> Option<Rc<RefCell<Vm>>> {
        self.vms.get(&id).cloned()
    }

    pub fn cloudlet(&self, id: u32) -> Option<Rc<RefCell<Cloudlet>>> {
        self.cloudlets.get(&id).cloned()
    }

    pub fn vms(&self) -> impl Iterator<Item = &Rc<RefCell<Vm>>> {
        self.vms.values()
    }

    pub fn cloudlets(&self) -> impl Iterator<Item = &Rc<RefCell<Cloudlet>>> {
        self.cloudlets.values()
    }

    pub fn vm_count(&self) -> usize {
        self.vms.len()
    }

    pub fn cloudlet_count(&self) -> usize {
        self.cloudlets.len()
    }
}
