//! Broker component owning VMs and cloudlets on behalf of a tenant.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;

use nimbus_core::cast;
use nimbus_core::component::Id;
use nimbus_core::context::SimulationContext;
use nimbus_core::event::Event;
use nimbus_core::handler::EventHandler;
use nimbus_core::{log_debug, log_warn};

use crate::core::cloudlet::{Cloudlet, CloudletStatus};
use crate::core::common::SubmissionError;
use crate::core::events::allocation::{VmCreated, VmCreationFailed, VmCreationRequest, VmDestroyRequest};
use crate::core::events::cloudlet::{CloudletFailed, CloudletFinished, CloudletSubmitRequest};
use crate::core::registry::Registry;
use crate::core::vm::{Vm, VmStatus};
use crate::core::workload::{CompletionCallback, Feedback};

/// Owns a tenant's VMs and cloudlets and talks to a single datacenter.
///
/// Cloudlets bind to an explicit VM or round-robin over the broker's VMs
/// at submission. Cloudlets bound to a VM whose placement is still pending
/// wait in the broker and are dispatched the moment the placement
/// resolves. Completion callbacks run synchronously on `CloudletFinished`;
/// a produced replacement is re-enqueued as a zero-delay event rather than
/// dispatched recursively. When all of the broker's work is finished and
/// no callbacks remain, it requests destruction of its running VMs so the
/// capacity returns to the pool.
pub struct Broker {
    pub id: u32,
    datacenter_id: Id,
    registry: Rc<RefCell<Registry>>,
    vms: IndexMap<u32, Rc<RefCell<Vm>>>,
    cloudlets: IndexMap<u32, Rc<RefCell<Cloudlet>>>,
    /// Cloudlets waiting for their VM's placement to resolve.
    pending_dispatch: HashMap<u32, Vec<u32>>,
    callbacks: HashMap<u32, Box<dyn CompletionCallback>>,
    /// Finished cloudlet ids with finish times, in completion order.
    finished: Vec<(u32, f64)>,
    unresolved_vms: u32,
    rr_cursor: usize,
    teardown_done: bool,
    ctx: SimulationContext,
}

impl Broker {
    pub fn new(datacenter_id: Id, registry: Rc<RefCell<Registry>>, ctx: SimulationContext) -> Self {
        Self {
            id: ctx.id(),
            datacenter_id,
            registry,
            vms: IndexMap::new(),
            cloudlets: IndexMap::new(),
            pending_dispatch: HashMap::new(),
            callbacks: HashMap::new(),
            finished: Vec::new(),
            unresolved_vms: 0,
            rr_cursor: 0,
            teardown_done: false,
            ctx,
        }
    }

    /// Submits a registered VM for placement.
    pub fn submit_vm(&mut self, vm_id: u32) -> Result<(), SubmissionError> {
        let vm = self.registry.borrow().vm(vm_id).ok_or(SubmissionError::UnknownVm)?;
        if vm.borrow().broker_id().is_some() {
            return Err(SubmissionError::DuplicateSubmission);
        }
        vm.borrow_mut().set_broker_id(self.id);
        self.vms.insert(vm_id, vm);
        self.unresolved_vms += 1;
        self.ctx.emit_now(VmCreationRequest { vm_id }, self.datacenter_id);
        Ok(())
    }

    pub fn submit_vm_list(&mut self, vm_ids: &[u32]) -> Result<(), SubmissionError> {
        for &vm_id in vm_ids {
            self.submit_vm(vm_id)?;
        }
        Ok(())
    }

    /// Submits a registered cloudlet, bound to the given VM or round-robin
    /// over the broker's VMs.
    pub fn submit_cloudlet(&mut self, cloudlet_id: u32, vm_id: Option<u32>) -> Result<(), SubmissionError> {
        self.submit_cloudlet_with_callback(cloudlet_id, vm_id, None)
    }

    pub fn submit_cloudlet_list(&mut self, cloudlet_ids: &[u32]) -> Result<(), SubmissionError> {
        for &cloudlet_id in cloudlet_ids {
            self.submit_cloudlet(cloudlet_id, None)?;
        }
        Ok(())
    }

    pub fn submit_cloudlet_with_callback(
        &mut self,
        cloudlet_id: u32,
        vm_id: Option<u32>,
        callback: Option<Box<dyn CompletionCallback>>,
    ) -> Result<(), SubmissionError> {
        let cloudlet = self
            .registry
            .borrow()
            .cloudlet(cloudlet_id)
            .ok_or(SubmissionError::UnknownCloudlet)?;
        if cloudlet.borrow().broker_id().is_some() {
            return Err(SubmissionError::DuplicateSubmission);
        }
        let vm_id = match vm_id {
            Some(vm_id) => {
                if !self.vms.contains_key(&vm_id) {
                    return Err(SubmissionError::UnknownVm);
                }
                vm_id
            }
            None => self.next_vm_round_robin()?,
        };
        if let Some(callback) = callback {
            self.callbacks.insert(cloudlet_id, callback);
        }
        self.accept_cloudlet(cloudlet, vm_id);
        Ok(())
    }

    /// Number of cloudlets ever submitted via this broker.
    pub fn submitted_cloudlets(&self) -> usize {
        self.cloudlets.len()
    }

    /// Ids of all cloudlets submitted via this broker, in submission order.
    pub fn submitted_cloudlet_ids(&self) -> Vec<u32> {
        self.cloudlets.keys().copied().collect()
    }

    /// Finished cloudlet ids with finish times, in completion order.
    pub fn finished_cloudlets(&self) -> &[(u32, f64)] {
        &self.finished
    }

    pub fn vm_status(&self, vm_id: u32) -> Option<VmStatus> {
        self.vms.get(&vm_id).map(|vm| vm.borrow().status().clone())
    }

    fn next_vm_round_robin(&mut self) -> Result<u32, SubmissionError> {
        if self.vms.is_empty() {
            return Err(SubmissionError::NoSubmittedVms);
        }
        let idx = self.rr_cursor % self.vms.len();
        self.rr_cursor += 1;
        match self.vms.get_index(idx) {
            Some((&vm_id, _)) => Ok(vm_id),
            None => Err(SubmissionError::NoSubmittedVms),
        }
    }

    /// Binds the cloudlet and either dispatches it, parks it until its
    /// VM's placement resolves, or fails it outright.
    fn accept_cloudlet(&mut self, cloudlet: Rc<RefCell<Cloudlet>>, vm_id: u32) {
        let cloudlet_id = cloudlet.borrow().id;
        {
            let mut c = cloudlet.borrow_mut();
            c.set_broker_id(self.id);
            c.set_submit_time(self.ctx.time());
            c.bind_to_vm(vm_id);
        }
        self.cloudlets.insert(cloudlet_id, cloudlet);
        let status = self.vms.get(&vm_id).map(|vm| vm.borrow().status().clone());
        match status {
            Some(VmStatus::Running) => {
                self.ctx.emit_now(CloudletSubmitRequest { cloudlet_id }, self.datacenter_id);
            }
            Some(VmStatus::Requested) => {
                self.pending_dispatch.entry(vm_id).or_default().push(cloudlet_id);
            }
            _ => self.fail_cloudlet(cloudlet_id),
        }
    }

    fn fail_cloudlet(&mut self, cloudlet_id: u32) {
        if let Some(cloudlet) = self.cloudlets.get(&cloudlet_id) {
            cloudlet.borrow_mut().set_status(CloudletStatus::Failed);
        }
        self.callbacks.remove(&cloudlet_id);
        log_warn!(self.ctx, "cloudlet {} failed", cloudlet_id);
    }

    fn on_vm_created(&mut self, vm_id: u32) {
        self.unresolved_vms -= 1;
        if let Some(waiting) = self.pending_dispatch.remove(&vm_id) {
            for cloudlet_id in waiting {
                self.ctx.emit_now(CloudletSubmitRequest { cloudlet_id }, self.datacenter_id);
            }
        }
        self.check_teardown();
    }

    fn on_vm_creation_failed(&mut self, vm_id: u32) {
        log_warn!(self.ctx, "failed to create vm {}", vm_id);
        self.unresolved_vms -= 1;
        if let Some(waiting) = self.pending_dispatch.remove(&vm_id) {
            for cloudlet_id in waiting {
                self.fail_cloudlet(cloudlet_id);
            }
        }
        self.check_teardown();
    }

    fn on_cloudlet_finished(&mut self, cloudlet_id: u32, vm_id: u32) {
        let time = self.ctx.time();
        self.finished.push((cloudlet_id, time));
        log_debug!(self.ctx, "cloudlet {} finished on vm {}", cloudlet_id, vm_id);
        if let Some(mut callback) = self.callbacks.remove(&cloudlet_id) {
            let feedback = match self.cloudlets.get(&cloudlet_id) {
                Some(cloudlet) => callback.on_completion(&cloudlet.borrow(), time),
                None => Feedback::Done,
            };
            match feedback {
                Feedback::Chain(replacement) => {
                    let replacement = self.registry.borrow_mut().register_cloudlet(replacement);
                    self.callbacks.insert(replacement.borrow().id, callback);
                    self.accept_cloudlet(replacement, vm_id);
                }
                Feedback::Last(replacement) => {
                    let replacement = self.registry.borrow_mut().register_cloudlet(replacement);
                    self.accept_cloudlet(replacement, vm_id);
                }
                Feedback::Done => {}
            }
        }
        self.check_teardown();
    }

    /// Destroys the broker's running VMs once no work can arrive anymore.
    fn check_teardown(&mut self) {
        if self.teardown_done || self.unresolved_vms > 0 || !self.callbacks.is_empty() {
            return;
        }
        if self.cloudlets.values().any(|c| !c.borrow().is_terminal()) {
            return;
        }
        self.teardown_done = true;
        let running: Vec<u32> = self
            .vms
            .iter()
            .filter(|(_, vm)| *vm.borrow().status() == VmStatus::Running)
            .map(|(&vm_id, _)| vm_id)
            .collect();
        for vm_id in running {
            self.ctx.emit_now(VmDestroyRequest { vm_id }, self.datacenter_id);
        }
    }
}

impl EventHandler for Broker {
    fn on(&mut self, event: Event) {
        cast!(match event.data {
            VmCreated { vm_id, host_id } => {
                log_debug!(self.ctx, "vm {} created on host {}", vm_id, host_id);
                self.on_vm_created(vm_id);
            }
            VmCreationFailed { vm_id } => {
                self.on_vm_creation_failed(vm_id);
            }
            CloudletFinished { cloudlet_id, vm_id } => {
                self.on_cloudlet_finished(cloudlet_id, vm_id);
            }
            CloudletFailed { cloudlet_id } => {
                self.fail_cloudlet(cloudlet_id);
                self.check_teardown();
            }
        })
    }
}
