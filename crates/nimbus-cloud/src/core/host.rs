//! Host component executing VMs and driving cloudlet progress.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use nimbus_core::cast;
use nimbus_core::context::SimulationContext;
use nimbus_core::event::{Event, EventId};
use nimbus_core::handler::EventHandler;
use nimbus_core::{log_debug, log_trace};

use crate::core::cloudlet::{Cloudlet, CloudletStatus};
use crate::core::common::{AllocationVerdict, Pe};
use crate::core::events::cloudlet::{CloudletFailed, CloudletFinished};
use crate::core::events::progress::ProgressUpdate;
use crate::core::provisioner::Provisioner;
use crate::core::vm::Vm;
use crate::core::vm_scheduler::{VmScheduler, VmSharing};

/// A physical host with a fixed set of PEs and scalar resources.
///
/// The host is the progress engine of the model: at every event affecting
/// its load it first advances all resident VM schedulers to the current
/// time, reports newly finished cloudlets to their brokers at zero delay,
/// and then cancels and reschedules a single self-event at the earliest
/// predicted completion. Between events all rates are constant, so the
/// prediction is exact unless an earlier event changes the load first.
pub struct Host {
    pub id: u32,
    pes: Vec<Pe>,
    vm_scheduler: Box<dyn VmScheduler>,
    memory: Provisioner,
    bandwidth: Provisioner,
    storage: Provisioner,
    vms: IndexMap<u32, Rc<RefCell<Vm>>>,
    progress_event: Option<EventId>,
    ctx: SimulationContext,
}

impl Host {
    pub fn new(
        pes: Vec<Pe>,
        memory: u64,
        bandwidth: u64,
        storage: u64,
        sharing: VmSharing,
        ctx: SimulationContext,
    ) -> Self {
        let vm_scheduler = sharing.scheduler(&pes);
        Self {
            id: ctx.id(),
            pes,
            vm_scheduler,
            memory: Provisioner::new(memory),
            bandwidth: Provisioner::new(bandwidth),
            storage: Provisioner::new(storage),
            vms: IndexMap::new(),
            progress_event: None,
            ctx,
        }
    }

    pub fn name(&self) -> &str {
        self.ctx.name()
    }

    pub fn pes(&self) -> &[Pe] {
        &self.pes
    }

    pub fn total_mips(&self) -> f64 {
        self.vm_scheduler.total_mips()
    }

    pub fn available_mips(&self) -> f64 {
        self.vm_scheduler.available_mips()
    }

    pub fn allocated_mips(&self) -> f64 {
        self.vm_scheduler.allocated_mips()
    }

    pub fn available_memory(&self) -> u64 {
        self.memory.available()
    }

    pub fn available_bandwidth(&self) -> u64 {
        self.bandwidth.available()
    }

    pub fn available_storage(&self) -> u64 {
        self.storage.available()
    }

    pub fn resident_vms(&self) -> usize {
        self.vms.len()
    }

    /// Checks the VM's resource vector against the host's free capacity
    /// without reserving anything.
    pub fn can_accept(&self, vm: &Vm) -> AllocationVerdict {
        if !self.vm_scheduler.can_allocate(vm.pes, vm.mips) {
            AllocationVerdict::NotEnoughPes
        } else if self.memory.available() < vm.memory {
            AllocationVerdict::NotEnoughMemory
        } else if self.bandwidth.available() < vm.bandwidth {
            AllocationVerdict::NotEnoughBandwidth
        } else if self.storage.available() < vm.storage {
            AllocationVerdict::NotEnoughStorage
        } else {
            AllocationVerdict::Success
        }
    }

    /// Reserves capacity across all resource dimensions and places the VM.
    ///
    /// The reservation is all-or-nothing: on a non-success verdict nothing
    /// is reserved and the host state is unchanged.
    pub fn accept_vm(&mut self, vm: Rc<RefCell<Vm>>, time: f64) -> AllocationVerdict {
        let verdict = self.can_accept(&vm.borrow());
        if verdict != AllocationVerdict::Success {
            return verdict;
        }
        self.advance(time);
        let (vm_id, shares) = {
            let v = vm.borrow();
            match self.vm_scheduler.allocate(v.id, v.pes, v.mips) {
                Some(shares) => {
                    self.memory.allocate(v.id, v.memory);
                    self.bandwidth.allocate(v.id, v.bandwidth);
                    self.storage.allocate(v.id, v.storage);
                    (v.id, shares)
                }
                None => return AllocationVerdict::NotEnoughPes,
            }
        };
        vm.borrow_mut().place(self.id, shares, time);
        self.vms.insert(vm_id, vm);
        log_debug!(self.ctx, "placed vm {}", vm_id);
        self.reschedule_progress(time);
        verdict
    }

    /// Releases the VM's capacity across all resource dimensions.
    pub fn release_vm(&mut self, vm_id: u32, time: f64) {
        self.advance(time);
        if let Some(vm) = self.vms.shift_remove(&vm_id) {
            self.vm_scheduler.deallocate(vm_id);
            self.memory.deallocate(vm_id);
            self.bandwidth.deallocate(vm_id);
            self.storage.deallocate(vm_id);
            vm.borrow_mut().evict();
            log_debug!(self.ctx, "released vm {}", vm_id);
        }
        self.reschedule_progress(time);
    }

    /// Hands a cloudlet to its bound VM's scheduler, or reports failure if
    /// the cloudlet cannot run on that VM at all.
    pub fn submit_cloudlet(&mut self, cloudlet: Rc<RefCell<Cloudlet>>, time: f64) {
        self.advance(time);
        let vm_id = cloudlet.borrow().vm_id();
        let vm = vm_id.and_then(|id| self.vms.get(&id)).cloned();
        match vm {
            Some(vm) if cloudlet.borrow().pes <= vm.borrow().pes => {
                vm.borrow_mut().submit_cloudlet(cloudlet, time);
            }
            _ => {
                let mut c = cloudlet.borrow_mut();
                c.set_status(CloudletStatus::Failed);
                if let Some(broker) = c.broker_id() {
                    self.ctx.emit_now(CloudletFailed { cloudlet_id: c.id }, broker);
                }
            }
        }
        self.reschedule_progress(time);
    }

    /// Advances all resident VM schedulers to the given time and reports
    /// newly finished cloudlets to their brokers at zero delay.
    pub fn advance(&mut self, time: f64) {
        let mut finished = Vec::new();
        for vm in self.vms.values() {
            finished.extend(vm.borrow_mut().advance(time));
        }
        for cloudlet in finished {
            let mut c = cloudlet.borrow_mut();
            c.set_status(CloudletStatus::Finished);
            c.set_finish_time(time);
            log_trace!(self.ctx, "cloudlet {} finished", c.id);
            if let (Some(broker), Some(vm_id)) = (c.broker_id(), c.vm_id()) {
                self.ctx.emit_now(
                    CloudletFinished {
                        cloudlet_id: c.id,
                        vm_id,
                    },
                    broker,
                );
            }
        }
    }

    /// Called by the datacenter on each periodic update tick.
    pub fn periodic_update(&mut self, time: f64) {
        self.advance(time);
        self.reschedule_progress(time);
    }

    fn reschedule_progress(&mut self, time: f64) {
        if let Some(id) = self.progress_event.take() {
            self.ctx.cancel_event(id);
        }
        let next = self
            .vms
            .values()
            .filter_map(|vm| vm.borrow().next_completion(time))
            .min_by(|a, b| a.total_cmp(b));
        if let Some(completion) = next {
            self.progress_event = Some(self.ctx.emit_self(ProgressUpdate {}, completion - time));
        }
    }
}

impl EventHandler for Host {
    fn on(&mut self, event: Event) {
        cast!(match event.data {
            ProgressUpdate {} => {
                self.progress_event = None;
                let time = self.ctx.time();
                self.advance(time);
                self.reschedule_progress(time);
            }
        })
    }
}
