//! Datacenter component arbitrating host capacity.

use std::cell::RefCell;
use std::rc::Rc;

use nimbus_core::cast;
use nimbus_core::context::SimulationContext;
use nimbus_core::event::Event;
use nimbus_core::handler::EventHandler;
use nimbus_core::{log_debug, log_warn};

use crate::core::cloudlet::CloudletStatus;
use crate::core::common::AllocationVerdict;
use crate::core::config::SimulationConfig;
use crate::core::events::allocation::{VmCreated, VmCreationFailed, VmCreationRequest, VmDestroyRequest};
use crate::core::events::cloudlet::{CloudletFailed, CloudletSubmitRequest};
use crate::core::events::progress::ScheduledUpdate;
use crate::core::host::Host;
use crate::core::registry::Registry;
use crate::core::vm::{Vm, VmStatus};
use crate::core::vm_allocation_policy::VmAllocationPolicy;

/// The sole arbiter of host capacity.
///
/// Placement requests are resolved synchronously within the handling of a
/// single event: the policy selects a host and the reservation is applied
/// to it before the next event is processed, so two same-time requests can
/// never be granted the same capacity. Only the outcome travels as an
/// event back to the broker.
///
/// With a positive `scheduling_interval` the datacenter additionally
/// drives a periodic update chain that refreshes utilization sampling on
/// all hosts while any VM is resident.
pub struct Datacenter {
    pub id: u32,
    hosts: Vec<Rc<RefCell<Host>>>,
    policy: Box<dyn VmAllocationPolicy>,
    registry: Rc<RefCell<Registry>>,
    config: SimulationConfig,
    update_chain_active: bool,
    ctx: SimulationContext,
}

impl Datacenter {
    pub fn new(
        policy: Box<dyn VmAllocationPolicy>,
        registry: Rc<RefCell<Registry>>,
        config: SimulationConfig,
        ctx: SimulationContext,
    ) -> Self {
        Self {
            id: ctx.id(),
            hosts: Vec::new(),
            policy,
            registry,
            config,
            update_chain_active: false,
            ctx,
        }
    }

    pub fn add_host(&mut self, host: Rc<RefCell<Host>>) {
        self.hosts.push(host);
    }

    pub fn hosts(&self) -> &[Rc<RefCell<Host>>] {
        &self.hosts
    }

    fn host(&self, id: u32) -> Option<&Rc<RefCell<Host>>> {
        self.hosts.iter().find(|host| host.borrow().id == id)
    }

    /// Total number of VMs resident on this datacenter's hosts.
    pub fn resident_vms(&self) -> usize {
        self.hosts.iter().map(|host| host.borrow().resident_vms()).sum()
    }

    /// Advances all hosts to the given time, e.g. before a timeout flush.
    pub fn advance_hosts(&mut self, time: f64) {
        for host in &self.hosts {
            host.borrow_mut().advance(time);
        }
    }

    fn place_vm(&mut self, vm_id: u32) {
        let time = self.ctx.time();
        let vm = match self.registry.borrow().vm(vm_id) {
            Some(vm) => vm,
            None => {
                log_warn!(self.ctx, "placement request for unknown vm {}", vm_id);
                return;
            }
        };
        let broker = match vm.borrow().broker_id() {
            Some(broker) => broker,
            None => return,
        };
        let selected = self.policy.select_host(&vm.borrow(), &self.hosts);
        let placed = match selected {
            Some(host_id) => match self.host(host_id) {
                Some(host) => {
                    let verdict = host.borrow_mut().accept_vm(vm.clone(), time);
                    (verdict == AllocationVerdict::Success).then(|| host_id)
                }
                None => None,
            },
            None => None,
        };
        match placed {
            Some(host_id) => {
                log_debug!(self.ctx, "created vm {} on host {}", vm_id, host_id);
                self.ctx.emit_now(VmCreated { vm_id, host_id }, broker);
                if self.config.scheduling_interval > 0. && !self.update_chain_active {
                    self.update_chain_active = true;
                    self.ctx.emit_self(ScheduledUpdate {}, self.config.scheduling_interval);
                }
            }
            None => {
                log_warn!(self.ctx, "not enough resources to create vm {}", vm_id);
                vm.borrow_mut().set_status(VmStatus::FailedToAllocate);
                self.ctx.emit_now(VmCreationFailed { vm_id }, broker);
            }
        }
    }

    fn destroy_vm(&mut self, vm_id: u32) {
        let time = self.ctx.time();
        let host_id = self
            .registry
            .borrow()
            .vm(vm_id)
            .and_then(|vm: Rc<RefCell<Vm>>| vm.borrow().host_id());
        if let Some(host) = host_id.and_then(|id| self.host(id)) {
            host.borrow_mut().release_vm(vm_id, time);
            log_debug!(self.ctx, "destroyed vm {}", vm_id);
        }
    }

    fn route_cloudlet(&mut self, cloudlet_id: u32) {
        let time = self.ctx.time();
        let cloudlet = match self.registry.borrow().cloudlet(cloudlet_id) {
            Some(cloudlet) => cloudlet,
            None => {
                log_warn!(self.ctx, "submit request for unknown cloudlet {}", cloudlet_id);
                return;
            }
        };
        let host_id = cloudlet
            .borrow()
            .vm_id()
            .and_then(|vm_id| self.registry.borrow().vm(vm_id))
            .filter(|vm| *vm.borrow().status() == VmStatus::Running)
            .and_then(|vm| vm.borrow().host_id());
        match host_id.and_then(|id| self.host(id)) {
            Some(host) => {
                host.borrow_mut().submit_cloudlet(cloudlet, time);
            }
            None => {
                let mut c = cloudlet.borrow_mut();
                c.set_status(CloudletStatus::Failed);
                if let Some(broker) = c.broker_id() {
                    self.ctx.emit_now(CloudletFailed { cloudlet_id }, broker);
                }
            }
        }
    }

    fn periodic_update(&mut self) {
        let time = self.ctx.time();
        for host in &self.hosts {
            host.borrow_mut().periodic_update(time);
        }
        if self.resident_vms() > 0 {
            self.ctx.emit_self(ScheduledUpdate {}, self.config.scheduling_interval);
        } else {
            self.update_chain_active = false;
        }
    }
}

impl EventHandler for Datacenter {
    fn on(&mut self, event: Event) {
        cast!(match event.data {
            VmCreationRequest { vm_id } => {
                self.place_vm(vm_id);
            }
            VmDestroyRequest { vm_id } => {
                self.destroy_vm(vm_id);
            }
            CloudletSubmitRequest { cloudlet_id } => {
                self.route_cloudlet(cloudlet_id);
            }
            ScheduledUpdate {} => {
                self.periodic_update();
            }
        })
    }
}
