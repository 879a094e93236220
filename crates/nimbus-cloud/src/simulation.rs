//! Simulation facade wiring all components together.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use sugars::{rc, refcell};

use nimbus_core::simulation::Simulation;

use crate::core::broker::Broker;
use crate::core::cloudlet::{Cloudlet, CloudletStatus};
use crate::core::common::Pe;
use crate::core::config::SimulationConfig;
use crate::core::datacenter::Datacenter;
use crate::core::host::Host;
use crate::core::registry::Registry;
use crate::core::utilization::UtilizationModel;
use crate::core::vm::Vm;
use crate::core::cloudlet_scheduler::CloudletSharing;
use crate::core::vm_allocation_policy::VmAllocationPolicy;
use crate::core::vm_scheduler::VmSharing;

/// Represents a cloud simulation, provides methods for its configuration and execution.
///
/// Components are registered through this facade, which owns the event
/// engine, the entity registry and the component handles. A scenario is
/// built by adding datacenters, hosts and brokers, registering VMs and
/// cloudlets, submitting them via a broker and calling [`run`](Self::run).
pub struct CloudSimulation {
    sim: Simulation,
    config: SimulationConfig,
    registry: Rc<RefCell<Registry>>,
    datacenters: IndexMap<u32, Rc<RefCell<Datacenter>>>,
    hosts: IndexMap<u32, Rc<RefCell<Host>>>,
    brokers: IndexMap<u32, Rc<RefCell<Broker>>>,
}

impl CloudSimulation {
    pub fn new(sim: Simulation, config: SimulationConfig) -> Self {
        Self {
            sim,
            config,
            registry: rc!(refcell!(Registry::new())),
            datacenters: IndexMap::new(),
            hosts: IndexMap::new(),
            brokers: IndexMap::new(),
        }
    }

    /// Creates a datacenter component with the given allocation policy.
    pub fn add_datacenter(&mut self, name: &str, policy: Box<dyn VmAllocationPolicy>) -> u32 {
        let ctx = self.sim.create_context(name);
        let datacenter = rc!(refcell!(Datacenter::new(
            policy,
            self.registry.clone(),
            self.config.clone(),
            ctx,
        )));
        let id = self.sim.add_handler(name, datacenter.clone());
        self.datacenters.insert(id, datacenter);
        id
    }

    /// Creates a host component and attaches it to the given datacenter.
    pub fn add_host(
        &mut self,
        name: &str,
        datacenter_id: u32,
        pes: Vec<Pe>,
        memory: u64,
        bandwidth: u64,
        storage: u64,
        sharing: VmSharing,
    ) -> u32 {
        let ctx = self.sim.create_context(name);
        let host = rc!(refcell!(Host::new(pes, memory, bandwidth, storage, sharing, ctx)));
        let id = self.sim.add_handler(name, host.clone());
        self.datacenters[&datacenter_id].borrow_mut().add_host(host.clone());
        self.hosts.insert(id, host);
        id
    }

    /// Creates a broker component bound to the given datacenter.
    pub fn add_broker(&mut self, name: &str, datacenter_id: u32) -> u32 {
        let ctx = self.sim.create_context(name);
        let broker = rc!(refcell!(Broker::new(datacenter_id, self.registry.clone(), ctx)));
        let id = self.sim.add_handler(name, broker.clone());
        self.brokers.insert(id, broker);
        id
    }

    /// Registers a VM and returns its id. The VM is inert until submitted
    /// via a broker.
    pub fn create_vm(
        &mut self,
        pes: u32,
        mips: f64,
        memory: u64,
        bandwidth: u64,
        storage: u64,
        sharing: CloudletSharing,
    ) -> u32 {
        let vm = Vm::new(pes, mips, memory, bandwidth, storage, sharing);
        let vm = self.registry.borrow_mut().register_vm(vm);
        let id = vm.borrow().id;
        id
    }

    /// Registers a cloudlet and returns its id. The cloudlet is inert
    /// until submitted via a broker.
    pub fn create_cloudlet(
        &mut self,
        length: f64,
        pes: u32,
        file_size: u64,
        output_size: u64,
        utilization: Box<dyn UtilizationModel>,
    ) -> u32 {
        let cloudlet = Cloudlet::new(length, pes, file_size, output_size, utilization);
        let cloudlet = self.registry.borrow_mut().register_cloudlet(cloudlet);
        let id = cloudlet.borrow().id;
        id
    }

    /// Runs the simulation to completion or to the configured `max_time`.
    ///
    /// On a timeout all hosts are advanced to `max_time` for accurate
    /// remaining lengths and every non-terminal cloudlet is flushed with
    /// the aborted status, leaving the submitted and finished counts
    /// divergent as the failure signal.
    pub fn run(&mut self) {
        if self.config.max_time > 0. {
            let remaining = self.config.max_time - self.sim.time();
            let more = self.sim.step_for_duration(remaining);
            if more {
                self.flush_aborted();
            }
        } else {
            self.sim.step_until_no_events();
        }
    }

    fn flush_aborted(&mut self) {
        for datacenter in self.datacenters.values() {
            datacenter.borrow_mut().advance_hosts(self.config.max_time);
        }
        for cloudlet in self.registry.borrow().cloudlets() {
            let mut c = cloudlet.borrow_mut();
            if !c.is_terminal() {
                c.set_status(CloudletStatus::Aborted);
            }
        }
    }

    /// Steps through the simulation with duration limit.
    pub fn step_for_duration(&mut self, duration: f64) -> bool {
        self.sim.step_for_duration(duration)
    }

    /// Performs the specified number of steps through the simulation.
    pub fn steps(&mut self, step_count: u64) -> bool {
        self.sim.steps(step_count)
    }

    pub fn current_time(&self) -> f64 {
        self.sim.time()
    }

    /// Total number of created events.
    pub fn event_count(&self) -> u64 {
        self.sim.event_count()
    }

    pub fn registry(&self) -> Rc<RefCell<Registry>> {
        self.registry.clone()
    }

    pub fn datacenter(&self, id: u32) -> Rc<RefCell<Datacenter>> {
        self.datacenters[&id].clone()
    }

    pub fn host(&self, id: u32) -> Rc<RefCell<Host>> {
        self.hosts[&id].clone()
    }

    pub fn broker(&self, id: u32) -> Rc<RefCell<Broker>> {
        self.brokers[&id].clone()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}
