//! Representation of a virtual machine.

use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use serde::Serialize;

use nimbus_core::Id;

use crate::core::cloudlet::Cloudlet;
use crate::core::cloudlet_scheduler::{CloudletScheduler, CloudletSharing};

/// Lifecycle status of a VM.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum VmStatus {
    /// Submitted to a broker, placement not yet resolved.
    Requested,
    /// Placed on a host and consuming its resources.
    Running,
    /// Destroyed, resources returned to the host.
    Finished,
    /// No host could satisfy the resource vector.
    FailedToAllocate,
}

impl Display for VmStatus {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            VmStatus::Requested => write!(f, "requested"),
            VmStatus::Running => write!(f, "running"),
            VmStatus::Finished => write!(f, "finished"),
            VmStatus::FailedToAllocate => write!(f, "failed to allocate"),
        }
    }
}

/// A virtual machine with a fixed resource vector and an embedded cloudlet
/// scheduler.
///
/// The resource vector (PE count, required per-PE rate, memory, bandwidth,
/// storage) is immutable for the VM's lifetime. Once placed, the host hands
/// the granted per-PE MIPS shares to the embedded scheduler, which then
/// divides them among the VM's cloudlets.
pub struct Vm {
    pub id: u32,
    /// Number of required processing elements.
    pub pes: u32,
    /// Required instruction rate per PE in MIPS.
    pub mips: f64,
    pub memory: u64,
    pub bandwidth: u64,
    pub storage: u64,
    status: VmStatus,
    broker_id: Option<Id>,
    host_id: Option<u32>,
    scheduler: Box<dyn CloudletScheduler>,
    creation_time: f64,
}

impl Vm {
    /// Creates a VM; the id is assigned upon registration.
    pub fn new(pes: u32, mips: f64, memory: u64, bandwidth: u64, storage: u64, sharing: CloudletSharing) -> Self {
        Self {
            id: 0,
            pes,
            mips,
            memory,
            bandwidth,
            storage,
            status: VmStatus::Requested,
            broker_id: None,
            host_id: None,
            scheduler: sharing.scheduler(),
            creation_time: -1.,
        }
    }

    pub fn status(&self) -> &VmStatus {
        &self.status
    }

    pub fn set_status(&mut self, status: VmStatus) {
        self.status = status;
    }

    pub fn broker_id(&self) -> Option<Id> {
        self.broker_id
    }

    pub fn set_broker_id(&mut self, broker_id: Id) {
        self.broker_id = Some(broker_id);
    }

    pub fn host_id(&self) -> Option<u32> {
        self.host_id
    }

    pub fn creation_time(&self) -> f64 {
        self.creation_time
    }

    /// Records the placement and passes the granted per-PE shares to the
    /// cloudlet scheduler.
    pub fn place(&mut self, host_id: u32, shares: Vec<f64>, time: f64) {
        self.host_id = Some(host_id);
        self.creation_time = time;
        self.status = VmStatus::Running;
        self.scheduler.set_allocated_mips(shares);
    }

    /// Clears the placement on destroy.
    pub fn evict(&mut self) {
        self.host_id = None;
        self.status = VmStatus::Finished;
    }

    pub fn submit_cloudlet(&mut self, cloudlet: Rc<RefCell<Cloudlet>>, time: f64) {
        self.scheduler.submit(cloudlet, time);
    }

    /// Advances the embedded scheduler, returns the newly finished cloudlets.
    pub fn advance(&mut self, time: f64) -> Vec<Rc<RefCell<Cloudlet>>> {
        self.scheduler.advance(time)
    }

    pub fn next_completion(&self, time: f64) -> Option<f64> {
        self.scheduler.next_completion(time)
    }

    pub fn resident_cloudlets(&self) -> usize {
        self.scheduler.resident_count()
    }
}
