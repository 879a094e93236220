//! Representation of a cloudlet, an abstract unit of work.

use std::fmt::{Display, Formatter};

use serde::Serialize;

use nimbus_core::{Id, EPSILON};

use crate::core::utilization::UtilizationModel;

/// Lifecycle status of a cloudlet.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum CloudletStatus {
    /// Handed to a broker, not yet resident on a VM.
    Submitted,
    /// Queued on a VM waiting for a free processing element.
    Waiting,
    /// Consuming capacity on a VM.
    Executing,
    /// Remaining length reached zero.
    Finished,
    /// The bound VM never obtained a host, or the cloudlet cannot fit on it.
    Failed,
    /// Flushed unfinished when the run hit the configured time limit.
    Aborted,
}

impl Display for CloudletStatus {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            CloudletStatus::Submitted => write!(f, "submitted"),
            CloudletStatus::Waiting => write!(f, "waiting"),
            CloudletStatus::Executing => write!(f, "executing"),
            CloudletStatus::Finished => write!(f, "finished"),
            CloudletStatus::Failed => write!(f, "failed"),
            CloudletStatus::Aborted => write!(f, "aborted"),
        }
    }
}

/// An abstract unit of work sized in millions of instructions.
///
/// A cloudlet consumes its length at the MIPS rate granted by its VM's
/// cloudlet scheduler, scaled by the utilization model. File and output
/// sizes describe the data transferred in and out; they are carried for
/// the driver but do not affect execution timing in this model.
pub struct Cloudlet {
    pub id: u32,
    /// Total instruction length in millions of instructions.
    pub length: f64,
    /// Number of processing elements the cloudlet occupies.
    pub pes: u32,
    pub file_size: u64,
    pub output_size: u64,
    utilization: Box<dyn UtilizationModel>,
    remaining: f64,
    status: CloudletStatus,
    vm_id: Option<u32>,
    broker_id: Option<Id>,
    submit_time: f64,
    start_time: f64,
    finish_time: f64,
}

impl Cloudlet {
    /// Creates a cloudlet; the id is assigned upon registration.
    pub fn new(length: f64, pes: u32, file_size: u64, output_size: u64, utilization: Box<dyn UtilizationModel>) -> Self {
        Self {
            id: 0,
            length,
            pes,
            file_size,
            output_size,
            utilization,
            remaining: length,
            status: CloudletStatus::Submitted,
            vm_id: None,
            broker_id: None,
            submit_time: -1.,
            start_time: -1.,
            finish_time: -1.,
        }
    }

    pub fn status(&self) -> &CloudletStatus {
        &self.status
    }

    pub fn set_status(&mut self, status: CloudletStatus) {
        self.status = status;
    }

    /// Whether the cloudlet reached a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            CloudletStatus::Finished | CloudletStatus::Failed | CloudletStatus::Aborted
        )
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Consumes the given amount of instructions.
    pub fn progress(&mut self, instructions: f64) {
        self.remaining = (self.remaining - instructions).max(0.);
    }

    /// Completion is detected by the remaining length dropping to (nearly)
    /// zero, never by exact equality, to tolerate floating-point step
    /// accumulation.
    pub fn is_completed(&self) -> bool {
        self.remaining <= EPSILON
    }

    /// Utilization fraction at the given simulation time.
    pub fn utilization_fraction(&self, time: f64) -> f64 {
        self.utilization.fraction(time, time - self.start_time)
    }

    pub fn vm_id(&self) -> Option<u32> {
        self.vm_id
    }

    pub fn bind_to_vm(&mut self, vm_id: u32) {
        self.vm_id = Some(vm_id);
    }

    pub fn broker_id(&self) -> Option<Id> {
        self.broker_id
    }

    pub fn set_broker_id(&mut self, broker_id: Id) {
        self.broker_id = Some(broker_id);
    }

    pub fn submit_time(&self) -> f64 {
        self.submit_time
    }

    pub fn set_submit_time(&mut self, time: f64) {
        self.submit_time = time;
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn set_start_time(&mut self, time: f64) {
        self.start_time = time;
    }

    pub fn finish_time(&self) -> f64 {
        self.finish_time
    }

    pub fn set_finish_time(&mut self, time: f64) {
        self.finish_time = time;
    }
}
