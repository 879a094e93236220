//! Cloudlet utilization models.

use dyn_clone::{clone_trait_object, DynClone};

/// Determines what fraction of the capacity assigned to a cloudlet it
/// actually consumes at the given moment.
///
/// `time` is the current simulation time, `time_from_start` is the time
/// since the cloudlet started executing. The fraction is sampled at update
/// events and treated as constant until the next one, so a positive
/// scheduling interval refines the sampling of time-varying models.
pub trait UtilizationModel: DynClone {
    fn fraction(&self, time: f64, time_from_start: f64) -> f64;
}

clone_trait_object!(UtilizationModel);

/// The cloudlet consumes all capacity assigned to it.
#[derive(Clone)]
pub struct FullUtilization;

impl FullUtilization {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for FullUtilization {
    fn default() -> Self {
        Self::new()
    }
}

impl UtilizationModel for FullUtilization {
    fn fraction(&self, _time: f64, _time_from_start: f64) -> f64 {
        1.
    }
}

/// A fixed fraction of the assigned capacity.
#[derive(Clone)]
pub struct ConstantUtilization {
    fraction: f64,
}

impl ConstantUtilization {
    pub fn new(fraction: f64) -> Self {
        Self { fraction }
    }
}

impl UtilizationModel for ConstantUtilization {
    fn fraction(&self, _time: f64, _time_from_start: f64) -> f64 {
        self.fraction
    }
}

/// Utilization switching from one fraction to another at a fixed offset
/// from the cloudlet start, e.g. to model a warm-up phase.
#[derive(Clone)]
pub struct SteppedUtilization {
    before: f64,
    after: f64,
    switch_offset: f64,
}

impl SteppedUtilization {
    pub fn new(before: f64, after: f64, switch_offset: f64) -> Self {
        Self {
            before,
            after,
            switch_offset,
        }
    }
}

impl UtilizationModel for SteppedUtilization {
    fn fraction(&self, _time: f64, time_from_start: f64) -> f64 {
        if time_from_start < self.switch_offset {
            self.before
        } else {
            self.after
        }
    }
}
