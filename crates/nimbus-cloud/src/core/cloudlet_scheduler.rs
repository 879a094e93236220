//! VM-level cloudlet schedulers dividing a VM's allocated capacity among
//! its resident cloudlets.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde::Serialize;

use nimbus_core::EPSILON;

use crate::core::cloudlet::{Cloudlet, CloudletStatus};

/// Mirrors the host-level scheduler pattern one level down: decides how the
/// MIPS shares granted to a VM are divided among its cloudlets and performs
/// the progress accounting.
///
/// At every affecting event the owning host calls [`advance`] first, which
/// consumes `elapsed × rate × utilization` instructions per cloudlet at the
/// rates in effect since the previous update, and only then mutates the
/// cloudlet set. The utilization fraction is sampled at the start of each
/// accounting interval.
///
/// [`advance`]: CloudletScheduler::advance
pub trait CloudletScheduler {
    /// Sets the per-PE MIPS shares granted to the owning VM by its host.
    fn set_allocated_mips(&mut self, shares: Vec<f64>);

    /// Accepts a cloudlet for execution at the given time.
    fn submit(&mut self, cloudlet: Rc<RefCell<Cloudlet>>, time: f64);

    /// Advances execution of resident cloudlets to the given time and
    /// returns the cloudlets that have run to completion.
    fn advance(&mut self, time: f64) -> Vec<Rc<RefCell<Cloudlet>>>;

    /// Earliest predicted completion time at the current rates, if any
    /// cloudlet is making progress.
    fn next_completion(&self, time: f64) -> Option<f64>;

    /// Number of resident (executing or waiting) cloudlets.
    fn resident_count(&self) -> usize;
}

/// VM PE sharing modes for cloudlets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum CloudletSharing {
    /// All cloudlets execute concurrently on proportional MIPS shares.
    TimeShared,
    /// Whole PEs per cloudlet, excess cloudlets queue FIFO.
    SpaceShared,
}

impl CloudletSharing {
    pub fn scheduler(&self) -> Box<dyn CloudletScheduler> {
        match self {
            CloudletSharing::TimeShared => Box::new(TimeSharedCloudletScheduler::new()),
            CloudletSharing::SpaceShared => Box::new(SpaceSharedCloudletScheduler::new()),
        }
    }
}

fn capacity(shares: &[f64]) -> f64 {
    shares.iter().sum()
}

fn per_pe_share(shares: &[f64]) -> f64 {
    if shares.is_empty() {
        0.
    } else {
        capacity(shares) / shares.len() as f64
    }
}

/// Divides the VM's aggregate MIPS among all resident cloudlets.
///
/// Each cloudlet demands `pes × per-PE share`; when total demand exceeds
/// the VM capacity all rates are scaled down proportionally, so the policy
/// is work-conserving and starvation-free.
pub struct TimeSharedCloudletScheduler {
    shares: Vec<f64>,
    cloudlets: Vec<Rc<RefCell<Cloudlet>>>,
    last_update: f64,
}

impl TimeSharedCloudletScheduler {
    pub fn new() -> Self {
        Self {
            shares: Vec::new(),
            cloudlets: Vec::new(),
            last_update: 0.,
        }
    }

    fn scale(&self) -> f64 {
        let cap = capacity(&self.shares);
        let per_pe = per_pe_share(&self.shares);
        let demand: f64 = self.cloudlets.iter().map(|c| c.borrow().pes as f64 * per_pe).sum();
        if demand > cap {
            cap / demand
        } else {
            1.
        }
    }
}

impl Default for TimeSharedCloudletScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl CloudletScheduler for TimeSharedCloudletScheduler {
    fn set_allocated_mips(&mut self, shares: Vec<f64>) {
        self.shares = shares;
    }

    fn submit(&mut self, cloudlet: Rc<RefCell<Cloudlet>>, time: f64) {
        {
            let mut c = cloudlet.borrow_mut();
            c.set_start_time(time);
            c.set_status(CloudletStatus::Executing);
        }
        self.cloudlets.push(cloudlet);
    }

    fn advance(&mut self, time: f64) -> Vec<Rc<RefCell<Cloudlet>>> {
        let elapsed = time - self.last_update;
        if elapsed > EPSILON && !self.cloudlets.is_empty() {
            let per_pe = per_pe_share(&self.shares);
            let scale = self.scale();
            let at = self.last_update;
            for cloudlet in &self.cloudlets {
                let mut c = cloudlet.borrow_mut();
                let rate = c.pes as f64 * per_pe * scale * c.utilization_fraction(at);
                c.progress(rate * elapsed);
            }
        }
        self.last_update = time;
        let (finished, running) = self
            .cloudlets
            .drain(..)
            .partition(|c| c.borrow().is_completed());
        self.cloudlets = running;
        finished
    }

    fn next_completion(&self, time: f64) -> Option<f64> {
        let per_pe = per_pe_share(&self.shares);
        let scale = self.scale();
        self.cloudlets
            .iter()
            .filter_map(|cloudlet| {
                let c = cloudlet.borrow();
                let rate = c.pes as f64 * per_pe * scale * c.utilization_fraction(time);
                if rate > EPSILON {
                    Some(time + c.remaining() / rate)
                } else {
                    None
                }
            })
            .min_by(|a, b| a.total_cmp(b))
    }

    fn resident_count(&self) -> usize {
        self.cloudlets.len()
    }
}

/// Assigns whole PEs to individual cloudlets and queues the excess FIFO
/// until a PE frees.
pub struct SpaceSharedCloudletScheduler {
    shares: Vec<f64>,
    free_pes: u32,
    executing: Vec<Rc<RefCell<Cloudlet>>>,
    waiting: VecDeque<Rc<RefCell<Cloudlet>>>,
    last_update: f64,
}

impl SpaceSharedCloudletScheduler {
    pub fn new() -> Self {
        Self {
            shares: Vec::new(),
            free_pes: 0,
            executing: Vec::new(),
            waiting: VecDeque::new(),
            last_update: 0.,
        }
    }

    fn start(&mut self, cloudlet: Rc<RefCell<Cloudlet>>, time: f64) {
        {
            let mut c = cloudlet.borrow_mut();
            self.free_pes -= c.pes;
            c.set_start_time(time);
            c.set_status(CloudletStatus::Executing);
        }
        self.executing.push(cloudlet);
    }

    fn dispatch_waiting(&mut self, time: f64) {
        while let Some(front) = self.waiting.front() {
            if front.borrow().pes > self.free_pes {
                break;
            }
            let cloudlet = self.waiting.pop_front().unwrap();
            self.start(cloudlet, time);
        }
    }
}

impl Default for SpaceSharedCloudletScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl CloudletScheduler for SpaceSharedCloudletScheduler {
    fn set_allocated_mips(&mut self, shares: Vec<f64>) {
        self.free_pes = shares.len() as u32;
        self.shares = shares;
    }

    fn submit(&mut self, cloudlet: Rc<RefCell<Cloudlet>>, time: f64) {
        if cloudlet.borrow().pes <= self.free_pes {
            self.start(cloudlet, time);
        } else {
            cloudlet.borrow_mut().set_status(CloudletStatus::Waiting);
            self.waiting.push_back(cloudlet);
        }
    }

    fn advance(&mut self, time: f64) -> Vec<Rc<RefCell<Cloudlet>>> {
        let elapsed = time - self.last_update;
        if elapsed > EPSILON {
            let per_pe = per_pe_share(&self.shares);
            let at = self.last_update;
            for cloudlet in &self.executing {
                let mut c = cloudlet.borrow_mut();
                let rate = c.pes as f64 * per_pe * c.utilization_fraction(at);
                c.progress(rate * elapsed);
            }
        }
        self.last_update = time;
        let (finished, running): (Vec<_>, Vec<_>) = self
            .executing
            .drain(..)
            .partition(|c| c.borrow().is_completed());
        self.executing = running;
        for cloudlet in &finished {
            self.free_pes += cloudlet.borrow().pes;
        }
        self.dispatch_waiting(time);
        finished
    }

    fn next_completion(&self, time: f64) -> Option<f64> {
        let per_pe = per_pe_share(&self.shares);
        self.executing
            .iter()
            .filter_map(|cloudlet| {
                let c = cloudlet.borrow();
                let rate = c.pes as f64 * per_pe * c.utilization_fraction(time);
                if rate > EPSILON {
                    Some(time + c.remaining() / rate)
                } else {
                    None
                }
            })
            .min_by(|a, b| a.total_cmp(b))
    }

    fn resident_count(&self) -> usize {
        self.executing.len() + self.waiting.len()
    }
}
