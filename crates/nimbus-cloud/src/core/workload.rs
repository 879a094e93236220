//! Workload drivers reacting to cloudlet completions.

use crate::core::cloudlet::Cloudlet;
use crate::core::utilization::UtilizationModel;

/// Reaction of a completion callback.
pub enum Feedback {
    /// Submit the replacement and keep the callback attached to it.
    Chain(Cloudlet),
    /// Submit the replacement without any callback.
    Last(Cloudlet),
    /// Nothing more to submit.
    Done,
}

/// Runs synchronously in the broker when a cloudlet it is attached to
/// finishes, optionally producing a replacement cloudlet.
///
/// The broker never dispatches the replacement recursively: it is
/// re-enqueued as a zero-delay event at the completion timestamp, so a
/// callback cannot re-enter the progress accounting of the same tick.
pub trait CompletionCallback {
    fn on_completion(&mut self, finished: &Cloudlet, time: f64) -> Feedback;
}

/// A mold for stamping out identical cloudlets.
#[derive(Clone)]
pub struct CloudletTemplate {
    pub length: f64,
    pub pes: u32,
    pub file_size: u64,
    pub output_size: u64,
    pub utilization: Box<dyn UtilizationModel>,
}

impl CloudletTemplate {
    pub fn new(length: f64, pes: u32, file_size: u64, output_size: u64, utilization: Box<dyn UtilizationModel>) -> Self {
        Self {
            length,
            pes,
            file_size,
            output_size,
            utilization,
        }
    }

    pub fn instantiate(&self) -> Cloudlet {
        Cloudlet::new(
            self.length,
            self.pes,
            self.file_size,
            self.output_size,
            self.utilization.clone(),
        )
    }
}

/// Keeps exactly one cloudlet in flight by submitting a replacement on
/// each completion, stopping after a fixed total number of submissions.
///
/// Attach it to the first submitted cloudlet; the final submission is made
/// without a callback, so exactly `total` cloudlets ever enter the system.
pub struct CloudletChain {
    template: CloudletTemplate,
    remaining: u32,
}

impl CloudletChain {
    /// `total` counts all submissions including the cloudlet the chain is
    /// attached to.
    pub fn new(template: CloudletTemplate, total: u32) -> Self {
        Self {
            template,
            remaining: total.saturating_sub(1),
        }
    }
}

impl CompletionCallback for CloudletChain {
    fn on_completion(&mut self, _finished: &Cloudlet, _time: f64) -> Feedback {
        match self.remaining {
            0 => Feedback::Done,
            1 => {
                self.remaining = 0;
                Feedback::Last(self.template.instantiate())
            }
            _ => {
                self.remaining -= 1;
                Feedback::Chain(self.template.instantiate())
            }
        }
    }
}
