use std::fmt::{Display, Formatter};

use serde::Serialize;

/// Processing element, a fungible unit of CPU capacity with a fixed instruction rate.
///
/// Once allocated to a VM only the rate matters, not the identity.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Pe {
    /// Instruction rate in millions of instructions per second.
    pub mips: f64,
}

impl Pe {
    pub fn new(mips: f64) -> Self {
        Self { mips }
    }
}

/// Result of checking a VM's resource vector against host capacity.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum AllocationVerdict {
    Success,
    NotEnoughPes,
    NotEnoughMemory,
    NotEnoughBandwidth,
    NotEnoughStorage,
}

/// Caller errors on the broker submission boundary.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmissionError {
    /// The entity is already tracked by a broker.
    DuplicateSubmission,
    /// A cloudlet was bound to a VM not submitted via this broker.
    UnknownVm,
    /// The cloudlet id is not present in the registry.
    UnknownCloudlet,
    /// Round-robin binding was requested but the broker has no VMs.
    NoSubmittedVms,
}

impl Display for SubmissionError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            SubmissionError::DuplicateSubmission => write!(f, "entity is already submitted"),
            SubmissionError::UnknownVm => write!(f, "target VM is not submitted via this broker"),
            SubmissionError::UnknownCloudlet => write!(f, "cloudlet is not registered"),
            SubmissionError::NoSubmittedVms => write!(f, "broker has no VMs to bind the cloudlet to"),
        }
    }
}

impl std::error::Error for SubmissionError {}
