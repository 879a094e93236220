//! Provisioning of scalar host resources.

use std::collections::HashMap;

/// Reserves and releases slices of a scalar host resource (memory,
/// bandwidth or storage) on behalf of VMs.
///
/// Grants are all-or-nothing: a request larger than the free amount fails
/// without partial allocation. Releasing a grant returns exactly the
/// granted amount, so an identical request always succeeds afterwards.
pub struct Provisioner {
    total: u64,
    available: u64,
    grants: HashMap<u32, u64>,
}

impl Provisioner {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            available: total,
            grants: HashMap::new(),
        }
    }

    /// Tries to reserve `amount` for the requester, returns whether the grant succeeded.
    pub fn allocate(&mut self, requester: u32, amount: u64) -> bool {
        if self.grants.contains_key(&requester) || self.available < amount {
            return false;
        }
        self.available -= amount;
        self.grants.insert(requester, amount);
        true
    }

    /// Releases the requester's grant, if any.
    pub fn deallocate(&mut self, requester: u32) {
        if let Some(amount) = self.grants.remove(&requester) {
            self.available += amount;
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn available(&self) -> u64 {
        self.available
    }

    pub fn allocated(&self) -> u64 {
        self.total - self.available
    }
}
