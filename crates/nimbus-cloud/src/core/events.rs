//! Standard simulation events.

// VM LIFECYCLE EVENTS /////////////////////////////////////////////////////////////////////////////

pub mod allocation {
    use serde::Serialize;

    /// Broker asks the datacenter to place a VM on some host.
    #[derive(Serialize)]
    pub struct VmCreationRequest {
        pub vm_id: u32,
    }

    /// Datacenter reports successful VM placement to the owning broker.
    #[derive(Serialize)]
    pub struct VmCreated {
        pub vm_id: u32,
        pub host_id: u32,
    }

    /// Datacenter reports that no host can satisfy the VM's resource vector.
    #[derive(Serialize)]
    pub struct VmCreationFailed {
        pub vm_id: u32,
    }

    /// Broker asks the datacenter to release the VM's resources.
    #[derive(Serialize)]
    pub struct VmDestroyRequest {
        pub vm_id: u32,
    }
}

// CLOUDLET EVENTS /////////////////////////////////////////////////////////////////////////////////

pub mod cloudlet {
    use serde::Serialize;

    /// Broker hands a cloudlet to the datacenter for execution on its bound VM.
    #[derive(Serialize)]
    pub struct CloudletSubmitRequest {
        pub cloudlet_id: u32,
    }

    /// Host reports cloudlet completion to the owning broker.
    ///
    /// Emitted with zero delay at the moment the remaining length reaches zero,
    /// so completion-triggered reactions run within the same simulated-time tick.
    #[derive(Serialize)]
    pub struct CloudletFinished {
        pub cloudlet_id: u32,
        pub vm_id: u32,
    }

    /// Cloudlet cannot run, e.g. its VM failed to allocate or its PE
    /// requirement exceeds the VM size.
    #[derive(Serialize)]
    pub struct CloudletFailed {
        pub cloudlet_id: u32,
    }
}

// PROGRESS EVENTS /////////////////////////////////////////////////////////////////////////////////

pub mod progress {
    use serde::Serialize;

    /// Host self-event scheduled at the earliest predicted cloudlet completion.
    #[derive(Serialize)]
    pub struct ProgressUpdate {}

    /// Datacenter self-event driving the periodic capacity-usage refresh chain.
    #[derive(Serialize)]
    pub struct ScheduledUpdate {}
}
