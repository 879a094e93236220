pub mod broker;
pub mod cloudlet;
pub mod cloudlet_scheduler;
pub mod common;
pub mod config;
pub mod datacenter;
pub mod events;
pub mod host;
pub mod provisioner;
pub mod registry;
pub mod utilization;
pub mod vm;
pub mod vm_allocation_policy;
pub mod vm_scheduler;
pub mod workload;
