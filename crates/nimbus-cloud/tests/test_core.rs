use nimbus_core::simulation::Simulation;

use nimbus_cloud::core::cloudlet::CloudletStatus;
use nimbus_cloud::core::cloudlet_scheduler::CloudletSharing;
use nimbus_cloud::core::common::{Pe, SubmissionError};
use nimbus_cloud::core::config::SimulationConfig;
use nimbus_cloud::core::utilization::{ConstantUtilization, FullUtilization, SteppedUtilization};
use nimbus_cloud::core::vm::VmStatus;
use nimbus_cloud::core::vm_allocation_policy::{FirstFit, WorstFit};
use nimbus_cloud::core::vm_scheduler::VmSharing;
use nimbus_cloud::core::workload::{CloudletChain, CloudletTemplate};
use nimbus_cloud::simulation::CloudSimulation;

fn name_wrapper(file_name: &str) -> String {
    format!("test-configs/{}", file_name)
}

fn make_simulation() -> Simulation {
    let _ = env_logger::builder().is_test(true).try_init();
    Simulation::new(123)
}

fn uniform_pes(count: usize, mips: f64) -> Vec<Pe> {
    vec![Pe::new(mips); count]
}

#[test]
// One host with four 1000 MIPS PEs, one VM requesting all four PEs at a
// modest required rate, one cloudlet of 100000 MI on a single PE.
// The space-shared host scheduler grants the VM whole PEs at their native
// rate, so the cloudlet runs at 1000 MIPS and finishes at exactly 100.0.
fn test_single_cloudlet_exact_finish() {
    let sim = make_simulation();
    let sim_config = SimulationConfig::from_file(&name_wrapper("config.yaml"));
    let mut cloud_sim = CloudSimulation::new(sim, sim_config);

    let dc = cloud_sim.add_datacenter("dc", Box::new(FirstFit::new()));
    cloud_sim.add_host("h", dc, uniform_pes(4, 1000.), 8192, 1000, 100000, VmSharing::SpaceShared);
    let b = cloud_sim.add_broker("b", dc);

    let vm = cloud_sim.create_vm(4, 100., 4096, 100, 10000, CloudletSharing::TimeShared);
    let cloudlet = cloud_sim.create_cloudlet(100000., 1, 300, 300, Box::new(FullUtilization::new()));

    let broker = cloud_sim.broker(b);
    broker.borrow_mut().submit_vm(vm).unwrap();
    broker.borrow_mut().submit_cloudlet(cloudlet, Some(vm)).unwrap();
    cloud_sim.run();

    let broker = broker.borrow();
    assert_eq!(broker.submitted_cloudlets(), 1);
    assert_eq!(broker.finished_cloudlets(), [(cloudlet, 100.)]);
    assert_eq!(broker.vm_status(vm), Some(VmStatus::Finished));
    assert_eq!(cloud_sim.current_time(), 100.);

    let registry = cloud_sim.registry();
    let registry = registry.borrow();
    let c = registry.cloudlet(cloudlet).unwrap();
    assert_eq!(*c.borrow().status(), CloudletStatus::Finished);
    assert_eq!(c.borrow().start_time(), 0.);
    assert_eq!(c.borrow().finish_time(), 100.);
}

#[test]
// Two hosts fitting one VM each under first fit. The third same-time
// placement request finds no capacity: the VM ends up failed and its
// cloudlet never reaches the finished list.
fn test_first_fit_exhaustion() {
    let sim = make_simulation();
    let sim_config = SimulationConfig::from_file(&name_wrapper("config.yaml"));
    let mut cloud_sim = CloudSimulation::new(sim, sim_config);

    let dc = cloud_sim.add_datacenter("dc", Box::new(FirstFit::new()));
    let h1 = cloud_sim.add_host("h1", dc, uniform_pes(4, 1000.), 8192, 1000, 100000, VmSharing::SpaceShared);
    let h2 = cloud_sim.add_host("h2", dc, uniform_pes(4, 1000.), 8192, 1000, 100000, VmSharing::SpaceShared);
    let b = cloud_sim.add_broker("b", dc);

    let mut vms = Vec::new();
    let mut cloudlets = Vec::new();
    for _ in 0..3 {
        vms.push(cloud_sim.create_vm(4, 1000., 4096, 100, 10000, CloudletSharing::TimeShared));
        cloudlets.push(cloud_sim.create_cloudlet(1000., 1, 0, 0, Box::new(FullUtilization::new())));
    }

    let broker = cloud_sim.broker(b);
    broker.borrow_mut().submit_vm_list(&vms).unwrap();
    for (&cloudlet, &vm) in cloudlets.iter().zip(vms.iter()) {
        broker.borrow_mut().submit_cloudlet(cloudlet, Some(vm)).unwrap();
    }
    cloud_sim.run();

    let registry = cloud_sim.registry();
    let registry = registry.borrow();
    assert_eq!(registry.vm(vms[0]).unwrap().borrow().host_id(), None);
    let broker = broker.borrow();
    assert_eq!(broker.vm_status(vms[2]), Some(VmStatus::FailedToAllocate));
    assert_eq!(broker.submitted_cloudlets(), 3);
    let finished: Vec<u32> = broker.finished_cloudlets().iter().map(|&(id, _)| id).collect();
    assert_eq!(finished, vec![cloudlets[0], cloudlets[1]]);
    assert_eq!(
        *registry.cloudlet(cloudlets[2]).unwrap().borrow().status(),
        CloudletStatus::Failed
    );

    // after teardown both hosts are empty again
    assert_eq!(cloud_sim.host(h1).borrow().resident_vms(), 0);
    assert_eq!(cloud_sim.host(h2).borrow().resident_vms(), 0);
}

#[test]
// Time-shared host admission is checked against aggregate capacity and
// granted shares never exceed it, whatever the submission order.
fn test_capacity_invariant() {
    let sim = make_simulation();
    let mut cloud_sim = CloudSimulation::new(sim, SimulationConfig::new());

    let dc = cloud_sim.add_datacenter("dc", Box::new(FirstFit::new()));
    let h = cloud_sim.add_host("h", dc, uniform_pes(2, 1000.), 8192, 1000, 100000, VmSharing::TimeShared);
    let b = cloud_sim.add_broker("b", dc);

    let mut vms = Vec::new();
    for _ in 0..3 {
        vms.push(cloud_sim.create_vm(2, 400., 1024, 100, 1000, CloudletSharing::TimeShared));
    }
    let cloudlet = cloud_sim.create_cloudlet(10000., 1, 0, 0, Box::new(FullUtilization::new()));

    let broker = cloud_sim.broker(b);
    broker.borrow_mut().submit_vm_list(&vms).unwrap();
    broker.borrow_mut().submit_cloudlet(cloudlet, Some(vms[0])).unwrap();
    cloud_sim.step_for_duration(5.);

    {
        let host = cloud_sim.host(h);
        let host = host.borrow();
        // 2 VMs x 800 MIPS admitted, the third would overflow 2000
        assert_eq!(host.allocated_mips(), 1600.);
        assert!(host.allocated_mips() <= host.total_mips());
        assert_eq!(broker.borrow().vm_status(vms[2]), Some(VmStatus::FailedToAllocate));
    }

    cloud_sim.run();
    // after teardown everything is returned to the pool
    let host = cloud_sim.host(h);
    let host = host.borrow();
    assert_eq!(host.allocated_mips(), 0.);
    assert_eq!(host.available_memory(), 8192);
}

#[test]
// Two runs from identical seeds and inputs produce identical completion
// lists and event counts.
fn test_determinism() {
    let run = || {
        let sim = make_simulation();
        let sim_config = SimulationConfig::from_file(&name_wrapper("config.yaml"));
        let mut cloud_sim = CloudSimulation::new(sim, sim_config);

        let dc = cloud_sim.add_datacenter("dc", Box::new(WorstFit::new()));
        for i in 0..3 {
            cloud_sim.add_host(
                &format!("h{}", i),
                dc,
                uniform_pes(4, 1000.),
                8192,
                1000,
                100000,
                VmSharing::SpaceShared,
            );
        }
        let b = cloud_sim.add_broker("b", dc);

        let mut vms = Vec::new();
        for _ in 0..4 {
            vms.push(cloud_sim.create_vm(2, 500., 1024, 100, 1000, CloudletSharing::TimeShared));
        }
        let mut cloudlets = Vec::new();
        for i in 0..8 {
            cloudlets.push(cloud_sim.create_cloudlet(
                1000. * (i + 1) as f64,
                1,
                0,
                0,
                Box::new(FullUtilization::new()),
            ));
        }

        let broker = cloud_sim.broker(b);
        broker.borrow_mut().submit_vm_list(&vms).unwrap();
        broker.borrow_mut().submit_cloudlet_list(&cloudlets).unwrap();
        cloud_sim.run();

        let finished = broker.borrow().finished_cloudlets().to_vec();
        (finished, cloud_sim.event_count(), cloud_sim.current_time())
    };

    let first = run();
    let second = run();
    assert_eq!(first, second);
    assert_eq!(first.0.len(), 8);
}

#[test]
// A chain driver keeps one cloudlet in flight and stops after exactly
// five submissions, the last one carrying no callback.
fn test_feedback_chain_bound() {
    let sim = make_simulation();
    let sim_config = SimulationConfig::from_file(&name_wrapper("config.yaml"));
    let mut cloud_sim = CloudSimulation::new(sim, sim_config);

    let dc = cloud_sim.add_datacenter("dc", Box::new(FirstFit::new()));
    cloud_sim.add_host("h", dc, uniform_pes(1, 1000.), 8192, 1000, 100000, VmSharing::SpaceShared);
    let b = cloud_sim.add_broker("b", dc);

    let vm = cloud_sim.create_vm(1, 1000., 1024, 100, 1000, CloudletSharing::TimeShared);
    let first = cloud_sim.create_cloudlet(1000., 1, 0, 0, Box::new(FullUtilization::new()));
    let template = CloudletTemplate::new(1000., 1, 0, 0, Box::new(FullUtilization::new()));

    let broker = cloud_sim.broker(b);
    broker.borrow_mut().submit_vm(vm).unwrap();
    broker
        .borrow_mut()
        .submit_cloudlet_with_callback(first, Some(vm), Some(Box::new(CloudletChain::new(template, 5))))
        .unwrap();
    cloud_sim.run();

    let broker = broker.borrow();
    assert_eq!(broker.submitted_cloudlets(), 5);
    let times: Vec<f64> = broker.finished_cloudlets().iter().map(|&(_, t)| t).collect();
    assert_eq!(times, vec![1., 2., 3., 4., 5.]);
    assert_eq!(cloud_sim.current_time(), 5.);
}

#[test]
// A positive scheduling interval adds periodic refresh events but must
// not move any completion time under constant utilization.
fn test_scheduling_interval_neutrality() {
    let run = |config_name: &str| {
        let sim = make_simulation();
        let sim_config = SimulationConfig::from_file(&name_wrapper(config_name));
        let mut cloud_sim = CloudSimulation::new(sim, sim_config);

        let dc = cloud_sim.add_datacenter("dc", Box::new(FirstFit::new()));
        cloud_sim.add_host("h", dc, uniform_pes(2, 1000.), 8192, 1000, 100000, VmSharing::SpaceShared);
        let b = cloud_sim.add_broker("b", dc);

        let vm = cloud_sim.create_vm(1, 1000., 1024, 100, 1000, CloudletSharing::TimeShared);
        let cloudlet = cloud_sim.create_cloudlet(10000., 1, 0, 0, Box::new(ConstantUtilization::new(0.5)));

        let broker = cloud_sim.broker(b);
        broker.borrow_mut().submit_vm(vm).unwrap();
        broker.borrow_mut().submit_cloudlet(cloudlet, Some(vm)).unwrap();
        cloud_sim.run();

        let finished = broker.borrow().finished_cloudlets().to_vec();
        (finished, cloud_sim.event_count())
    };

    let (finished_plain, events_plain) = run("config.yaml");
    let (finished_periodic, events_periodic) = run("config_with_interval.yaml");
    // rate 500 MIPS, length 10000 MI: finish at 20.0 in both modes
    assert_eq!(finished_plain, finished_periodic);
    assert_eq!(finished_plain[0].1, 20.);
    assert!(events_periodic > events_plain);
}

#[test]
// The utilization fraction is sampled at the start of each accounting
// interval and held until the next event. A stepped model switching from
// 1.0 to 0.5 at offset 10 is therefore invisible without intermediate
// events (the whole run uses the start-time sample), while a scheduling
// interval of 10 resamples right at the switch and halves the rate from
// there on.
fn test_stepped_utilization_sampling() {
    let run = |config_name: &str| {
        let sim = make_simulation();
        let sim_config = SimulationConfig::from_file(&name_wrapper(config_name));
        let mut cloud_sim = CloudSimulation::new(sim, sim_config);

        let dc = cloud_sim.add_datacenter("dc", Box::new(FirstFit::new()));
        cloud_sim.add_host("h", dc, uniform_pes(1, 1000.), 8192, 1000, 100000, VmSharing::SpaceShared);
        let b = cloud_sim.add_broker("b", dc);

        let vm = cloud_sim.create_vm(1, 1000., 1024, 100, 1000, CloudletSharing::TimeShared);
        let cloudlet = cloud_sim.create_cloudlet(15000., 1, 0, 0, Box::new(SteppedUtilization::new(1., 0.5, 10.)));

        let broker = cloud_sim.broker(b);
        broker.borrow_mut().submit_vm(vm).unwrap();
        broker.borrow_mut().submit_cloudlet(cloudlet, Some(vm)).unwrap();
        cloud_sim.run();

        let finished = broker.borrow().finished_cloudlets().to_vec();
        finished
    };

    let finished_plain = run("config.yaml");
    // one sample at t=0: rate 1000 for the full 15000 MI
    assert_eq!(finished_plain[0].1, 15.);
    let finished_periodic = run("config_with_interval.yaml");
    // resampled at t=10: 10000 MI at 1000 MIPS, then 5000 MI at 500 MIPS
    assert_eq!(finished_periodic[0].1, 20.);
}

#[test]
// Submitting the same VM or cloudlet twice is a caller error.
fn test_duplicate_submission_rejected() {
    let sim = make_simulation();
    let mut cloud_sim = CloudSimulation::new(sim, SimulationConfig::new());

    let dc = cloud_sim.add_datacenter("dc", Box::new(FirstFit::new()));
    cloud_sim.add_host("h", dc, uniform_pes(4, 1000.), 8192, 1000, 100000, VmSharing::SpaceShared);
    let b = cloud_sim.add_broker("b", dc);

    let vm = cloud_sim.create_vm(1, 1000., 1024, 100, 1000, CloudletSharing::TimeShared);
    let cloudlet = cloud_sim.create_cloudlet(1000., 1, 0, 0, Box::new(FullUtilization::new()));

    let broker = cloud_sim.broker(b);
    broker.borrow_mut().submit_vm(vm).unwrap();
    assert_eq!(broker.borrow_mut().submit_vm(vm), Err(SubmissionError::DuplicateSubmission));
    broker.borrow_mut().submit_cloudlet(cloudlet, None).unwrap();
    assert_eq!(
        broker.borrow_mut().submit_cloudlet(cloudlet, None),
        Err(SubmissionError::DuplicateSubmission)
    );
    cloud_sim.run();
    assert_eq!(broker.borrow().finished_cloudlets().len(), 1);
}

#[test]
// Space-shared cloudlet scheduling inside a VM: two PEs serve the first
// two cloudlets, the third waits in FIFO order for a PE to free.
fn test_space_shared_cloudlet_queueing() {
    let sim = make_simulation();
    let sim_config = SimulationConfig::from_file(&name_wrapper("config.yaml"));
    let mut cloud_sim = CloudSimulation::new(sim, sim_config);

    let dc = cloud_sim.add_datacenter("dc", Box::new(FirstFit::new()));
    cloud_sim.add_host("h", dc, uniform_pes(2, 1000.), 8192, 1000, 100000, VmSharing::SpaceShared);
    let b = cloud_sim.add_broker("b", dc);

    let vm = cloud_sim.create_vm(2, 1000., 1024, 100, 1000, CloudletSharing::SpaceShared);
    let mut cloudlets = Vec::new();
    for _ in 0..3 {
        cloudlets.push(cloud_sim.create_cloudlet(1000., 1, 0, 0, Box::new(FullUtilization::new())));
    }

    let broker = cloud_sim.broker(b);
    broker.borrow_mut().submit_vm(vm).unwrap();
    for &cloudlet in &cloudlets {
        broker.borrow_mut().submit_cloudlet(cloudlet, Some(vm)).unwrap();
    }
    cloud_sim.run();

    let times: Vec<f64> = broker.borrow().finished_cloudlets().iter().map(|&(_, t)| t).collect();
    assert_eq!(times, vec![1., 1., 2.]);
}

#[test]
// With a time limit configured the run stops there and every unfinished
// cloudlet is flushed as aborted, leaving submitted > finished as the
// observable failure signal.
fn test_timeout_aborts_unfinished_cloudlets() {
    let sim = make_simulation();
    let sim_config = SimulationConfig::from_file(&name_wrapper("config_with_max_time.yaml"));
    let mut cloud_sim = CloudSimulation::new(sim, sim_config);

    let dc = cloud_sim.add_datacenter("dc", Box::new(FirstFit::new()));
    cloud_sim.add_host("h", dc, uniform_pes(1, 1000.), 8192, 1000, 100000, VmSharing::SpaceShared);
    let b = cloud_sim.add_broker("b", dc);

    let vm = cloud_sim.create_vm(1, 1000., 1024, 100, 1000, CloudletSharing::TimeShared);
    let short = cloud_sim.create_cloudlet(10000., 1, 0, 0, Box::new(FullUtilization::new()));
    let long = cloud_sim.create_cloudlet(1000000., 1, 0, 0, Box::new(FullUtilization::new()));

    let broker = cloud_sim.broker(b);
    broker.borrow_mut().submit_vm(vm).unwrap();
    broker.borrow_mut().submit_cloudlet(short, Some(vm)).unwrap();
    broker.borrow_mut().submit_cloudlet(long, Some(vm)).unwrap();
    cloud_sim.run();

    let broker = broker.borrow();
    assert_eq!(broker.submitted_cloudlets(), 2);
    assert_eq!(broker.finished_cloudlets().len(), 1);
    assert!(broker.submitted_cloudlets() > broker.finished_cloudlets().len());

    let registry = cloud_sim.registry();
    let registry = registry.borrow();
    let aborted = registry.cloudlet(long).unwrap();
    assert_eq!(*aborted.borrow().status(), CloudletStatus::Aborted);
    // the aborted cloudlet kept its partial progress up to the time limit
    assert!(aborted.borrow().remaining() < 1000000.);
}

#[test]
// Two brokers sharing one datacenter never observe each other's work.
fn test_multi_broker_isolation() {
    let sim = make_simulation();
    let sim_config = SimulationConfig::from_file(&name_wrapper("config.yaml"));
    let mut cloud_sim = CloudSimulation::new(sim, sim_config);

    let dc = cloud_sim.add_datacenter("dc", Box::new(FirstFit::new()));
    cloud_sim.add_host("h1", dc, uniform_pes(2, 1000.), 8192, 1000, 100000, VmSharing::SpaceShared);
    cloud_sim.add_host("h2", dc, uniform_pes(2, 1000.), 8192, 1000, 100000, VmSharing::SpaceShared);
    let b1 = cloud_sim.add_broker("b1", dc);
    let b2 = cloud_sim.add_broker("b2", dc);

    let vm1 = cloud_sim.create_vm(2, 1000., 1024, 100, 1000, CloudletSharing::TimeShared);
    let vm2 = cloud_sim.create_vm(2, 1000., 1024, 100, 1000, CloudletSharing::TimeShared);
    let c1 = cloud_sim.create_cloudlet(2000., 1, 0, 0, Box::new(FullUtilization::new()));
    let c2 = cloud_sim.create_cloudlet(4000., 1, 0, 0, Box::new(FullUtilization::new()));

    let broker1 = cloud_sim.broker(b1);
    let broker2 = cloud_sim.broker(b2);
    broker1.borrow_mut().submit_vm(vm1).unwrap();
    broker2.borrow_mut().submit_vm(vm2).unwrap();
    broker1.borrow_mut().submit_cloudlet(c1, None).unwrap();
    broker2.borrow_mut().submit_cloudlet(c2, None).unwrap();
    cloud_sim.run();

    assert_eq!(broker1.borrow().finished_cloudlets(), [(c1, 2.)]);
    assert_eq!(broker2.borrow().finished_cloudlets(), [(c2, 4.)]);
    assert_eq!(broker1.borrow().vm_status(vm2), None);
}

#[test]
// Worst fit spreads identical VMs across hosts instead of packing them.
fn test_worst_fit_spreads_load() {
    let sim = make_simulation();
    let mut cloud_sim = CloudSimulation::new(sim, SimulationConfig::new());

    let dc = cloud_sim.add_datacenter("dc", Box::new(WorstFit::new()));
    cloud_sim.add_host("h1", dc, uniform_pes(4, 1000.), 8192, 1000, 100000, VmSharing::TimeShared);
    cloud_sim.add_host("h2", dc, uniform_pes(4, 1000.), 8192, 1000, 100000, VmSharing::TimeShared);
    let b = cloud_sim.add_broker("b", dc);

    let vm1 = cloud_sim.create_vm(1, 1000., 1024, 100, 1000, CloudletSharing::TimeShared);
    let vm2 = cloud_sim.create_vm(1, 1000., 1024, 100, 1000, CloudletSharing::TimeShared);
    let c1 = cloud_sim.create_cloudlet(1000., 1, 0, 0, Box::new(FullUtilization::new()));
    let c2 = cloud_sim.create_cloudlet(1000., 1, 0, 0, Box::new(FullUtilization::new()));

    let broker = cloud_sim.broker(b);
    broker.borrow_mut().submit_vm_list(&[vm1, vm2]).unwrap();
    broker.borrow_mut().submit_cloudlet_list(&[c1, c2]).unwrap();
    cloud_sim.step_for_duration(0.5);

    {
        let registry = cloud_sim.registry();
        let registry = registry.borrow();
        let host1 = registry.vm(vm1).unwrap().borrow().host_id();
        let host2 = registry.vm(vm2).unwrap().borrow().host_id();
        assert!(host1.is_some() && host2.is_some());
        assert_ne!(host1, host2);
    }
    cloud_sim.run();
}

#[test]
// A cloudlet requiring more PEs than its VM owns can never run there.
fn test_cloudlet_too_wide_for_vm_fails() {
    let sim = make_simulation();
    let mut cloud_sim = CloudSimulation::new(sim, SimulationConfig::new());

    let dc = cloud_sim.add_datacenter("dc", Box::new(FirstFit::new()));
    cloud_sim.add_host("h", dc, uniform_pes(4, 1000.), 8192, 1000, 100000, VmSharing::SpaceShared);
    let b = cloud_sim.add_broker("b", dc);

    let vm = cloud_sim.create_vm(1, 1000., 1024, 100, 1000, CloudletSharing::TimeShared);
    let wide = cloud_sim.create_cloudlet(1000., 2, 0, 0, Box::new(FullUtilization::new()));

    let broker = cloud_sim.broker(b);
    broker.borrow_mut().submit_vm(vm).unwrap();
    broker.borrow_mut().submit_cloudlet(wide, Some(vm)).unwrap();
    cloud_sim.run();

    let registry = cloud_sim.registry();
    let registry = registry.borrow();
    assert_eq!(*registry.cloudlet(wide).unwrap().borrow().status(), CloudletStatus::Failed);
    assert!(broker.borrow().finished_cloudlets().is_empty());
}

#[test]
// Binding a cloudlet to an unsubmitted VM or round-robin with no VMs is
// rejected on the submission boundary.
fn test_submission_errors() {
    let sim = make_simulation();
    let mut cloud_sim = CloudSimulation::new(sim, SimulationConfig::new());

    let dc = cloud_sim.add_datacenter("dc", Box::new(FirstFit::new()));
    cloud_sim.add_host("h", dc, uniform_pes(4, 1000.), 8192, 1000, 100000, VmSharing::SpaceShared);
    let b = cloud_sim.add_broker("b", dc);

    let vm = cloud_sim.create_vm(1, 1000., 1024, 100, 1000, CloudletSharing::TimeShared);
    let cloudlet = cloud_sim.create_cloudlet(1000., 1, 0, 0, Box::new(FullUtilization::new()));

    let broker = cloud_sim.broker(b);
    assert_eq!(
        broker.borrow_mut().submit_cloudlet(cloudlet, None),
        Err(SubmissionError::NoSubmittedVms)
    );
    assert_eq!(
        broker.borrow_mut().submit_cloudlet(cloudlet, Some(vm)),
        Err(SubmissionError::UnknownVm)
    );
    assert_eq!(broker.borrow_mut().submit_cloudlet(999, None), Err(SubmissionError::UnknownCloudlet));
}

#[test]
fn test_config_from_file() {
    let config = SimulationConfig::from_file(&name_wrapper("config_with_interval.yaml"));
    assert_eq!(config.scheduling_interval, 10.);
    assert_eq!(config.max_time, 0.);
    let config = SimulationConfig::from_file(&name_wrapper("config_with_max_time.yaml"));
    assert_eq!(config.scheduling_interval, 0.);
    assert_eq!(config.max_time, 50.);
}
