use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use sysmap::core::telemetry::DiskUsage;
use sysmap::core::topology::{
    Edge, EdgeKind, GraphBuilder, HardwareInventory, NodeKind, Subsystem, TopologyAssembler,
    TopologySnapshot, CPU_ID, HOST_ID, RAM_ID,
};
use sysmap::core::SystemTelemetry;

use super::support::{connection, process, FakeTelemetry};

fn assemble(telemetry: FakeTelemetry) -> TopologySnapshot {
    TopologyAssembler::with_timeout(Arc::new(telemetry), Duration::from_secs(5)).assemble()
}

fn has_edge(snapshot: &TopologySnapshot, source: &str, target: &str, kind: EdgeKind) -> bool {
    snapshot
        .edges()
        .contains(&Edge::new(source, target, kind))
}

fn assert_unique_ids(snapshot: &TopologySnapshot) {
    let mut ids = HashSet::new();
    for node in snapshot.nodes() {
        assert!(ids.insert(node.id.as_str()), "duplicate node id {}", node.id);
    }
}

#[test]
fn test_single_host_scenario() {
    let snapshot = assemble(FakeTelemetry::default());

    let hardware: Vec<_> = snapshot
        .nodes()
        .iter()
        .filter(|n| matches!(n.kind(), NodeKind::Host | NodeKind::Cpu | NodeKind::Ram | NodeKind::Disk))
        .collect();
    assert!(hardware.len() >= 3);
    assert_eq!(snapshot.node(CPU_ID).unwrap().label, "CPU x1");
    assert_eq!(snapshot.node(RAM_ID).unwrap().label, "RAM 8.0 GB");
    assert_eq!(snapshot.node("disk:/").unwrap().label, "/ (ext4)");

    assert!(has_edge(&snapshot, HOST_ID, CPU_ID, EdgeKind::Owns));
    assert!(has_edge(&snapshot, HOST_ID, RAM_ID, EdgeKind::Owns));
    assert!(has_edge(&snapshot, HOST_ID, "disk:/", EdgeKind::Mount));
    assert!(snapshot.degraded().is_empty());
}

#[test]
fn test_node_ids_are_unique() {
    let telemetry = FakeTelemetry::default()
        .with_processes(vec![
            process(1, None, "init"),
            process(2, Some(1), "kthreadd"),
            process(2, Some(1), "kthreadd"),
        ])
        .with_connections(vec![
            connection("8.8.8.8:53", Some(2)),
            connection("8.8.8.8:443", Some(1)),
        ]);
    let snapshot = assemble(telemetry);

    assert_unique_ids(&snapshot);
}

#[test]
fn test_node_and_edge_order() {
    let telemetry = FakeTelemetry::default()
        .with_processes(vec![process(1, None, "init"), process(5, Some(1), "sh")])
        .with_connections(vec![connection("1.2.3.4:80", Some(5))]);
    let snapshot = assemble(telemetry);

    let kinds: Vec<_> = snapshot.nodes().iter().map(|n| n.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Host,
            NodeKind::Cpu,
            NodeKind::Ram,
            NodeKind::Disk,
            NodeKind::Process,
            NodeKind::Process,
            NodeKind::Remote,
        ]
    );

    let edge_kinds: Vec<_> = snapshot.edges().iter().map(|e| e.kind).collect();
    assert_eq!(
        edge_kinds,
        vec![
            EdgeKind::Parent,
            EdgeKind::Runs,
            EdgeKind::Runs,
            EdgeKind::Net,
            EdgeKind::Owns,
            EdgeKind::Owns,
            EdgeKind::Mount,
        ]
    );
}

#[test]
fn test_denied_partition_is_omitted() {
    let mut telemetry = FakeTelemetry::default();
    telemetry.partitions.push(("/secret".to_string(), "ext4".to_string(), None));
    telemetry.partitions.push((
        "/data".to_string(),
        "xfs".to_string(),
        Some(DiskUsage {
            total: 1_000,
            available: 250,
        }),
    ));
    let snapshot = assemble(telemetry);

    let disks: Vec<_> = snapshot
        .nodes_of_kind(NodeKind::Disk)
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(disks, vec!["disk:/", "disk:/data"]);

    let mounts: Vec<_> = snapshot
        .edges_of_kind(EdgeKind::Mount)
        .map(|e| e.target.as_str())
        .collect();
    assert_eq!(mounts, vec!["disk:/", "disk:/data"]);
    assert!(snapshot.node("disk:/secret").is_none());
    assert!(snapshot.degraded().is_empty());
}

#[test]
fn test_parent_edges_require_both_endpoints() {
    let telemetry = FakeTelemetry::default().with_processes(vec![
        process(1, None, "init"),
        process(20, Some(1), "cron"),
        // parent resolved to a pid that was not in the table
        process(21, Some(31337), "stray"),
    ]);
    let snapshot = assemble(telemetry);

    let process_ids: HashSet<_> = snapshot
        .nodes_of_kind(NodeKind::Process)
        .map(|n| n.id.clone())
        .collect();

    let parents: Vec<_> = snapshot.edges_of_kind(EdgeKind::Parent).collect();
    assert_eq!(parents.len(), 1);
    for edge in parents {
        assert!(process_ids.contains(&edge.source));
        assert!(process_ids.contains(&edge.target));
    }
    assert!(!has_edge(&snapshot, "pid:31337", "pid:21", EdgeKind::Parent));
}

#[test]
fn test_runs_edges_cover_every_process() {
    let telemetry = FakeTelemetry::default().with_processes(vec![
        process(1, None, "init"),
        process(2, Some(1), "a"),
        process(3, Some(2), "b"),
    ]);
    let snapshot = assemble(telemetry);

    let process_ids: HashSet<_> = snapshot
        .nodes_of_kind(NodeKind::Process)
        .map(|n| n.id.clone())
        .collect();
    let runs: Vec<_> = snapshot.edges_of_kind(EdgeKind::Runs).collect();

    assert_eq!(runs.len(), process_ids.len());
    assert!(runs
        .iter()
        .all(|e| e.source == CPU_ID && process_ids.contains(&e.target)));
}

#[test]
fn test_net_edges_may_reference_missing_pids() {
    let telemetry = FakeTelemetry::default()
        .with_processes(vec![process(1, None, "init")])
        .with_connections(vec![
            connection("192.0.2.10:443", Some(4040)),
            connection("192.0.2.11:443", None),
        ]);
    let snapshot = assemble(telemetry);

    let net: Vec<_> = snapshot.edges_of_kind(EdgeKind::Net).collect();
    assert_eq!(net.len(), 2);
    for edge in &net {
        assert!(!edge.source.is_empty());
        assert!(!edge.target.is_empty());
    }
    assert!(has_edge(&snapshot, "pid:4040", "ip:192.0.2.10", EdgeKind::Net));
    assert!(has_edge(&snapshot, HOST_ID, "ip:192.0.2.11", EdgeKind::Net));
    assert!(snapshot.node("pid:4040").is_none());
}

#[test]
fn test_failed_probes_are_reported_as_degraded() {
    let mut telemetry = FakeTelemetry::default();
    telemetry.fail_processes = true;
    telemetry.fail_network = true;
    let snapshot = assemble(telemetry);

    assert_eq!(
        snapshot.degraded(),
        &[Subsystem::Processes, Subsystem::Network]
    );
    assert_eq!(snapshot.nodes_of_kind(NodeKind::Process).count(), 0);
    assert!(snapshot.node(HOST_ID).is_some());
}

#[test]
fn test_slow_probe_times_out_without_failing() {
    let mut telemetry = FakeTelemetry::default().with_processes(vec![process(1, None, "init")]);
    telemetry.process_delay = Some(Duration::from_millis(500));
    let snapshot =
        TopologyAssembler::with_timeout(Arc::new(telemetry), Duration::from_millis(50)).assemble();

    assert_eq!(snapshot.degraded(), &[Subsystem::Processes]);
    assert_eq!(snapshot.nodes_of_kind(NodeKind::Process).count(), 0);
    assert!(snapshot.node(CPU_ID).is_some());
}

#[test]
fn test_hardware_timeout_keeps_core_nodes() {
    let mut telemetry = FakeTelemetry::default();
    telemetry.hardware_delay = Some(Duration::from_millis(500));
    let snapshot =
        TopologyAssembler::with_timeout(Arc::new(telemetry), Duration::from_millis(50)).assemble();

    for id in [HOST_ID, CPU_ID, RAM_ID] {
        assert!(snapshot.node(id).is_some(), "missing {}", id);
    }
    assert!(snapshot.degraded().contains(&Subsystem::Hardware));
    assert!(has_edge(&snapshot, HOST_ID, CPU_ID, EdgeKind::Owns));
}

#[test]
fn test_host_failure_degrades_hardware_only() {
    let mut telemetry = FakeTelemetry::default();
    telemetry.fail_host = true;
    let fragment = HardwareInventory.build(&telemetry);

    assert!(fragment.degraded);
    assert_eq!(fragment.nodes[0].label, "unknown");
    assert_eq!(fragment.nodes.len(), 4);
}

#[test]
fn test_generated_at_never_decreases() {
    let telemetry = Arc::new(FakeTelemetry::default());
    let assembler = TopologyAssembler::new(telemetry);

    let first = assembler.assemble();
    let second = assembler.assemble();
    assert!(second.generated_at() >= first.generated_at());
}

#[test]
fn test_live_host_has_core_nodes() {
    let assembler = TopologyAssembler::new(Arc::new(SystemTelemetry::new()));
    let snapshot = assembler.assemble();

    for id in [HOST_ID, CPU_ID, RAM_ID] {
        assert!(snapshot.node(id).is_some(), "missing {}", id);
    }
    assert_unique_ids(&snapshot);
    assert_eq!(
        snapshot.edges_of_kind(EdgeKind::Runs).count(),
        snapshot.nodes_of_kind(NodeKind::Process).count()
    );
    assert_eq!(
        snapshot.edges_of_kind(EdgeKind::Mount).count(),
        snapshot.nodes_of_kind(NodeKind::Disk).count()
    );
}
