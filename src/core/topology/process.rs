use std::collections::HashSet;

use log::warn;

use super::model::{
    process_id, round1, Edge, EdgeKind, GraphFragment, Node, NodeAttributes, Subsystem, CPU_ID,
};
use super::GraphBuilder;
use crate::core::telemetry::{ProcessRecord, TelemetryProvider};

/// One node per process, `parent` edges between them and a `runs` edge from
/// the CPU to each.
///
/// The process table is read once; nodes and parent edges are both derived
/// from that single list, so a parent edge can only join two pids that are
/// both in this fragment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessGraphBuilder;

impl GraphBuilder for ProcessGraphBuilder {
    fn subsystem(&self) -> Subsystem {
        Subsystem::Processes
    }

    fn build(&self, telemetry: &dyn TelemetryProvider) -> GraphFragment {
        match telemetry.process_table() {
            Ok(records) => build_from_records(&records),
            Err(e) => {
                warn!("Failed to enumerate processes: {}", e);
                GraphFragment::degraded()
            }
        }
    }
}

fn process_node(record: &ProcessRecord) -> Node {
    let name = record.name.as_deref().unwrap_or("?");
    let rss = record.rss_bytes.unwrap_or(0);

    Node {
        id: process_id(record.pid),
        label: format!("{} ({})", name, record.pid),
        attributes: NodeAttributes::Process {
            cpu: round1(f64::from(record.cpu_percent.unwrap_or(0.0))),
            mem_mb: round1(rss as f64 / 1e6),
            user: record.user.clone().unwrap_or_else(|| "?".to_string()),
        },
    }
}

pub(super) fn build_from_records(records: &[ProcessRecord]) -> GraphFragment {
    let mut seen = HashSet::with_capacity(records.len());
    let unique: Vec<&ProcessRecord> = records
        .iter()
        .filter(|record| seen.insert(record.pid))
        .collect();

    let nodes: Vec<Node> = unique.iter().map(|record| process_node(record)).collect();

    let mut edges: Vec<Edge> = unique
        .iter()
        .filter_map(|record| {
            let ppid = record.ppid.filter(|&ppid| ppid != 0)?;
            seen.contains(&ppid).then(|| {
                Edge::new(process_id(ppid), process_id(record.pid), EdgeKind::Parent)
            })
        })
        .collect();

    edges.extend(
        nodes
            .iter()
            .map(|node| Edge::new(CPU_ID, node.id.clone(), EdgeKind::Runs)),
    );

    GraphFragment {
        nodes,
        edges,
        degraded: false,
    }
}
