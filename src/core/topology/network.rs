use std::collections::HashSet;

use log::warn;

use super::model::{
    process_id, remote_id, Edge, EdgeKind, GraphFragment, Node, NodeAttributes, Subsystem,
    HOST_ID,
};
use super::GraphBuilder;
use crate::core::telemetry::{Connection, TelemetryProvider};

/// Remote peers of active inet connections.
///
/// Each distinct peer address becomes one `remote` node; each connection
/// becomes one `net` edge from its owning pid, or from the host when the owner
/// is unknown. The pid is not checked against the process fragment: the
/// connection table is read at a different instant than the process table,
/// so the source may name a process absent from the snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkGraphBuilder;

impl GraphBuilder for NetworkGraphBuilder {
    fn subsystem(&self) -> Subsystem {
        Subsystem::Network
    }

    fn build(&self, telemetry: &dyn TelemetryProvider) -> GraphFragment {
        match telemetry.connections() {
            Ok(connections) => build_from_connections(&connections),
            Err(e) => {
                warn!("Failed to enumerate network connections: {}", e);
                GraphFragment::degraded()
            }
        }
    }
}

pub(super) fn build_from_connections(connections: &[Connection]) -> GraphFragment {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut peers = HashSet::new();

    for connection in connections {
        let Some(ip) = connection.remote_ip() else {
            continue;
        };
        let address = ip.to_string();
        let target = remote_id(&address);

        if peers.insert(ip) {
            nodes.push(Node {
                id: target.clone(),
                label: address,
                attributes: NodeAttributes::Remote,
            });
        }

        let source = match connection.pid {
            Some(pid) if pid != 0 => process_id(pid),
            _ => HOST_ID.to_string(),
        };
        edges.push(Edge::new(source, target, EdgeKind::Net));
    }

    GraphFragment {
        nodes,
        edges,
        degraded: false,
    }
}
