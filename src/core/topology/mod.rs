//! Topology assembly.
//!
//! Three independent builders each turn one slice of host state into graph
//! nodes and edges; the assembler merges them into a [`TopologySnapshot`].

mod assembler;
mod hardware;
mod model;
mod network;
mod process;

pub use assembler::TopologyAssembler;
pub use hardware::HardwareInventory;
pub use model::{
    disk_id, process_id, remote_id, Edge, EdgeKind, GraphFragment, Node, NodeAttributes,
    NodeKind, Subsystem, TopologySnapshot, CPU_ID, HOST_ID, RAM_ID,
};
pub use network::NetworkGraphBuilder;
pub use process::ProcessGraphBuilder;

use crate::core::telemetry::TelemetryProvider;

/// A source of one fragment of the topology graph.
///
/// Builders hold no state and never fail: probe errors shrink the fragment
/// and set its `degraded` flag.
pub trait GraphBuilder: Send + 'static {
    fn subsystem(&self) -> Subsystem;

    fn build(&self, telemetry: &dyn TelemetryProvider) -> GraphFragment;
}
