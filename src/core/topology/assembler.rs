use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{debug, warn};

use super::hardware::HardwareInventory;
use super::model::{GraphFragment, NodeKind, TopologySnapshot};
use super::network::NetworkGraphBuilder;
use super::process::ProcessGraphBuilder;
use super::GraphBuilder;
use crate::core::config::DEFAULT_PROBE_TIMEOUT_MS;
use crate::core::telemetry::TelemetryProvider;
use crate::error::SysmapError;

/// Runs the hardware, process and network builders and merges their output.
///
/// The merge is a plain concatenation: nodes in hardware, process, network
/// order; edges in process, network, hardware order. Nothing is validated or
/// repaired across fragments.
pub struct TopologyAssembler {
    telemetry: Arc<dyn TelemetryProvider>,
    probe_timeout: Duration,
}

impl TopologyAssembler {
    pub fn new(telemetry: Arc<dyn TelemetryProvider>) -> Self {
        Self::with_timeout(telemetry, Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS))
    }

    pub fn with_timeout(telemetry: Arc<dyn TelemetryProvider>, probe_timeout: Duration) -> Self {
        Self {
            telemetry,
            probe_timeout,
        }
    }

    pub fn assemble(&self) -> TopologySnapshot {
        let mut hardware = self.run_bounded(HardwareInventory);
        let has_core_nodes = [NodeKind::Host, NodeKind::Cpu, NodeKind::Ram]
            .iter()
            .all(|kind| hardware.nodes.iter().any(|node| node.kind() == *kind));
        if !has_core_nodes {
            hardware = HardwareInventory::placeholder();
        }

        let processes = self.run_bounded(ProcessGraphBuilder);
        let network = self.run_bounded(NetworkGraphBuilder);

        let degraded = [
            (HardwareInventory.subsystem(), hardware.degraded),
            (ProcessGraphBuilder.subsystem(), processes.degraded),
            (NetworkGraphBuilder.subsystem(), network.degraded),
        ]
        .into_iter()
        .filter_map(|(subsystem, degraded)| degraded.then_some(subsystem))
        .collect();

        let mut nodes = hardware.nodes;
        nodes.extend(processes.nodes);
        nodes.extend(network.nodes);

        let mut edges = processes.edges;
        edges.extend(network.edges);
        edges.extend(hardware.edges);

        let generated_at = chrono::Utc::now().timestamp();
        debug!(
            "Assembled topology: {} nodes, {} edges",
            nodes.len(),
            edges.len()
        );

        TopologySnapshot::new(generated_at, nodes, edges, degraded)
    }

    /// Run one builder on a helper thread and wait at most `probe_timeout`.
    /// An overrunning or panicking builder yields an empty degraded fragment;
    /// the helper thread is left to finish on its own.
    fn run_bounded<B: GraphBuilder>(&self, builder: B) -> GraphFragment {
        let subsystem = builder.subsystem();
        let telemetry = Arc::clone(&self.telemetry);
        let (tx, rx) = mpsc::channel();

        let spawned = thread::Builder::new()
            .name(format!("probe-{}", subsystem))
            .spawn(move || {
                // Receiver may already be gone after a timeout
                let _ = tx.send(builder.build(telemetry.as_ref()));
            });

        if let Err(e) = spawned {
            warn!("Failed to start {} probe: {}", subsystem, e);
            return GraphFragment::degraded();
        }

        match rx.recv_timeout(self.probe_timeout) {
            Ok(fragment) => fragment,
            Err(RecvTimeoutError::Timeout) => {
                let err = SysmapError::timeout(format!(
                    "{} probe exceeded {:?}",
                    subsystem, self.probe_timeout
                ));
                warn!("{}; continuing without it", err);
                GraphFragment::degraded()
            }
            Err(RecvTimeoutError::Disconnected) => {
                warn!("{} probe aborted; continuing without it", subsystem);
                GraphFragment::degraded()
            }
        }
    }
}
