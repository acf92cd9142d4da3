use std::collections::HashSet;

use log::{debug, warn};

use super::model::{
    disk_id, percent_of, round1, Edge, EdgeKind, GraphFragment, Node, NodeAttributes, Subsystem,
    CPU_ID, HOST_ID, RAM_ID,
};
use super::GraphBuilder;
use crate::core::telemetry::{CpuSample, DiskUsage, HostInfo, MemorySample, TelemetryProvider};

/// Host, CPU, RAM and disk nodes with their ownership and mount edges.
///
/// Always yields exactly one host, one cpu and one ram node, followed by one
/// disk node per partition whose usage could be read.
#[derive(Debug, Clone, Copy, Default)]
pub struct HardwareInventory;

impl HardwareInventory {
    /// The fragment used when the inventory could not run at all
    pub fn placeholder() -> GraphFragment {
        let nodes = vec![
            host_node(&HostInfo::unknown()),
            cpu_node(&CpuSample::default()),
            ram_node(&MemorySample::default()),
        ];
        GraphFragment {
            nodes,
            edges: ownership_edges(),
            degraded: true,
        }
    }
}

impl GraphBuilder for HardwareInventory {
    fn subsystem(&self) -> Subsystem {
        Subsystem::Hardware
    }

    fn build(&self, telemetry: &dyn TelemetryProvider) -> GraphFragment {
        let mut degraded = false;

        let host = telemetry.host().unwrap_or_else(|e| {
            warn!("Failed to read host info: {}", e);
            degraded = true;
            HostInfo::unknown()
        });

        let cpu = telemetry.cpu().unwrap_or_else(|e| {
            warn!("Failed to read CPU counters: {}", e);
            degraded = true;
            CpuSample::default()
        });

        let memory = telemetry.memory().unwrap_or_else(|e| {
            warn!("Failed to read memory counters: {}", e);
            degraded = true;
            MemorySample::default()
        });

        let mut nodes = vec![host_node(&host), cpu_node(&cpu), ram_node(&memory)];
        let mut edges = ownership_edges();

        let partitions = telemetry.partitions().unwrap_or_else(|e| {
            warn!("Failed to list partitions: {}", e);
            degraded = true;
            Vec::new()
        });

        let mut seen = HashSet::new();
        for partition in partitions {
            let usage = match partition.usage {
                Ok(usage) => usage,
                Err(e) if e.is_silent_skip() => {
                    debug!("Skipping partition {}: {}", partition.mount_point, e);
                    continue;
                }
                Err(e) => {
                    warn!("Skipping partition {}: {}", partition.mount_point, e);
                    continue;
                }
            };

            let id = disk_id(&partition.mount_point);
            if !seen.insert(id.clone()) {
                continue;
            }

            nodes.push(disk_node(
                id.clone(),
                &partition.mount_point,
                partition.fstype,
                &usage,
            ));
            edges.push(Edge::new(HOST_ID, id, EdgeKind::Mount));
        }

        GraphFragment {
            nodes,
            edges,
            degraded,
        }
    }
}

fn ownership_edges() -> Vec<Edge> {
    vec![
        Edge::new(HOST_ID, CPU_ID, EdgeKind::Owns),
        Edge::new(HOST_ID, RAM_ID, EdgeKind::Owns),
    ]
}

fn host_node(host: &HostInfo) -> Node {
    Node {
        id: HOST_ID.to_string(),
        label: host.hostname.clone(),
        attributes: NodeAttributes::Host {
            os: host.os.clone(),
            boot_time: host.boot_time,
        },
    }
}

fn cpu_node(cpu: &CpuSample) -> Node {
    let cores = cpu.cores.max(1);
    let load = cpu.load.unwrap_or_default();

    Node {
        id: CPU_ID.to_string(),
        label: format!("CPU x{}", cores),
        attributes: NodeAttributes::Cpu {
            cores,
            usage_percent: round1(cpu.usage_percent),
            load_1: load.one,
            load_5: load.five,
            load_15: load.fifteen,
            freq_mhz: cpu.freq_mhz.filter(|&mhz| mhz > 0),
        },
    }
}

fn ram_node(memory: &MemorySample) -> Node {
    Node {
        id: RAM_ID.to_string(),
        label: format!("RAM {:.1} GB", memory.total as f64 / 1e9),
        attributes: NodeAttributes::Ram {
            total: memory.total,
            used: memory.used,
            available: memory.available,
            percent: percent_of(
                memory.total.saturating_sub(memory.available),
                memory.total,
            ),
        },
    }
}

/// Used space is everything not available to unprivileged users, so blocks
/// reserved for root count as used.
fn disk_node(id: String, mount_point: &str, fstype: String, usage: &DiskUsage) -> Node {
    let used = usage.total.saturating_sub(usage.available);
    Node {
        id,
        label: format!("{} ({})", mount_point, fstype),
        attributes: NodeAttributes::Disk {
            fstype,
            total: usage.total,
            used,
            percent: percent_of(used, usage.total),
        },
    }
}
