use std::fmt;

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

pub const HOST_ID: &str = "host";
pub const CPU_ID: &str = "cpu";
pub const RAM_ID: &str = "ram";

pub fn disk_id(mount_point: &str) -> String {
    format!("disk:{}", mount_point)
}

pub fn process_id(pid: u32) -> String {
    format!("pid:{}", pid)
}

pub fn remote_id(address: &str) -> String {
    format!("ip:{}", address)
}

/// Per-category node fields. Serialized inline with the node, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeAttributes {
    Host {
        os: String,
        boot_time: u64,
    },
    Cpu {
        cores: usize,
        usage_percent: f64,
        load_1: f64,
        load_5: f64,
        load_15: f64,
        freq_mhz: Option<u64>,
    },
    Ram {
        total: u64,
        used: u64,
        available: u64,
        percent: f64,
    },
    Disk {
        fstype: String,
        total: u64,
        used: u64,
        percent: f64,
    },
    Process {
        cpu: f64,
        mem_mb: f64,
        user: String,
    },
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Host,
    Cpu,
    Ram,
    Disk,
    Process,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub attributes: NodeAttributes,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self.attributes {
            NodeAttributes::Host { .. } => NodeKind::Host,
            NodeAttributes::Cpu { .. } => NodeKind::Cpu,
            NodeAttributes::Ram { .. } => NodeKind::Ram,
            NodeAttributes::Disk { .. } => NodeKind::Disk,
            NodeAttributes::Process { .. } => NodeKind::Process,
            NodeAttributes::Remote => NodeKind::Remote,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// host → cpu, host → ram
    Owns,
    /// host → disk
    Mount,
    /// cpu → process
    Runs,
    /// parent process → child process
    Parent,
    /// process (or host) → remote peer
    Net,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
        }
    }
}

/// Subsystems whose contribution to a snapshot can be degraded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subsystem {
    Hardware,
    Processes,
    Network,
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subsystem::Hardware => write!(f, "hardware"),
            Subsystem::Processes => write!(f, "processes"),
            Subsystem::Network => write!(f, "network"),
        }
    }
}

/// Nodes and edges produced by one builder
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphFragment {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Set when a probe failure left this fragment partial or empty
    pub degraded: bool,
}

impl GraphFragment {
    pub fn degraded() -> Self {
        Self {
            degraded: true,
            ..Default::default()
        }
    }
}

/// `{"data": ...}` wrapper expected by the graph client
#[derive(Serialize)]
struct Envelope<'a, T> {
    data: &'a T,
}

fn serialize_enveloped<S, T>(items: &[T], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    serializer.collect_seq(items.iter().map(|data| Envelope { data }))
}

/// One complete, immutable topology response
#[derive(Debug, Clone, Serialize)]
pub struct TopologySnapshot {
    generated_at: i64,
    #[serde(serialize_with = "serialize_enveloped")]
    nodes: Vec<Node>,
    #[serde(serialize_with = "serialize_enveloped")]
    edges: Vec<Edge>,
    degraded: Vec<Subsystem>,
}

impl TopologySnapshot {
    pub(crate) fn new(
        generated_at: i64,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        degraded: Vec<Subsystem>,
    ) -> Self {
        Self {
            generated_at,
            nodes,
            edges,
            degraded,
        }
    }

    /// Unix seconds at assembly time
    pub fn generated_at(&self) -> i64 {
        self.generated_at
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn degraded(&self) -> &[Subsystem] {
        &self.degraded
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |node| node.kind() == kind)
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |edge| edge.kind == kind)
    }
}

/// Round to one decimal place
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn percent_of(part: u64, total: u64) -> f64 {
    if total > 0 {
        round1(part as f64 / total as f64 * 100.0)
    } else {
        0.0
    }
}
