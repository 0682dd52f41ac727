//! Diagram kinds known to Marlin.
//!
//! [`DiagramKind`] is a closed enumeration: every grammar the parser ships is
//! listed here, and adding one is a deliberate registration.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a tag does not name a registered diagram kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown diagram kind: `{0}`")]
pub struct UnknownDiagramKind(pub String);

/// Identifying tag for one supported diagram grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramKind {
    Info,
    Pie,
    Packet,
    Sankey,
    Timeline,
    Architecture,
}

impl DiagramKind {
    /// Number of registered kinds.
    pub const COUNT: usize = 6;

    /// All kinds, in detection order.
    pub const ALL: [DiagramKind; Self::COUNT] = [
        DiagramKind::Info,
        DiagramKind::Pie,
        DiagramKind::Packet,
        DiagramKind::Sankey,
        DiagramKind::Timeline,
        DiagramKind::Architecture,
    ];

    /// Returns the tag of this kind (e.g. `"pie"`).
    pub fn as_str(self) -> &'static str {
        match self {
            DiagramKind::Info => "info",
            DiagramKind::Pie => "pie",
            DiagramKind::Packet => "packet",
            DiagramKind::Sankey => "sankey",
            DiagramKind::Timeline => "timeline",
            DiagramKind::Architecture => "architecture",
        }
    }

    /// Reserved leading keywords that open a diagram of this kind.
    ///
    /// Longer keywords come first so that a prefix scan prefers
    /// `sankey-beta` over `sankey`.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            DiagramKind::Info => &["info"],
            DiagramKind::Pie => &["pie"],
            DiagramKind::Packet => &["packet-beta", "packet"],
            DiagramKind::Sankey => &["sankey-beta", "sankey"],
            DiagramKind::Timeline => &["timeline"],
            DiagramKind::Architecture => &["architecture-beta", "architecture"],
        }
    }

    /// Position of this kind in [`DiagramKind::ALL`].
    pub fn index(self) -> usize {
        match self {
            DiagramKind::Info => 0,
            DiagramKind::Pie => 1,
            DiagramKind::Packet => 2,
            DiagramKind::Sankey => 3,
            DiagramKind::Timeline => 4,
            DiagramKind::Architecture => 5,
        }
    }
}

impl FromStr for DiagramKind {
    type Err = UnknownDiagramKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiagramKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownDiagramKind(s.to_string()))
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
