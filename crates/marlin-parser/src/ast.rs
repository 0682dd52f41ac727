//! Typed syntax trees, one per diagram kind.
//!
//! Every tree implements [`SyntaxTree`], whose `KIND` names the grammar
//! that produces it. [`Diagram`] unifies them and serializes with a `$type`
//! field equal to the kind tag.

use std::fmt;

use serde::Serialize;

use marlin_core::kind::DiagramKind;

/// A tree produced by exactly one grammar.
pub trait SyntaxTree: fmt::Debug + Serialize + Send + Sync + Into<Diagram> {
    const KIND: DiagramKind;
}

/// Optional title and accessibility text shared by all diagrams.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleAndAccessibilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acc_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acc_descr: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    pub show_info: bool,
    #[serde(flatten)]
    pub meta: TitleAndAccessibilities,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pie {
    pub show_data: bool,
    pub sections: Vec<PieSection>,
    #[serde(flatten)]
    pub meta: TitleAndAccessibilities,
}

/// One slice of a pie. Duplicate labels are kept as written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSection {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Packet {
    pub blocks: Vec<PacketBlock>,
    #[serde(flatten)]
    pub meta: TitleAndAccessibilities,
}

/// A field of a packet.
///
/// Written either as an explicit bit range (`start`, optional `end`) or as a
/// width relative to the previous block (`bits`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PacketBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bits: Option<u32>,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sankey {
    pub links: Vec<SankeyLink>,
    /// Every link endpoint, deduplicated, in order of first occurrence.
    pub nodes: Vec<SankeyNode>,
    #[serde(flatten)]
    pub meta: TitleAndAccessibilities,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyLink {
    pub source: String,
    pub target: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SankeyNode {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Timeline {
    pub sections: Vec<TimelineSection>,
    #[serde(flatten)]
    pub meta: TitleAndAccessibilities,
}

/// A run of periods under one `section` line.
///
/// Periods written before the first `section` line belong to a leading
/// section without a title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimelineSection {
    pub title: Option<String>,
    pub periods: Vec<TimelinePeriod>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePeriod {
    pub title: String,
    pub events: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Architecture {
    pub groups: Vec<ArchGroup>,
    pub services: Vec<ArchService>,
    pub junctions: Vec<ArchJunction>,
    pub edges: Vec<ArchEdge>,
    #[serde(flatten)]
    pub meta: TitleAndAccessibilities,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchGroup {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchService {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchJunction {
    pub id: String,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// Side of a service or group an edge attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArchDirection {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
    #[serde(rename = "T")]
    Top,
    #[serde(rename = "B")]
    Bottom,
}

impl ArchDirection {
    /// Parses a single-letter side (`L`, `R`, `T`, `B`).
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "L" => Some(ArchDirection::Left),
            "R" => Some(ArchDirection::Right),
            "T" => Some(ArchDirection::Top),
            "B" => Some(ArchDirection::Bottom),
            _ => None,
        }
    }
}

/// `lhs:DIR <-- title --> DIR:rhs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchEdge {
    pub lhs_id: String,
    pub lhs_group: bool,
    pub lhs_dir: ArchDirection,
    /// An arrow head points into the left endpoint.
    pub lhs_into: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub rhs_into: bool,
    pub rhs_dir: ArchDirection,
    pub rhs_id: String,
    pub rhs_group: bool,
}

/// The syntax tree of any supported diagram.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "$type", rename_all = "snake_case")]
pub enum Diagram {
    Info(Info),
    Pie(Pie),
    Packet(Packet),
    Sankey(Sankey),
    Timeline(Timeline),
    Architecture(Architecture),
}

macro_rules! syntax_tree {
    ($($variant:ident => $kind:ident, $accessor:ident;)+) => {
        $(
            impl SyntaxTree for $variant {
                const KIND: DiagramKind = DiagramKind::$kind;
            }

            impl From<$variant> for Diagram {
                fn from(tree: $variant) -> Self {
                    Diagram::$variant(tree)
                }
            }
        )+

        impl Diagram {
            /// The kind of the grammar that produced this tree.
            pub fn kind(&self) -> DiagramKind {
                match self {
                    $(Diagram::$variant(_) => DiagramKind::$kind,)+
                }
            }

            $(
                pub fn $accessor(&self) -> Option<&$variant> {
                    match self {
                        Diagram::$variant(tree) => Some(tree),
                        _ => None,
                    }
                }
            )+
        }
    };
}

syntax_tree! {
    Info => Info, as_info;
    Pie => Pie, as_pie;
    Packet => Packet, as_packet;
    Sankey => Sankey, as_sankey;
    Timeline => Timeline, as_timeline;
    Architecture => Architecture, as_architecture;
}

impl Diagram {
    pub fn meta(&self) -> &TitleAndAccessibilities {
        match self {
            Diagram::Info(tree) => &tree.meta,
            Diagram::Pie(tree) => &tree.meta,
            Diagram::Packet(tree) => &tree.meta,
            Diagram::Sankey(tree) => &tree.meta,
            Diagram::Timeline(tree) => &tree.meta,
            Diagram::Architecture(tree) => &tree.meta,
        }
    }

    /// Every piece of text a renderer lays out, in document order.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.meta().title.as_deref().into_iter().collect();
        match self {
            Diagram::Info(_) => {}
            Diagram::Pie(pie) => {
                labels.extend(pie.sections.iter().map(|section| section.label.as_str()));
            }
            Diagram::Packet(packet) => {
                labels.extend(packet.blocks.iter().map(|block| block.label.as_str()));
            }
            Diagram::Sankey(sankey) => {
                labels.extend(sankey.nodes.iter().map(|node| node.id.as_str()));
            }
            Diagram::Timeline(timeline) => {
                for section in &timeline.sections {
                    labels.extend(section.title.as_deref());
                    for period in &section.periods {
                        labels.push(&period.title);
                        labels.extend(period.events.iter().map(String::as_str));
                    }
                }
            }
            Diagram::Architecture(architecture) => {
                for group in &architecture.groups {
                    labels.push(group.title.as_deref().unwrap_or(&group.id));
                }
                for service in &architecture.services {
                    labels.push(service.title.as_deref().unwrap_or(&service.id));
                }
                labels.extend(architecture.edges.iter().filter_map(|e| e.title.as_deref()));
            }
        }
        labels
    }
}
