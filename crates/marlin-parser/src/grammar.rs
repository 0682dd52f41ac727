//! Grammars of the supported diagram kinds.
//!
//! Each module pairs a token builder and a value converter with production
//! rules written over the shared token stream.

pub mod architecture;
mod common;
pub mod info;
pub mod packet;
pub mod pie;
pub mod sankey;
pub mod timeline;

pub use architecture::ArchitectureGrammar;
pub use info::InfoGrammar;
pub use packet::PacketGrammar;
pub use pie::PieGrammar;
pub use sankey::SankeyGrammar;
pub use timeline::TimelineGrammar;
