//! Dictionary encoding for RDF terms
//!
//! Maps full term values (IRIs, literals, blank nodes) to fixed-width
//! surrogate NodeIds and back. Indexes store only NodeIds; translation
//! happens at the table boundary.

pub mod node_id;
pub mod node_table;
pub mod term;

pub use node_id::NodeId;
pub use node_table::NodeTable;
pub use term::Term;
