pub mod error;
pub mod graft;
pub mod node;
pub mod parser;
pub mod placement;
pub mod taxon;
pub mod tree;

pub use error::TreeError;
pub use graft::{graft, GraftOptions, GraftReport};
pub use node::{Node, NodeId};
pub use placement::PlacementMap;
pub use taxon::{DuplicatePolicy, Taxon, TaxonId, TaxonNamespace};
pub use tree::Tree;
