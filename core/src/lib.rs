pub mod cluster;
pub mod config;
pub mod error;
pub mod index;
pub mod persist;
pub mod rank;
pub mod report;
pub mod tokenizer;

pub use error::EngineError;
pub use index::{Cluster, DocId, Document, Index};
