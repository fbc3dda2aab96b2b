//! Background indexing of user-designated directory roots.
//!
//! [`IndexingPipeline`] runs a single pass; [`IndexScheduler`] decides when
//! passes run and keeps at most one in flight per root.

pub mod batch;
pub mod pipeline;
pub mod scheduler;

pub use batch::BatchBuffer;
pub use pipeline::{
    join_relative, IndexOutcome, IndexingPipeline, DIRECTORY_MIME_TYPE, INDEX_BATCH_SIZE,
    MAX_INDEXED_ITEMS,
};
pub use scheduler::IndexScheduler;
