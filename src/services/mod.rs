//! Application service layer.
//!
//! Services contain business logic and orchestrate the aggregator, the
//! indexing scheduler and the settings store. They provide a clean boundary
//! between the MCP handlers and the core.

mod index_service;
mod search_service;

pub use index_service::{IndexService, IndexServiceImpl};
pub use search_service::{OpenReport, SearchService, SearchServiceImpl, MAX_QUERY_CHARS};
