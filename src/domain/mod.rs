//! Domain value objects and types.
//!
//! Type-safe wrappers for the inputs an indexing trigger supplies. They are
//! validated at construction time so a pass never starts from blank or
//! unresolvable input.

pub mod errors;
pub mod index_request;
pub mod root_id;
pub mod root_location;

pub use errors::ValidationError;
pub use index_request::IndexRequest;
pub use root_id::RootId;
pub use root_location::RootLocation;
