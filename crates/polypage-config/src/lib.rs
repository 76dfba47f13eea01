pub mod discovery;
pub mod entry;
pub mod error;
pub mod flags;
pub mod project;
pub mod validation;

// Re-export main types
pub use entry::*;
pub use error::*;
pub use flags::*;
pub use project::*;

// Re-export discovery and validation
pub use discovery::{discover, ConfigDiscovery};
pub use validation::{validate_fs, validate_schema, ConfigValidator, FsValidator, SchemaValidator};
