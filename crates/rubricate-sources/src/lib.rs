//! rubricate-sources: where datasets and criteria documents come from.
//!
//! Implements the `DatasetSource` trait for local files and plain HTTP, and
//! loads the `rubricate.toml` configuration that picks the source, the
//! criteria variant and the state directory.

pub mod config;
pub mod criteria_doc;
pub mod http;
pub mod local;
pub mod mock;

pub use config::{create_source, load_config, load_config_from, resolve_criteria, RubricateConfig};
pub use criteria_doc::{fetch_criteria_doc, load_inputs, SessionInputs};
pub use http::HttpSource;
pub use local::LocalFileSource;
pub use mock::MockSource;
