//! Attribute mutation engine for telemetry pipelines.
//!
//! Configure an ordered list of actions (insert, update, upsert, delete,
//! hash, extract, convert), compile it once into an [`AttributeProcessor`],
//! then call [`AttributeProcessor::process`] for every record's attribute
//! set.
//!
//! ```rust
//! use attrproc_core::{ActionDeclaration, AttributeMap, AttributeProcessor, Attributes, ClientInfo};
//!
//! let processor = AttributeProcessor::new(&[
//!     ActionDeclaration::new("operation", "insert").with_value("default"),
//!     ActionDeclaration::new("svc.operation", "upsert").with_from_attribute("operation"),
//!     ActionDeclaration::new("operation", "delete"),
//! ])
//! .unwrap();
//!
//! let mut attrs = Attributes::new().with_attr("operation", "arithmetic");
//! processor.process(&ClientInfo::new(), &mut attrs);
//!
//! assert!(!attrs.contains_key("operation"));
//! assert_eq!(attrs.get("svc.operation").and_then(|v| v.as_str()), Some("arithmetic"));
//! ```
pub use compiler::compile_actions;
pub use digest::hash_value;
pub use engine::{AttributeProcessor, ProcessStats};
pub use error::ConfigError;
pub use traits::{AttributeMap, RequestContext};
pub use types::*;

mod compiler;
mod digest;
mod engine;
mod error;
mod traits;
mod types;
