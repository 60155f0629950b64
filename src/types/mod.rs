//! Data model types: attribute values and containers, action declarations,
//! their compiled form, and request context lookups.
//!
//! Lifecycle:
//! - `ActionDeclaration`s come from configuration and are compiled once into
//!   `CompiledAction`s, which never change afterwards.
//! - `Attributes` (or any other `AttributeMap`) belong to one telemetry
//!   record and are mutated in place.
//! - `ClientInfo` (or any other `RequestContext`) is only ever read.

mod action;
mod attr_value;
mod attributes;
mod compiled;
mod converted_type;
mod declaration;
mod request_context;

pub use action::{ActionKind, SourceRule};
pub use attr_value::AttrValue;
pub use attributes::Attributes;
pub use compiled::{ActionOp, CompiledAction, ExtractPattern, ValueSource};
pub use converted_type::ConvertedType;
pub use declaration::{ActionDeclaration, ActionsConfig};
pub use request_context::{
    ClientInfo, ContextKey, ContextNamespace, MULTI_VALUE_SEPARATOR, auth_value_to_attr,
};
