use std::collections::BTreeMap;

use super::*;
use crate::digest::hash_value;
use crate::types::{Attributes, ClientInfo};
use serde_json::json;
use yare::parameterized;


type AttrMap = BTreeMap<String, AttrValue>;

const DOCUMENT_PATTERN: &str = r"^/api/v1/document/(?P<new_user_key>.*)/update/(?P<version>.*)$";

#[derive(Clone)]
struct SharedLogBuffer(Arc<std::sync::Mutex<Vec<u8>>>);

struct SharedLogWriter(Arc<std::sync::Mutex<Vec<u8>>>);

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SharedLogBuffer {
    type Writer = SharedLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SharedLogWriter(Arc::clone(&self.0))
    }
}

impl std::io::Write for SharedLogWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Build an attribute map from a JSON object literal.
fn attrs(value: serde_json::Value) -> AttrMap {
    serde_json::from_value(value).expect("attribute literal should be a flat JSON object")
}

fn processor(declarations: Vec<ActionDeclaration>) -> AttributeProcessor {
    AttributeProcessor::new(&declarations).expect("actions should compile")
}

fn decl(key: &str, action: &str) -> ActionDeclaration {
    ActionDeclaration::new(key, action)
}

/// Run `declarations` once over `input` with an empty request context.
fn run(declarations: Vec<ActionDeclaration>, input: serde_json::Value) -> AttrMap {
    let mut map = attrs(input);
    processor(declarations).process(&(), &mut map);
    map
}

include!("values.rs");
include!("hash.rs");
include!("convert.rs");
include!("ordering.rs");
include!("config.rs");
