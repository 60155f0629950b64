use std::str::FromStr;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::types::{
    ActionDeclaration, ActionKind, ActionOp, AttrValue, CompiledAction, ContextKey,
    ConvertedType, ExtractPattern, SourceRule, ValueSource,
};

/// Compile action declarations into their runtime form.
///
/// Declarations are validated in order and the first invalid one aborts the
/// whole compilation; on success the result has the same length and order
/// as the input.
///
/// Example:
/// ```rust
/// use attrproc_core::{compile_actions, ActionDeclaration};
/// let actions = compile_actions(&[
///     ActionDeclaration::new("region", "upsert").with_value("planet-earth"),
///     ActionDeclaration::new("db.statement", "DELETE"),
/// ])
/// .unwrap();
/// assert_eq!(actions.len(), 2);
/// ```
pub fn compile_actions(
    declarations: &[ActionDeclaration],
) -> Result<Vec<CompiledAction>, ConfigError> {
    declarations
        .iter()
        .enumerate()
        .map(|(index, decl)| {
            compile_action(index, decl).inspect_err(|err| {
                warn!(event = "Compile", phase = "Rejected", index, error = %err);
            })
        })
        .collect()
}

fn compile_action(index: usize, decl: &ActionDeclaration) -> Result<CompiledAction, ConfigError> {
    if decl.key.is_empty() {
        return Err(ConfigError::MissingField {
            index,
            field: "key".to_string(),
        });
    }

    let kind = ActionKind::from_str(&decl.action).map_err(|_| ConfigError::UnsupportedAction {
        index,
        action: decl.action.clone(),
    })?;

    let op = match kind.source_rule() {
        SourceRule::ValueSource => {
            reject_unused_fields(index, kind, decl)?;
            let source = value_source(index, decl)?;
            match kind {
                ActionKind::Insert => ActionOp::Insert(source),
                ActionKind::Update => ActionOp::Update(source),
                _ => ActionOp::Upsert(source),
            }
        }
        SourceRule::SelfTransform | SourceRule::NoSource => {
            if let Some(field) = set_value_source_field(decl) {
                return Err(if kind.uses_pattern() {
                    ConfigError::UnexpectedValueSource {
                        index,
                        action: kind.to_string(),
                    }
                } else {
                    unexpected(index, kind, field)
                });
            }
            reject_unused_fields(index, kind, decl)?;
            match kind {
                ActionKind::Delete => ActionOp::Delete,
                ActionKind::Hash => ActionOp::Hash,
                ActionKind::Extract => {
                    let pattern = non_empty(&decl.pattern).ok_or(ConfigError::MissingField {
                        index,
                        field: "pattern".to_string(),
                    })?;
                    ActionOp::Extract(ExtractPattern::compile(index, pattern)?)
                }
                _ => ActionOp::Convert(converted_type(index, decl)?),
            }
        }
    };

    let action = CompiledAction {
        key: decl.key.clone(),
        op,
    };
    debug!(event = "Compile", phase = "Action", index, action = %action);
    Ok(action)
}

/// Reject `pattern` / `converted_type` on kinds that do not use them.
fn reject_unused_fields(
    index: usize,
    kind: ActionKind,
    decl: &ActionDeclaration,
) -> Result<(), ConfigError> {
    if non_empty(&decl.pattern).is_some() && !kind.uses_pattern() {
        return Err(unexpected(index, kind, "pattern"));
    }
    if non_empty(&decl.converted_type).is_some() && !kind.uses_converted_type() {
        return Err(unexpected(index, kind, "converted_type"));
    }
    Ok(())
}

fn unexpected(index: usize, kind: ActionKind, field: &str) -> ConfigError {
    ConfigError::UnexpectedField {
        index,
        action: kind.to_string(),
        field: field.to_string(),
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Name of the first value source field that is set, if any.
fn set_value_source_field(decl: &ActionDeclaration) -> Option<&'static str> {
    if decl.value.is_some() {
        Some("value")
    } else if non_empty(&decl.from_attribute).is_some() {
        Some("from_attribute")
    } else if non_empty(&decl.from_context).is_some() {
        Some("from_context")
    } else {
        None
    }
}

fn value_source(index: usize, decl: &ActionDeclaration) -> Result<ValueSource, ConfigError> {
    let from_attribute = non_empty(&decl.from_attribute);
    let from_context = non_empty(&decl.from_context);

    let configured = [
        decl.value.is_some(),
        from_attribute.is_some(),
        from_context.is_some(),
    ]
    .into_iter()
    .filter(|set| *set)
    .count();

    match configured {
        0 => return Err(ConfigError::MissingValueSource { index }),
        1 => {}
        _ => return Err(ConfigError::MultipleValueSources { index }),
    }

    if let Some(value) = &decl.value {
        return literal(index, value).map(ValueSource::Literal);
    }
    if let Some(name) = from_attribute {
        return Ok(ValueSource::FromAttribute(name.to_string()));
    }
    Ok(ValueSource::FromContext(ContextKey::parse(
        from_context.unwrap_or_default(),
    )))
}

/// Accept only scalar literals: strings, booleans, i64 integers and floats.
fn literal(index: usize, value: &Value) -> Result<AttrValue, ConfigError> {
    let unsupported = |type_name: &str| ConfigError::UnsupportedValueType {
        index,
        type_name: type_name.to_string(),
    };
    match value {
        Value::String(s) => Ok(AttrValue::Str(s.clone())),
        Value::Bool(b) => Ok(AttrValue::Bool(*b)),
        Value::Number(n) if n.is_i64() => n.as_i64().map(AttrValue::Int).ok_or(unsupported("int")),
        Value::Number(n) if n.is_f64() => {
            n.as_f64().map(AttrValue::Double).ok_or(unsupported("double"))
        }
        Value::Number(_) => Err(unsupported("u64")),
        Value::Null => Err(unsupported("null")),
        Value::Array(_) => Err(unsupported("array")),
        Value::Object(_) => Err(unsupported("object")),
    }
}

fn converted_type(index: usize, decl: &ActionDeclaration) -> Result<ConvertedType, ConfigError> {
    let raw = non_empty(&decl.converted_type).ok_or(ConfigError::MissingField {
        index,
        field: "converted_type".to_string(),
    })?;
    ConvertedType::from_str(raw).map_err(|_| ConfigError::UnsupportedConvertedType {
        index,
        converted_type: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContextNamespace;
    use insta::assert_snapshot;
    use serde_json::json;
    use yare::parameterized;

    fn decl(key: &str, action: &str) -> ActionDeclaration {
        ActionDeclaration::new(key, action)
    }

    #[test]
    fn test_compile_valid_configuration() {
        let actions = compile_actions(&[
            decl("one", "Delete"),
            decl("two", "INSERT").with_value(123),
            decl("three", "upDaTE").with_from_attribute("two"),
            decl("five", "upsert").with_from_attribute("two"),
            decl("two", "EXTRact")
                .with_pattern(r"^/api/v1/document/(?P<documentId>.*)/update$"),
            decl("six", "hash"),
            decl("seven", "Convert").with_converted_type("INT"),
            decl("eight", "insert").with_from_context("auth.subject"),
        ])
        .unwrap();

        assert_eq!(actions.len(), 8);
        assert_eq!(actions[0], CompiledAction { key: "one".into(), op: ActionOp::Delete });
        assert_eq!(
            actions[1].op,
            ActionOp::Insert(ValueSource::Literal(AttrValue::Int(123)))
        );
        assert_eq!(
            actions[2].op,
            ActionOp::Update(ValueSource::FromAttribute("two".into()))
        );
        assert_eq!(
            actions[3].op,
            ActionOp::Upsert(ValueSource::FromAttribute("two".into()))
        );
        match &actions[4].op {
            ActionOp::Extract(pattern) => assert_eq!(pattern.attr_names(), &["", "documentId"]),
            other => panic!("expected extract, got {other:?}"),
        }
        assert_eq!(actions[5].op, ActionOp::Hash);
        assert_eq!(actions[6].op, ActionOp::Convert(ConvertedType::Int));
        assert_eq!(
            actions[7].op,
            ActionOp::Insert(ValueSource::FromContext(ContextKey {
                namespace: ContextNamespace::Auth,
                name: "subject".into(),
            }))
        );
    }

    #[test]
    fn test_compile_empty_list() {
        assert!(compile_actions(&[]).unwrap().is_empty());
    }

    #[parameterized(
        string = { json!("redacted"), AttrValue::Str("redacted".into()) },
        boolean = { json!(false), AttrValue::Bool(false) },
        integer = { json!(-7), AttrValue::Int(-7) },
        double = { json!(2.5), AttrValue::Double(2.5) },
    )]
    fn test_compile_literal_types(value: Value, expected: AttrValue) {
        let actions = compile_actions(&[decl("k", "upsert").with_value(value)]).unwrap();
        assert_eq!(actions[0].op, ActionOp::Upsert(ValueSource::Literal(expected)));
    }

    #[parameterized(
        missing_key = {
            vec![decl("one", "delete"), decl("", "upsert").with_value(123)],
            ConfigError::MissingField { index: 1, field: "key".into() }
        },
        unsupported_action = {
            vec![decl("invalid", "invalid")],
            ConfigError::UnsupportedAction { index: 0, action: "invalid".into() }
        },
        unsupported_value_array = {
            vec![decl("UnsupportedValue", "upsert").with_value(json!([]))],
            ConfigError::UnsupportedValueType { index: 0, type_name: "array".into() }
        },
        unsupported_value_object = {
            vec![decl("UnsupportedValue", "insert").with_value(json!({"a": 1}))],
            ConfigError::UnsupportedValueType { index: 0, type_name: "object".into() }
        },
        unsupported_value_u64 = {
            vec![decl("UnsupportedValue", "insert").with_value(u64::MAX)],
            ConfigError::UnsupportedValueType { index: 0, type_name: "u64".into() }
        },
        missing_value_source = {
            vec![decl("MissingValueFromAttributes", "insert")],
            ConfigError::MissingValueSource { index: 0 }
        },
        empty_from_attribute_is_missing = {
            vec![decl("k", "update").with_from_attribute("")],
            ConfigError::MissingValueSource { index: 0 }
        },
        both_set = {
            vec![decl("BothSet", "upsert").with_value(123).with_from_attribute("aa")],
            ConfigError::MultipleValueSources { index: 0 }
        },
        attribute_and_context = {
            vec![decl("ok", "delete"), decl("k", "insert").with_from_attribute("a").with_from_context("b")],
            ConfigError::MultipleValueSources { index: 1 }
        },
        pattern_on_insert = {
            vec![decl("key", "insert").with_pattern("(?P<operation_website>.*?)$").with_from_attribute("aa")],
            ConfigError::UnexpectedField { index: 0, action: "insert".into(), field: "pattern".into() }
        },
        converted_type_on_upsert = {
            vec![decl("key", "upsert").with_value(1).with_converted_type("int")],
            ConfigError::UnexpectedField { index: 0, action: "upsert".into(), field: "converted_type".into() }
        },
        extract_missing_pattern = {
            vec![decl("aa", "extract")],
            ConfigError::MissingField { index: 0, field: "pattern".into() }
        },
        extract_with_value = {
            vec![decl("Key", "extract").with_pattern("(?P<operation_website>.*?)$").with_value("value")],
            ConfigError::UnexpectedValueSource { index: 0, action: "extract".into() }
        },
        extract_with_from_attribute = {
            vec![decl("key", "extract").with_pattern("(?P<operation_website>.*?)$").with_from_attribute("aa")],
            ConfigError::UnexpectedValueSource { index: 0, action: "extract".into() }
        },
        extract_no_named_groups = {
            vec![decl("aa", "extract").with_pattern(".*$")],
            ConfigError::NoNamedGroups { index: 0 }
        },
        extract_only_unnamed_groups = {
            vec![decl("aa", "extract").with_pattern("^(.*)/(.*)$")],
            ConfigError::NoNamedGroups { index: 0 }
        },
        extract_unnamed_group = {
            vec![decl("aa", "extract").with_pattern(r"^/api/v1/document/(?P<new_user_key>.*)/update/(.*)$")],
            ConfigError::UnnamedGroupPresent { index: 0 }
        },
        delete_with_pattern = {
            vec![decl("ab", "delete").with_pattern("(?P<operation_website>.*?)$")],
            ConfigError::UnexpectedField { index: 0, action: "delete".into(), field: "pattern".into() }
        },
        delete_with_value = {
            vec![decl("ab", "delete").with_value("x")],
            ConfigError::UnexpectedField { index: 0, action: "delete".into(), field: "value".into() }
        },
        hash_with_from_context = {
            vec![decl("ab", "hash").with_from_context("metadata.x")],
            ConfigError::UnexpectedField { index: 0, action: "hash".into(), field: "from_context".into() }
        },
        convert_missing_type = {
            vec![decl("ab", "convert")],
            ConfigError::MissingField { index: 0, field: "converted_type".into() }
        },
        convert_unsupported_type = {
            vec![decl("ab", "convert").with_converted_type("float")],
            ConfigError::UnsupportedConvertedType { index: 0, converted_type: "float".into() }
        },
        extract_with_empty_pattern = {
            vec![decl("aa", "extract").with_pattern("")],
            ConfigError::MissingField { index: 0, field: "pattern".into() }
        },
        convert_with_empty_type = {
            vec![decl("ab", "convert").with_converted_type("")],
            ConfigError::MissingField { index: 0, field: "converted_type".into() }
        },
        convert_with_from_attribute = {
            vec![decl("ab", "convert").with_converted_type("int").with_from_attribute("x")],
            ConfigError::UnexpectedField { index: 0, action: "convert".into(), field: "from_attribute".into() }
        },
    )]
    fn test_invalid_config(declarations: Vec<ActionDeclaration>, expected: ConfigError) {
        assert_eq!(compile_actions(&declarations).unwrap_err(), expected);
    }

    #[parameterized(
        delete = { decl("ab", "delete").with_pattern("") },
        hash = { decl("ab", "hash").with_pattern("").with_converted_type("") },
        insert = { decl("ab", "insert").with_value(1).with_pattern("") },
        extract = { decl("ab", "extract").with_pattern("(?P<x>.*)").with_converted_type("") },
    )]
    fn test_empty_optional_fields_count_as_unset(declaration: ActionDeclaration) {
        let actions = compile_actions(&[declaration.clone()]).unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].key, declaration.key);
    }

    #[test]
    fn test_first_error_wins() {
        let err = compile_actions(&[
            decl("ok", "delete"),
            decl("bad", "insert"),
            decl("", "nope"),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingValueSource { index: 1 });
    }

    #[test]
    fn test_invalid_pattern_message() {
        let err = compile_actions(&[decl("aa", "extract").with_pattern("(?P<doc>.*")]).unwrap_err();
        assert_eq!(err.index(), Some(0));
        assert!(err
            .to_string()
            .starts_with(r#"field "pattern" has invalid pattern "(?P<doc>.*" at the 0-th action"#));
    }

    #[test]
    fn test_missing_value_source_message() {
        let err = compile_actions(&[decl("k", "insert")]).unwrap_err();
        assert_snapshot!(
            err.to_string(),
            @r#"either field "value", "from_attribute" or "from_context" must be specified for the 0-th action"#
        );
    }
}
