use jsonschema::Validator;
use serde_json::Value;
use std::sync::LazyLock;

const SCHEMA_JSON: &str = include_str!("../../docs/target-tree-schema/schema.json");

static TREE_SCHEMA: LazyLock<Validator> = LazyLock::new(|| {
    let schema: Value = serde_json::from_str(SCHEMA_JSON).expect("embedded schema is valid JSON");
    jsonschema::draft202012::new(&schema).expect("embedded schema is a valid JSON Schema")
});

/// Schema violation at a JSON pointer into the tree document.
#[derive(Debug, Clone)]
pub struct SchemaError {
    pub pointer: String,
    pub message: String,
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.pointer.as_str() {
            "" => write!(f, "schema: {}", self.message),
            pointer => write!(f, "schema: {pointer}: {}", self.message),
        }
    }
}

/// Check a target tree document against the embedded JSON Schema.
///
/// YAML that does not parse is reported as a single error at the root.
pub fn validate_tree_schema(yaml_text: &str) -> Result<(), Vec<SchemaError>> {
    let document: Value = match serde_yaml::from_str(yaml_text) {
        Ok(document) => document,
        Err(e) => {
            return Err(vec![SchemaError {
                pointer: String::new(),
                message: format!("YAML parse error: {e}"),
            }]);
        }
    };

    let errors: Vec<SchemaError> = TREE_SCHEMA
        .iter_errors(&document)
        .map(|e| SchemaError {
            pointer: e.instance_path().to_string(),
            message: e.to_string(),
        })
        .collect();

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
