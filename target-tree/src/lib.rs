pub mod semantic_validator;
pub mod tree;
pub mod validator;
pub mod yaml_model;

pub use semantic_validator::validate_semantics;
pub use tree::{TargetTree, TreeError, parse_hex_path, parse_tree};
pub use validator::validate_tree_schema;
