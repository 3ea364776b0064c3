use crate::tree::parse_hex_path;
use crate::yaml_model::{TreeDocument, YamlTarget};
use std::collections::{HashMap, HashSet};

/// A semantic problem in a target tree document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeIssue {
    /// Slash separated target names from the root.
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for TreeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Checks the schema cannot express: physical paths must be valid and
/// unique across the tree (lookups return the first match), and sibling
/// names must be unique.
pub fn validate_semantics(doc: &TreeDocument) -> Vec<TreeIssue> {
    let mut issues = Vec::new();
    let mut seen_paths: HashMap<Vec<u8>, String> = HashMap::new();
    check_siblings(&doc.targets, "", &mut seen_paths, &mut issues);
    issues
}

fn check_siblings(
    targets: &[YamlTarget],
    parent: &str,
    seen_paths: &mut HashMap<Vec<u8>, String>,
    issues: &mut Vec<TreeIssue>,
) {
    let mut names = HashSet::new();
    for target in targets {
        let path = format!("{parent}/{}", target.name);
        if !names.insert(target.name.as_str()) {
            issues.push(TreeIssue {
                path: path.clone(),
                message: "duplicate sibling name".into(),
            });
        }

        if let Some(value) = &target.phys_bin_path {
            match parse_hex_path(value) {
                Ok(bytes) => {
                    if let Some(first) = seen_paths.get(&bytes) {
                        issues.push(TreeIssue {
                            path: path.clone(),
                            message: format!("physical path {value} already used by {first}"),
                        });
                    } else {
                        seen_paths.insert(bytes, path.clone());
                    }
                }
                Err(reason) => issues.push(TreeIssue {
                    path: path.clone(),
                    message: format!("invalid physical path '{value}': {reason}"),
                }),
            }
        }

        check_siblings(&target.children, &path, seen_paths, issues);
    }
}
