//! In-memory target tree built from the YAML model.

use crate::yaml_model::{TreeDocument, YamlTarget};
use errl_ir::{TargetHandle, TargetProvider};

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("YAML deserialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("target '{target}': invalid physical path '{value}': {reason}")]
    InvalidHexPath {
        target: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<usize>,
    children: Vec<usize>,
    phys_bin_path: Option<Vec<u8>>,
    phys_dev_path: Option<String>,
    location_code: Option<String>,
    mru_id: Option<u32>,
}

/// Target tree with a synthetic `system` root at handle 0.
#[derive(Debug, Clone)]
pub struct TargetTree {
    nodes: Vec<Node>,
}

/// Parse a hex string ("0x" prefix optional) into bytes.
pub fn parse_hex_path(value: &str) -> Result<Vec<u8>, String> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    if digits.is_empty() {
        return Err("empty path".into());
    }
    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(format!("'{bad}' is not a hex digit"));
    }
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits ({})", digits.len()));
    }
    Ok(digits
        .as_bytes()
        .chunks(2)
        .map(|pair| (hex_value(pair[0]) << 4) | hex_value(pair[1]))
        .collect())
}

/// Value of an ASCII hex digit. Callers check the digit first.
fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

/// Parse a YAML string into a target tree.
pub fn parse_tree(yaml: &str) -> Result<TargetTree, TreeError> {
    let doc: TreeDocument = serde_yaml::from_str(yaml)?;
    TargetTree::from_document(&doc)
}

impl TargetTree {
    pub fn from_document(doc: &TreeDocument) -> Result<Self, TreeError> {
        let mut tree = TargetTree {
            nodes: vec![Node {
                name: "system".into(),
                parent: None,
                children: Vec::new(),
                phys_bin_path: None,
                phys_dev_path: None,
                location_code: doc.location_code.clone(),
                mru_id: None,
            }],
        };
        for target in &doc.targets {
            tree.add(0, target)?;
        }
        log::debug!("target tree loaded: {} targets", tree.nodes.len() - 1);
        Ok(tree)
    }

    fn add(&mut self, parent: usize, target: &YamlTarget) -> Result<(), TreeError> {
        let phys_bin_path = target
            .phys_bin_path
            .as_deref()
            .map(|value| {
                parse_hex_path(value).map_err(|reason| TreeError::InvalidHexPath {
                    target: target.name.clone(),
                    value: value.to_string(),
                    reason,
                })
            })
            .transpose()?;

        let index = self.nodes.len();
        self.nodes.push(Node {
            name: target.name.clone(),
            parent: Some(parent),
            children: Vec::new(),
            phys_bin_path,
            phys_dev_path: target.phys_dev_path.clone(),
            location_code: target.location_code.clone(),
            mru_id: target.mru_id,
        });
        self.nodes[parent].children.push(index);

        for child in &target.children {
            self.add(index, child)?;
        }
        Ok(())
    }

    /// Number of targets, the synthetic root excluded.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn name(&self, target: TargetHandle) -> Option<&str> {
        self.nodes.get(target.0).map(|n| n.name.as_str())
    }

    pub fn parent(&self, target: TargetHandle) -> Option<TargetHandle> {
        self.nodes.get(target.0)?.parent.map(TargetHandle)
    }

    /// First target in depth-first order with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<TargetHandle> {
        self.depth_first(0).find(|&i| self.nodes[i].name == name).map(TargetHandle)
    }

    fn depth_first(&self, start: usize) -> impl Iterator<Item = usize> + '_ {
        let mut stack = vec![start];
        std::iter::from_fn(move || {
            let index = stack.pop()?;
            stack.extend(self.nodes[index].children.iter().rev());
            Some(index)
        })
    }
}

impl TargetProvider for TargetTree {
    fn root(&self) -> TargetHandle {
        TargetHandle(0)
    }

    fn find_by_physical_path(&self, root: TargetHandle, path: &[u8]) -> Option<TargetHandle> {
        if root.0 >= self.nodes.len() {
            return None;
        }
        self.depth_first(root.0)
            .find(|&i| self.nodes[i].phys_bin_path.as_deref() == Some(path))
            .map(TargetHandle)
    }

    /// The nearest location code on the way up to the root.
    fn location_code(&self, target: TargetHandle) -> Option<String> {
        let mut current = Some(target.0);
        while let Some(index) = current {
            let node = self.nodes.get(index)?;
            if let Some(code) = &node.location_code {
                return Some(code.clone());
            }
            current = node.parent;
        }
        None
    }

    fn physical_device_path(&self, target: TargetHandle) -> Option<String> {
        self.nodes.get(target.0)?.phys_dev_path.clone()
    }

    fn mru_id(&self, target: TargetHandle) -> Option<u32> {
        self.nodes.get(target.0)?.mru_id
    }
}
