//! Resource snapshots passed to the lifecycle hooks.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one resource instance the engine is working on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceInfo {
    /// Resource address within its module, e.g. `aws_instance.web`
    pub id: String,
    /// Module path starting at `root`
    pub module_path: Vec<String>,
    pub resource_type: String,
}

impl InstanceInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            module_path: vec!["root".to_string()],
            resource_type: String::new(),
        }
    }

    pub fn with_module_path(mut self, path: Vec<String>) -> Self {
        self.module_path = path;
        self
    }

    /// Address including any non-root modules, e.g.
    /// `module.net.module.vpc.aws_vpc.main`.
    pub fn human_id(&self) -> String {
        if self.module_path.len() <= 1 {
            return self.id.clone();
        }
        let modules: Vec<String> = self.module_path[1..]
            .iter()
            .map(|m| format!("module.{m}"))
            .collect();
        format!("{}.{}", modules.join("."), self.id)
    }
}

/// Last known state of a resource instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceState {
    pub id: String,
    pub attributes: BTreeMap<String, String>,
    pub tainted: bool,
}

impl InstanceState {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.id.is_empty() {
            return write!(f, "<not created>");
        }
        write!(f, "ID = {}", self.id)?;
        for (key, value) in &self.attributes {
            write!(f, "\n{key} = {value}")?;
        }
        if self.tainted {
            write!(f, "\nTainted = true")?;
        }
        Ok(())
    }
}

/// Planned change to a single attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAttrDiff {
    pub old: String,
    pub new: String,
    pub new_computed: bool,
    pub new_removed: bool,
    pub requires_new: bool,
    pub sensitive: bool,
}

/// Planned change to a resource instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceDiff {
    pub attributes: BTreeMap<String, ResourceAttrDiff>,
    pub destroy: bool,
    pub destroy_tainted: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, serde_json::Value>,
}

impl InstanceDiff {
    pub fn with_attribute(mut self, key: impl Into<String>, diff: ResourceAttrDiff) -> Self {
        self.attributes.insert(key.into(), diff);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && !self.destroy && !self.destroy_tainted
    }
}

/// Full engine state, handed to `post_state_update`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub lineage: String,
    pub serial: u64,
    pub resources: BTreeMap<String, InstanceState>,
}
