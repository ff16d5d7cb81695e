// SPDX-License-Identifier: MIT

//! Evaluation context: named roots (`github`, `env`, ...) each holding a
//! string-keyed mapping of arbitrary JSON values

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::Result;

/// Read-only environment an expression is evaluated against
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Context {
    roots: HashMap<String, Map<String, Value>>,
}

impl Context {
    /// Create an empty Context
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decode from a JSON object of objects, e.g. `{"github": {"sha": "abc"}}`
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode from a YAML mapping of mappings
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Decode from an already parsed JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Builder-style insert of a root
    pub fn with_root(mut self, name: impl Into<String>, fields: Map<String, Value>) -> Self {
        self.insert(name, fields);
        self
    }

    /// Insert or replace a root
    pub fn insert(&mut self, name: impl Into<String>, fields: Map<String, Value>) {
        self.roots.insert(name.into(), fields);
    }

    /// Get a root mapping
    pub fn get(&self, name: &str) -> Option<&Map<String, Value>> {
        self.roots.get(name)
    }

    /// Get all root names
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.roots.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Convert context to a JSON object
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.roots
                .iter()
                .map(|(k, v)| (k.clone(), Value::Object(v.clone())))
                .collect(),
        )
    }
}
