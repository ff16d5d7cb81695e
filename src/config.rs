// SPDX-License-Identifier: MIT

//! Context source configuration for the command line
//!
//! A context can be given inline as JSON, as a JSON or YAML file, or through
//! the `ACTIONS_EXPR_CONTEXT` environment variable (which a `.env` file may set).

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::expression::Context;

/// Environment variable holding a JSON context
pub const CONTEXT_ENV_VAR: &str = "ACTIONS_EXPR_CONTEXT";

/// Where the evaluation context comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ContextSource {
    /// JSON passed on the command line
    Inline(String),
    /// Path to a `.json`, `.yaml` or `.yml` file
    File(PathBuf),
    /// JSON read from the environment
    Env(String),
    /// No context supplied
    Empty,
}

impl ContextSource {
    /// Pick a source by precedence: inline, then file, then environment
    pub fn resolve(inline: Option<String>, file: Option<PathBuf>) -> Self {
        Self::from_parts(inline, file, std::env::var(CONTEXT_ENV_VAR).ok())
    }

    pub fn from_parts(inline: Option<String>, file: Option<PathBuf>, env: Option<String>) -> Self {
        if let Some(json) = inline {
            return Self::Inline(json);
        }
        if let Some(path) = file {
            return Self::File(path);
        }
        match env {
            Some(json) if !json.trim().is_empty() => Self::Env(json),
            _ => Self::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Decode the context this source points at
    pub fn load(&self) -> Result<Context> {
        match self {
            Self::Inline(json) | Self::Env(json) => Context::from_json_str(json),
            Self::File(path) => load_file(path),
            Self::Empty => Ok(Context::empty()),
        }
    }
}

fn load_file(path: &Path) -> Result<Context> {
    log::debug!("Loading context from {}", path.display());
    let content = fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => Context::from_yaml_str(&content),
        _ => Context::from_json_str(&content),
    }
}
