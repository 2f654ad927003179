//! Configuration for assembling network datasets from tables.
//!
//! The alias lists drive column auto-detection in [`crate::assemble`]. They are
//! ranked: earlier entries win over later ones when several are present.

use serde::{Deserialize, Serialize};

use crate::{
    defaults::{
        LABEL_ALIAS_NAMES, NODE_ID_ALIAS_NAMES, SOURCE_COLUMN_ALIAS_NAMES,
        TARGET_COLUMN_ALIAS_NAMES,
    },
    errors::NetworkDataError,
};

/// Ranked candidate column names for each role.
///
/// # Examples
///
/// ```rust
/// use networkdata::config::ColumnAliases;
///
/// let aliases = ColumnAliases::default();
/// assert_eq!(aliases.source[0], "source");
/// assert_eq!(aliases.node_id, vec!["id", "node_id"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnAliases {
    pub source: Vec<String>,
    pub target: Vec<String>,
    pub node_id: Vec<String>,
    pub label: Vec<String>,
}

impl Default for ColumnAliases {
    fn default() -> Self {
        Self {
            source: to_owned(SOURCE_COLUMN_ALIAS_NAMES),
            target: to_owned(TARGET_COLUMN_ALIAS_NAMES),
            node_id: to_owned(NODE_ID_ALIAS_NAMES),
            label: to_owned(LABEL_ALIAS_NAMES),
        }
    }
}

/// Settings shared by every `assemble` call.
///
/// Missing fields in a config document fall back to their defaults:
///
/// ```rust
/// use networkdata::config::AssembleConfig;
///
/// let cfg = AssembleConfig::from_json_str(r#"{"aliases": {"source": ["src"]}}"#).unwrap();
/// assert_eq!(cfg.aliases.source, vec!["src"]);
/// assert_eq!(cfg.aliases.target[0], "target");
/// assert!(cfg.case_insensitive);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssembleConfig {
    pub aliases: ColumnAliases,
    /// Run a second, ASCII case-insensitive detection pass after the exact one.
    ///
    /// **Default:** `true`
    pub case_insensitive: bool,
}

impl Default for AssembleConfig {
    fn default() -> Self {
        Self {
            aliases: ColumnAliases::default(),
            case_insensitive: true,
        }
    }
}

impl AssembleConfig {
    pub fn new(aliases: ColumnAliases) -> Self {
        Self {
            aliases,
            ..Self::default()
        }
    }

    /// Exact-match detection only.
    pub fn strict() -> Self {
        Self {
            case_insensitive: false,
            ..Self::default()
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, NetworkDataError> {
        Ok(serde_json::from_str(raw)?)
    }
}

fn to_owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}
