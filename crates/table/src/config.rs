use crate::error::{Result, TableError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where a rollup finds its node fields inside a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RollupConfig {
    /// Column holding the node id
    pub id_column: String,

    /// Column holding the parent id
    pub parent_column: String,

    /// Column holding the cost to roll up
    pub cost_column: String,

    /// Parent value that marks a root
    pub root_sentinel: i64,
}

impl Default for RollupConfig {
    fn default() -> Self {
        Self {
            id_column: "ID".to_string(),
            parent_column: "parent_ID".to_string(),
            cost_column: "cost".to_string(),
            root_sentinel: -1,
        }
    }
}

impl RollupConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)
            .map_err(|err| TableError::invalid_config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        log::debug!("Loading rollup config from {}", path.display());
        Self::from_toml_str(&raw)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let columns = [
            ("id_column", &self.id_column),
            ("parent_column", &self.parent_column),
            ("cost_column", &self.cost_column),
        ];

        for (key, value) in columns {
            if value.trim().is_empty() {
                return Err(TableError::invalid_config(format!("{key} must not be empty")));
            }
        }

        for (i, (key, value)) in columns.iter().enumerate() {
            if let Some((other, _)) = columns[i + 1..].iter().find(|(_, v)| v == value) {
                return Err(TableError::invalid_config(format!(
                    "{key} and {other} both name column '{value}'"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_bom_layout() {
        let config = RollupConfig::default();
        assert_eq!(config.id_column, "ID");
        assert_eq!(config.parent_column, "parent_ID");
        assert_eq!(config.cost_column, "cost");
        assert_eq!(config.root_sentinel, -1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RollupConfig::from_toml_str(
            r#"
            id_column = "item_no"
            root_sentinel = 0
            "#,
        )
        .unwrap();

        assert_eq!(
            config,
            RollupConfig {
                id_column: "item_no".to_string(),
                root_sentinel: 0,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = RollupConfig::from_toml_str("id_colum = \"x\"").unwrap_err();
        assert!(err.to_string().contains("id_colum"), "{err}");
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let config = RollupConfig {
            cost_column: "ID".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("id_column and cost_column"), "{err}");
    }

    #[test]
    fn test_empty_column_rejected() {
        let config = RollupConfig {
            parent_column: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TableError::InvalidConfig(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rollup.toml");
        std::fs::write(&path, "cost_column = \"avg_cost\"\n").unwrap();

        let config = RollupConfig::load(&path).unwrap();
        assert_eq!(config.cost_column, "avg_cost");
    }
}
