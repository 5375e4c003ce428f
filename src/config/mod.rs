//! Configuration loading and management

use crate::core::aggregate::AggregateScope;
use crate::core::error::ViewError;
use crate::core::sort::SortSpec;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// List settings for one entity type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityViewConfig {
    /// Sort applied before the user picks a column (e.g. "start_date:desc")
    #[serde(default)]
    pub default_sort: Option<String>,

    /// Page size override for this entity
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Whether summary figures follow the filters or cover every record
    #[serde(default)]
    pub aggregate_scope: AggregateScope,
}

/// Complete configuration for the list views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,

    /// Choices offered by the page-size selector; empty means the standard
    /// choices up to `max_page_size` (see [`ViewConfig::page_size_options`])
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub page_size_options: Vec<usize>,

    /// Per-entity settings (entity_type -> settings)
    #[serde(default)]
    pub entities: HashMap<String, EntityViewConfig>,
}

fn default_page_size() -> usize {
    10
}

fn default_max_page_size() -> usize {
    crate::core::query::MAX_PAGE_SIZE
}

/// Standard page-size choices, trimmed to the configured maximum
const STANDARD_PAGE_SIZES: [usize; 4] = [10, 25, 50, 100];

impl ViewConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configured sizes and sorts are usable
    pub fn validate(&self) -> Result<(), ViewError> {
        let invalid = |message: String| ViewError::Config { message };

        if self.max_page_size == 0 {
            return Err(invalid("max_page_size must be at least 1".to_string()));
        }
        // Above the maximum it is capped by `page_size_for`
        if self.default_page_size == 0 {
            return Err(invalid("default_page_size must be at least 1".to_string()));
        }
        if let Some(size) = self
            .page_size_options
            .iter()
            .find(|s| **s == 0 || **s > self.max_page_size)
        {
            return Err(invalid(format!("page size option {} is out of range", size)));
        }
        for (entity_type, entity) in &self.entities {
            if let Some(size) = entity.page_size
                && (size == 0 || size > self.max_page_size)
            {
                return Err(invalid(format!(
                    "page_size {} for '{}' is out of range",
                    size, entity_type
                )));
            }
            if let Some(sort) = &entity.default_sort {
                SortSpec::parse(sort).map_err(|e| {
                    invalid(format!("default_sort for '{}': {}", entity_type, e))
                })?;
            }
        }
        Ok(())
    }

    /// Page-size choices for the selector
    ///
    /// Explicit options are returned as configured. Otherwise the standard
    /// sizes up to `max_page_size` are offered, or just the maximum when it is
    /// below every standard size.
    pub fn page_size_options(&self) -> Vec<usize> {
        if !self.page_size_options.is_empty() {
            return self.page_size_options.clone();
        }
        let options: Vec<usize> = STANDARD_PAGE_SIZES
            .into_iter()
            .filter(|size| *size <= self.max_page_size)
            .collect();
        if options.is_empty() {
            vec![self.max_page_size.max(1)]
        } else {
            options
        }
    }

    /// Settings for `entity_type`, or defaults when not configured
    pub fn entity(&self, entity_type: &str) -> EntityViewConfig {
        self.entities.get(entity_type).cloned().unwrap_or_default()
    }

    /// Page size for `entity_type`, capped at `max_page_size`
    pub fn page_size_for(&self, entity_type: &str) -> usize {
        self.entities
            .get(entity_type)
            .and_then(|e| e.page_size)
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size.max(1))
    }

    /// Merge several configurations
    ///
    /// Later configurations win: scalar settings are taken from the last
    /// config, entity settings are replaced per entity type.
    pub fn merge(configs: Vec<ViewConfig>) -> Self {
        let mut configs = configs.into_iter();
        let Some(mut merged) = configs.next() else {
            return Self::default_config();
        };
        for config in configs {
            merged.default_page_size = config.default_page_size;
            merged.max_page_size = config.max_page_size;
            merged.page_size_options = config.page_size_options;
            merged.entities.extend(config.entities);
        }
        merged
    }

    /// Create a default configuration for the admin console tables
    pub fn default_config() -> Self {
        let entity = |sort: &str, scope: AggregateScope| EntityViewConfig {
            default_sort: Some(sort.to_string()),
            page_size: None,
            aggregate_scope: scope,
        };

        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            page_size_options: Vec::new(),
            entities: HashMap::from([
                (
                    "employee".to_string(),
                    entity("name:asc", AggregateScope::Filtered),
                ),
                (
                    "leave_request".to_string(),
                    entity("applied_at:desc", AggregateScope::Filtered),
                ),
                (
                    "invoice_line".to_string(),
                    entity("position:asc", AggregateScope::All),
                ),
                (
                    "project".to_string(),
                    entity("created_at:desc", AggregateScope::Filtered),
                ),
            ]),
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::default_config()
    }
}
