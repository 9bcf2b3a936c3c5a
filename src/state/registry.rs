use crate::utils::{ConfigError, ImportError, Result, TargetConfig};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A target model: a name and its ordered, unique field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetDescriptor {
    pub name: String,
    pub aliases: Vec<String>,
    pub fields: Vec<String>,
}

impl TargetDescriptor {
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }
}

/// Read-only lookup from identifier (name or alias) to target. Built once at
/// startup and shared behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct TargetRegistry {
    targets: Vec<TargetDescriptor>,
    index: HashMap<String, usize>,
}

impl TargetRegistry {
    pub fn from_config(targets: &[TargetConfig]) -> std::result::Result<Self, ConfigError> {
        let mut registry = Self::default();

        for target in targets {
            let name = target.name.trim();
            if name.is_empty() {
                return Err(ConfigError::InvalidTarget("target name is empty".to_string()));
            }
            if target.fields.is_empty() {
                return Err(ConfigError::InvalidTarget(format!(
                    "target '{}' has no fields",
                    name
                )));
            }

            let mut seen = HashSet::new();
            for field in &target.fields {
                if field.trim().is_empty() {
                    return Err(ConfigError::InvalidTarget(format!(
                        "target '{}' has an empty field name",
                        name
                    )));
                }
                if !seen.insert(field.as_str()) {
                    return Err(ConfigError::InvalidTarget(format!(
                        "target '{}' declares field '{}' twice",
                        name, field
                    )));
                }
            }

            let position = registry.targets.len();
            for key in std::iter::once(name).chain(target.aliases.iter().map(|a| a.trim())) {
                if key.is_empty() {
                    return Err(ConfigError::InvalidTarget(format!(
                        "target '{}' has an empty alias",
                        name
                    )));
                }
                if registry.index.insert(key.to_string(), position).is_some() {
                    return Err(ConfigError::InvalidTarget(format!(
                        "identifier '{}' is registered more than once",
                        key
                    )));
                }
            }

            registry.targets.push(TargetDescriptor {
                name: name.to_string(),
                aliases: target.aliases.iter().map(|a| a.trim().to_string()).collect(),
                fields: target.fields.clone(),
            });
        }

        Ok(registry)
    }

    /// Resolves the `map_to` parameter. Absence is reported before lookup;
    /// whitespace-only counts as absent, otherwise matching is exact.
    pub fn resolve(&self, identifier: Option<&str>) -> Result<&TargetDescriptor> {
        let identifier = match identifier {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                return Err(ImportError::MapModelNotPassed(
                    "Target model was not passed in 'map_to'".to_string(),
                ))
            }
        };

        self.index
            .get(identifier)
            .map(|&position| &self.targets[position])
            .ok_or_else(|| {
                ImportError::MapModelNotFound(format!(
                    "Target model '{}' is not registered",
                    identifier
                ))
            })
    }

    pub fn targets(&self) -> &[TargetDescriptor] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
