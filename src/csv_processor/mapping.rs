use crate::state::TargetDescriptor;
use crate::utils::{ImportError, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Caller-supplied renaming: target field -> output key.
pub type MappingRequest = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnBinding {
    pub field: String,
    pub output_key: String,
}

/// One binding per target field, in target field order. Output keys are not
/// deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveColumnMap {
    bindings: Vec<ColumnBinding>,
}

impl EffectiveColumnMap {
    pub fn identity(target: &TargetDescriptor) -> Self {
        Self {
            bindings: target
                .fields
                .iter()
                .map(|field| ColumnBinding {
                    field: field.clone(),
                    output_key: field.clone(),
                })
                .collect(),
        }
    }

    pub fn bindings(&self) -> &[ColumnBinding] {
        &self.bindings
    }

    pub fn output_keys(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|b| b.output_key.as_str())
    }
}

pub fn resolve_mapping(
    target: &TargetDescriptor,
    mapping: Option<&MappingRequest>,
) -> Result<EffectiveColumnMap> {
    let mut column_map = EffectiveColumnMap::identity(target);
    let mapping = match mapping {
        Some(m) => m,
        None => return Ok(column_map),
    };

    let unknown: Vec<&str> = mapping
        .keys()
        .filter(|key| !target.has_field(key))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        return Err(ImportError::MappingsInvalid(format!(
            "Unknown fields for target '{}': {}",
            target.name,
            unknown.join(", ")
        )));
    }

    let blank: Vec<&str> = mapping
        .iter()
        .filter(|(_, alias)| alias.trim().is_empty())
        .map(|(field, _)| field.as_str())
        .collect();
    if !blank.is_empty() {
        return Err(ImportError::MappingsInvalid(format!(
            "Empty output key for fields: {}",
            blank.join(", ")
        )));
    }

    for binding in &mut column_map.bindings {
        if let Some(alias) = mapping.get(&binding.field) {
            binding.output_key = alias.clone();
        }
    }

    Ok(column_map)
}
