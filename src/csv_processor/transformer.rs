use crate::csv_processor::mapping::EffectiveColumnMap;
use crate::csv_processor::reader::ParsedCsv;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One output row. Entries keep the target's field order when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    entries: Vec<(String, String)>,
}

impl Record {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Zips each data row positionally against the column map. Short rows are
/// padded with empty strings, extra cells are dropped.
pub fn transform_rows(parsed: &ParsedCsv, column_map: &EffectiveColumnMap) -> Vec<Record> {
    parsed
        .rows
        .iter()
        .map(|row| Record {
            entries: column_map
                .bindings()
                .iter()
                .enumerate()
                .map(|(i, binding)| {
                    let value = row.get(i).cloned().unwrap_or_default();
                    (binding.output_key.clone(), value)
                })
                .collect(),
        })
        .collect()
}
