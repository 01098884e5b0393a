//! Declarative, versioned schema documents.
//!
//! A schema is immutable once loaded. Mapping groups, the fields inside each
//! group and computed fields all keep document order, because computed fields
//! may read fields computed before them.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::functions::{FunctionKind, FunctionRegistry};

/// A JSON object whose entries keep their document order.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedEntries<T>(Vec<(String, T)>);

impl<T> Default for NamedEntries<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> NamedEntries<T> {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        self.0
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, entry)| entry)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> FromIterator<(String, T)> for NamedEntries<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for NamedEntries<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
            type Value = NamedEntries<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of named entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, entry)) = map.next_entry::<String, T>()? {
                    entries.push((name, entry));
                }
                Ok(NamedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

impl<T: Serialize> Serialize for NamedEntries<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, entry) in &self.0 {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

/// One source-to-target field mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Dot path into the raw post. Mappings without a source only place
    /// their default.
    #[serde(default)]
    pub source_field: Option<String>,
    /// Dot path into the canonical record.
    pub target_field: String,
    /// Preprocessing function names, applied in order.
    #[serde(default)]
    pub preprocessing: Vec<String>,
    #[serde(default)]
    pub validation: Option<String>,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub default_value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedField {
    pub target_field: String,
    pub computation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityThresholds {
    #[serde(default)]
    pub minimum_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationRules {
    #[serde(default)]
    pub required_fields: Vec<String>,
    #[serde(default)]
    pub data_quality_thresholds: QualityThresholds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub platform: String,
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Mapping groups (e.g. `core_fields`, `engagement`), each a set of named
    /// field mappings.
    #[serde(default)]
    pub field_mappings: NamedEntries<NamedEntries<FieldMapping>>,
    #[serde(default)]
    pub computed_fields: NamedEntries<ComputedField>,
    #[serde(default)]
    pub validation_rules: ValidationRules,
}

/// A function name referenced by a schema that the registry does not provide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFunction {
    pub kind: FunctionKind,
    pub name: String,
    pub target_field: String,
}

impl fmt::Display for UnknownFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} function '{}' (target '{}')",
            self.kind, self.name, self.target_field
        )
    }
}

impl Schema {
    /// Registry key, `"{platform}_v{version}"`.
    #[must_use]
    pub fn key(&self) -> String {
        schema_key(&self.platform, &self.schema_version)
    }

    /// Every field mapping in document order, with its group name.
    pub fn mappings(&self) -> impl Iterator<Item = (&str, &str, &FieldMapping)> {
        self.field_mappings.iter().flat_map(|(group, fields)| {
            fields
                .iter()
                .map(move |(name, mapping)| (group, name, mapping))
        })
    }

    /// Function names this schema references that `registry` lacks. The
    /// pipeline skips such steps at runtime, so this is a load-time diagnostic.
    #[must_use]
    pub fn unknown_functions(&self, registry: &FunctionRegistry) -> Vec<UnknownFunction> {
        let preprocessing = self.mappings().flat_map(|(_, _, mapping)| {
            mapping
                .preprocessing
                .iter()
                .filter(|name| !registry.contains(FunctionKind::Preprocessing, name))
                .map(|name| UnknownFunction {
                    kind: FunctionKind::Preprocessing,
                    name: name.clone(),
                    target_field: mapping.target_field.clone(),
                })
        });
        let computation = self
            .computed_fields
            .iter()
            .filter(|(_, field)| !registry.contains(FunctionKind::Computation, &field.computation))
            .map(|(_, field)| UnknownFunction {
                kind: FunctionKind::Computation,
                name: field.computation.clone(),
                target_field: field.target_field.clone(),
            });
        preprocessing.chain(computation).collect()
    }
}

#[must_use]
pub fn schema_key(platform: &str, version: &str) -> String {
    format!("{platform}_v{version}")
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
