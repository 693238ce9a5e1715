use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use common::types::Selection;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::agrupador::TipoAgrupador;
use crate::errors::ModelError;

/// Identifier of every record; unique within its collection.
pub type EntityId = u64;

/// Partial update body: only the keys present are applied, `null` included.
pub type Patch = Map<String, Value>;

/// A field value as seen by the sort comparator.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    /// Total order used for sorting. Values of different kinds order by kind,
    /// integers and floats compare numerically, NaN equals everything.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        use FieldValue::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Int(a), Float(b)) => (*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal),
            (Float(a), Int(b)) => a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal),
            (Text(a), Text(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            (DateTime(a), DateTime(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Bool(_) => 0,
            FieldValue::Int(_) | FieldValue::Float(_) => 1,
            FieldValue::Text(_) => 2,
            FieldValue::Date(_) => 3,
            FieldValue::DateTime(_) => 4,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self { FieldValue::Text(v.to_string()) }
}

impl From<&String> for FieldValue {
    fn from(v: &String) -> Self { FieldValue::Text(v.clone()) }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self { FieldValue::Bool(v) }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self { FieldValue::Int(v as i64) }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self { FieldValue::Int(v) }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self { FieldValue::Int(i64::from(v)) }
}

/// A record stored in a collection and served through the CRUD endpoints.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Creation payload; everything but the server-assigned fields.
    type Input: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    /// Singular name used in messages and logs.
    const NAME: &'static str;
    /// Collection path of the REST resource.
    const RESOURCE: &'static str;
    /// Whether the record can be the child side of a link (papel/funcionalidade -> permissao).
    const LINK_CHILD: bool = false;

    fn id(&self) -> EntityId;

    /// Build a new record from its input and the id chosen by the store.
    fn from_input(id: EntityId, input: Self::Input) -> Result<Self, ModelError>;

    /// Value of a named field (wire name, camelCase) for sorting.
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Text searched by the free-text filter.
    fn search_text(&self) -> String;

    fn nome(&self) -> &str;

    fn descricao(&self) -> Option<&str> { None }

    fn ativo(&self) -> bool;

    fn tipo(&self) -> Option<TipoAgrupador> { None }

    /// Hook run after a successful merge (timestamps, versions).
    fn touch(&mut self) {}

    fn validate(&self) -> Result<(), ModelError> {
        if self.nome().trim().is_empty() {
            return Err(ModelError::Validation(format!("{} nome required", Self::NAME)));
        }
        Ok(())
    }

    fn selection(&self) -> Selection {
        Selection {
            id: self.id(),
            nome: self.nome().to_string(),
            descricao: self.descricao().map(str::to_string),
        }
    }

    /// Shallow merge of `patch` over this record. Keys absent from the patch are kept,
    /// present keys (including `null`) overwrite, `id` is never replaced.
    fn merged(&self, patch: &Patch) -> Result<Self, ModelError> {
        let mut current = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => return Err(ModelError::Serialization(format!("{} is not an object", Self::NAME))),
        };
        for (key, value) in patch {
            if key == "id" {
                continue;
            }
            current.insert(key.clone(), value.clone());
        }
        let mut updated: Self = serde_json::from_value(Value::Object(current))
            .map_err(|e| ModelError::Validation(format!("invalid {} update: {e}", Self::NAME)))?;
        updated.touch();
        updated.validate()?;
        Ok(updated)
    }
}

/// Derive a permission-style key from a display name: `"Criar Caso"` -> `"criar-caso"`.
pub fn derive_key(nome: &str) -> String {
    let mut key = String::with_capacity(nome.len());
    let mut last_dash = true;
    for ch in nome.trim().chars() {
        if ch.is_alphanumeric() || ch == ':' {
            key.extend(ch.to_lowercase());
            last_dash = false;
        } else if !last_dash {
            key.push('-');
            last_dash = true;
        }
    }
    while key.ends_with('-') {
        key.pop();
    }
    key
}

pub(crate) fn text_of(parts: &[Option<&str>]) -> String {
    parts.iter().flatten().copied().collect::<Vec<_>>().join(" ")
}
