//! Keyed records fed to the builder

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;

use crate::error::{GraphError, Result};
use crate::storage::Value;

/// A key→value record, such as one row of a query result or one JSON object
pub trait Record {
    /// Every field in the record's own key order
    fn fields(&self) -> Result<Vec<(String, Value)>>;

    /// One field, `None` if the key is absent
    fn field(&self, key: &str) -> Result<Option<Value>> {
        Ok(self
            .fields()?
            .into_iter()
            .find_map(|(k, v)| (k == key).then_some(v)))
    }
}

impl Record for serde_json::Map<String, serde_json::Value> {
    fn fields(&self) -> Result<Vec<(String, Value)>> {
        Ok(self.iter().map(|(k, v)| (k.clone(), Value::from(v))).collect())
    }

    fn field(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.get(key).map(Value::from))
    }
}

impl Record for serde_json::Value {
    fn fields(&self) -> Result<Vec<(String, Value)>> {
        match self {
            serde_json::Value::Object(map) => map.fields(),
            other => Err(GraphError::configuration(format!(
                "record must be a JSON object, got {}",
                other
            ))),
        }
    }
}

impl<V: Clone + Into<Value>> Record for HashMap<String, V> {
    fn fields(&self) -> Result<Vec<(String, Value)>> {
        Ok(self.iter().map(|(k, v)| (k.clone(), v.clone().into())).collect())
    }

    fn field(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.get(key).cloned().map(Into::into))
    }
}

impl<V: Clone + Into<Value>> Record for BTreeMap<String, V> {
    fn fields(&self) -> Result<Vec<(String, Value)>> {
        Ok(self.iter().map(|(k, v)| (k.clone(), v.clone().into())).collect())
    }

    fn field(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.get(key).cloned().map(Into::into))
    }
}

impl<V: Clone + Into<Value>> Record for IndexMap<String, V> {
    fn fields(&self) -> Result<Vec<(String, Value)>> {
        Ok(self.iter().map(|(k, v)| (k.clone(), v.clone().into())).collect())
    }

    fn field(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.get(key).cloned().map(Into::into))
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn fields(&self) -> Result<Vec<(String, Value)>> {
        (**self).fields()
    }

    fn field(&self, key: &str) -> Result<Option<Value>> {
        (**self).field(key)
    }
}
