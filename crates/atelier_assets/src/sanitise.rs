//! Public projections of asset records.

use crate::AssetStore;
use atelier_core::Entity;
use atelier_error::{AtelierResult, JsonError};
use serde_json::{Map, Value};

/// A sanitised projection: field name to JSON value.
pub type Sanitised = Map<String, Value>;

/// Fields of the default projection, besides `url`.
const DEFAULT_FIELDS: [&str; 4] = ["name", "hash", "created_at", "id"];

impl AssetStore {
    /// Default public projection of `entity`.
    ///
    /// Contains `name`, `hash`, `created_at`, `id` and the primary `url`.
    /// Absent fields are `null`.
    pub async fn sanitise<E: Entity>(&self, entity: &E) -> AtelierResult<Sanitised> {
        let mut out = self.sanitise_fields(entity, &DEFAULT_FIELDS)?;
        let url = self.url(entity, None).await?;
        out.insert("url".to_string(), Value::String(url));
        Ok(out)
    }

    /// Projection of exactly `fields`, read from the serialized record.
    ///
    /// Unknown or unset fields map to `null`.
    pub fn sanitise_fields<E: Entity>(&self, entity: &E, fields: &[&str]) -> AtelierResult<Sanitised> {
        let mut record = match serde_json::to_value(entity).map_err(|e| JsonError::new(e.to_string()))? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        if let Some(id) = entity.asset().id() {
            record.insert("id".to_string(), Value::String(id.to_string()));
        }

        Ok(fields
            .iter()
            .map(|field| {
                let value = record.get(*field).cloned().unwrap_or(Value::Null);
                (field.to_string(), value)
            })
            .collect())
    }
}
