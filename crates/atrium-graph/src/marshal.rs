//! Bolt-value marshalling: the only place native store types cross the
//! boundary into plain data.
//!
//! Conversion rules: integers become JSON numbers (Bolt integers are 64-bit
//! and always representable), temporal types become ISO-8601 strings, and
//! lists/maps are converted recursively. Driver values with no sensible
//! plain-data rendering (paths, spatial types without coordinates) marshal
//! to null rather than failing the whole record.

use atrium_core::Entity;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use neo4rs::BoltType;
use serde_json::{Map, Value};

use crate::client::GraphError;

/// Recursively convert a Bolt value into plain JSON data.
///
/// Converting already-plain data again is the identity: strings stay
/// strings, numbers stay numbers, so the conversion is idempotent.
pub fn bolt_to_json(value: BoltType) -> Value {
    match value {
        BoltType::Null(_) => Value::Null,
        BoltType::Boolean(b) => Value::Bool(b.value),
        BoltType::Integer(i) => Value::from(i.value),
        BoltType::Float(f) => serde_json::Number::from_f64(f.value)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        BoltType::String(s) => Value::String(s.value),
        BoltType::List(list) => Value::Array(list.value.into_iter().map(bolt_to_json).collect()),
        BoltType::Map(map) => Value::Object(
            map.value
                .into_iter()
                .map(|(k, v)| (k.value, bolt_to_json(v)))
                .collect(),
        ),
        BoltType::Bytes(b) => Value::Array(b.value.iter().map(|byte| Value::from(*byte)).collect()),
        BoltType::Date(d) => match NaiveDate::try_from(&d) {
            Ok(date) => Value::String(date.format("%Y-%m-%d").to_string()),
            Err(_) => Value::Null,
        },
        BoltType::Time(t) => {
            let (time, offset): (NaiveTime, FixedOffset) = t.into();
            let offset: Option<FixedOffset> = Some(offset);
            match offset {
                Some(offset) => Value::String(format!("{}{offset}", time.format("%H:%M:%S%.f"))),
                None => Value::String(time.format("%H:%M:%S%.f").to_string()),
            }
        }
        BoltType::LocalTime(t) => {
            let time: NaiveTime = t.into();
            Value::String(time.format("%H:%M:%S%.f").to_string())
        }
        BoltType::DateTime(dt) => dt
            .try_into()
            .map(|dt: DateTime<FixedOffset>| Value::String(dt.to_rfc3339()))
            .unwrap_or(Value::Null),
        BoltType::LocalDateTime(dt) => dt
            .try_into()
            .map(|dt: NaiveDateTime| {
                Value::String(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
            })
            .unwrap_or(Value::Null),
        BoltType::DateTimeZoneId(dt) => dt
            .try_into()
            .map(|(dt, zone): (NaiveDateTime, String)| {
                Value::String(format!("{}[{zone}]", dt.format("%Y-%m-%dT%H:%M:%S%.f")))
            })
            .unwrap_or(Value::Null),
        BoltType::Duration(d) => {
            let duration: std::time::Duration = d.into();
            Value::String(format!("PT{}S", duration.as_secs_f64()))
        }
        BoltType::Point2D(p) => {
            let mut map = Map::new();
            map.insert("x".into(), Value::from(p.x.value));
            map.insert("y".into(), Value::from(p.y.value));
            Value::Object(map)
        }
        BoltType::Point3D(p) => {
            let mut map = Map::new();
            map.insert("x".into(), Value::from(p.x.value));
            map.insert("y".into(), Value::from(p.y.value));
            map.insert("z".into(), Value::from(p.z.value));
            Value::Object(map)
        }
        BoltType::Node(node) => {
            let mut map = Map::new();
            for (key, value) in node.properties.value {
                map.insert(key.value, bolt_to_json(value));
            }
            Value::Object(map)
        }
        BoltType::Relation(rel) => {
            let mut map = Map::new();
            for (key, value) in rel.properties.value {
                map.insert(key.value, bolt_to_json(value));
            }
            Value::Object(map)
        }
        BoltType::UnboundedRelation(rel) => {
            let mut map = Map::new();
            for (key, value) in rel.properties.value {
                map.insert(key.value, bolt_to_json(value));
            }
            Value::Object(map)
        }
        BoltType::Path(_) => Value::Null,
    }
}

/// Marshal a node record: primary label as `type`, every property converted.
pub fn parse_node(node: &neo4rs::Node) -> Result<Entity, GraphError> {
    let kind = node
        .labels()
        .first()
        .map(|label| label.to_string())
        .unwrap_or_default();

    let mut properties = Map::new();
    for key in node.keys() {
        let value: BoltType = node.get(key).map_err(|e| {
            GraphError::Serialization(format!("failed to read node property `{key}`: {e}"))
        })?;
        properties.insert(key.to_string(), bolt_to_json(value));
    }
    Ok(Entity::new(kind, properties))
}

/// Marshal a relationship record: relationship type as `type`, properties
/// converted as for nodes.
pub fn parse_relationship(rel: &neo4rs::Relation) -> Result<Entity, GraphError> {
    let kind = rel.typ().to_string();

    let mut properties = Map::new();
    for key in rel.keys() {
        let value: BoltType = rel.get(key).map_err(|e| {
            GraphError::Serialization(format!("failed to read relationship property `{key}`: {e}"))
        })?;
        properties.insert(key.to_string(), bolt_to_json(value));
    }
    Ok(Entity::new(kind, properties))
}
