//! Cypher statements and result shaping.

use serde_json::Value;

use crate::errors::{Neo4jGatewayError, Result};

/// Name of the built-in query listing every architect.
pub const ARCHITECTS: &str = "architects";

const ARCHITECTS_CYPHER: &str = "match (a:Architect) return a.name as name";

/// How a row is turned into the value handed to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// The value of one named column.
    Column(String),
    /// The only column of a single-column row, otherwise the whole row.
    ///
    /// Rows decode into JSON objects keyed by column name and the driver does
    /// not report the projection order, so a multi-column row has no "first"
    /// column to pick and is kept whole.
    Auto,
}

impl Projection {
    pub fn apply(&self, row: Value) -> Result<Value> {
        match self {
            Projection::Column(name) => column(row, name),
            Projection::Auto => match row {
                Value::Object(map) if map.len() == 1 => {
                    Ok(map.into_iter().next().map(|(_, v)| v).unwrap_or(Value::Null))
                }
                other => Ok(other),
            },
        }
    }
}

/// A resolved statement: Cypher text plus the projection of its rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub cypher: String,
    pub projection: Projection,
}

impl Statement {
    /// Resolve named queries; anything else runs verbatim.
    pub fn resolve(text: &str) -> Self {
        match text {
            ARCHITECTS => Self {
                cypher: ARCHITECTS_CYPHER.to_string(),
                projection: Projection::Column("name".to_string()),
            },
            _ => Self::cypher(text),
        }
    }

    /// A verbatim statement.
    pub fn cypher(text: impl Into<String>) -> Self {
        Self {
            cypher: text.into(),
            projection: Projection::Auto,
        }
    }
}

/// How many rows a query yields and how each is shaped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QueryMode {
    /// Every row, through the statement's projection.
    #[default]
    Rows,
    /// Only the first row, reduced to `field`.
    Single { field: String },
}

impl QueryMode {
    pub fn single(field: impl Into<String>) -> Self {
        Self::Single {
            field: field.into(),
        }
    }
}

/// The value of column `name` in a row object.
pub fn column(row: Value, name: &str) -> Result<Value> {
    match row {
        Value::Object(mut map) => map
            .remove(name)
            .ok_or_else(|| Neo4jGatewayError::decode(format!("column \"{}\" not in result", name))),
        other => Err(Neo4jGatewayError::decode(format!(
            "expected a row object, got {}",
            other
        ))),
    }
}

/// Split a Cypher script into statements on `;`, dropping blank ones.
pub fn split_script(script: &str) -> Vec<String> {
    script
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
