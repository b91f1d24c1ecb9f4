//! Declarative validation of JSON objects against a permissive schema.
//!
//! Schemas list the fields the tool cares about; unknown fields always
//! pass. Validation never aborts early, so callers can render every
//! problem at once.

use serde_json::Value;
use std::fmt;

/// Primitive shape a declared field must have.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Object,
    Array,
}

impl FieldType {
    fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Object => "object",
            FieldType::Array => "array",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::Object => value.is_object(),
            FieldType::Array => value.is_array(),
        }
    }
}

/// Extra constraint checked after the primitive type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// A number within [0, 100] inclusive.
    Percentage,
}

#[derive(Clone, Copy, Debug)]
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
    pub format: Option<Format>,
}

#[derive(Clone, Copy, Debug)]
pub struct Schema {
    pub fields: &'static [Field],
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaError {
    pub path: String,
    pub message: String,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Debug, Default)]
pub struct Validation {
    pub errors: Vec<SchemaError>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate `value` against `schema`, collecting every violation in
/// declaration order.
pub fn validate(value: &Value, schema: &Schema) -> Validation {
    let mut errors = Vec::new();
    let object = match value.as_object() {
        Some(object) => object,
        None => {
            errors.push(SchemaError {
                path: String::new(),
                message: "must be an object".to_string(),
            });
            return Validation { errors };
        }
    };

    for field in schema.fields {
        let path = format!("/{}", field.name);
        match object.get(field.name) {
            None => {
                if field.required {
                    errors.push(SchemaError {
                        path,
                        message: "is required".to_string(),
                    });
                }
            }
            Some(value) => {
                if !field.ty.matches(value) {
                    errors.push(SchemaError {
                        path,
                        message: format!("must be of type {}", field.ty.name()),
                    });
                } else if let Some(format) = field.format {
                    if let Some(message) = check_format(value, format) {
                        errors.push(SchemaError { path, message });
                    }
                }
            }
        }
    }

    Validation { errors }
}

fn check_format(value: &Value, format: Format) -> Option<String> {
    match format {
        Format::Percentage => {
            let number = value.as_f64()?;
            if (0.0..=100.0).contains(&number) {
                None
            } else {
                Some("must be between 0 and 100".to_string())
            }
        }
    }
}

const fn field(name: &'static str, ty: FieldType) -> Field {
    Field {
        name,
        ty,
        required: true,
        format: None,
    }
}

/// Shape of one token's metadata file.
pub static METADATA_SCHEMA: Schema = Schema {
    fields: &[
        field("title", FieldType::String),
        field("description", FieldType::String),
        field("attributes", FieldType::Array),
    ],
};

/// Shape of the launch configuration file.
pub static CONFIGURATION_SCHEMA: Schema = Schema {
    fields: &[
        field("walletAuthority", FieldType::String),
        field("collectionName", FieldType::String),
        field("symbol", FieldType::String),
        field("description", FieldType::String),
        field("size", FieldType::Number),
        field("costInNear", FieldType::Number),
        field("premintStartDate", FieldType::String),
        field("publicMintStartDate", FieldType::String),
        field("initialsPayout", FieldType::Object),
        field("royaltiesPayout", FieldType::Object),
        Field {
            name: "royaltiesPercent",
            ty: FieldType::Number,
            required: true,
            format: Some(Format::Percentage),
        },
        field("ipfsLink", FieldType::String),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_conforming_metadata_with_extra_fields() {
        let value = json!({
            "title": "Mars Rock #1",
            "description": "A rock",
            "attributes": [{"trait_type": "color", "value": "red"}],
            "media": "1.png",
        });
        assert!(validate(&value, &METADATA_SCHEMA).is_valid());
    }

    #[test]
    fn reports_missing_required_field() {
        let value = json!({ "title": "Mars Rock #1", "attributes": [] });
        let validation = validate(&value, &METADATA_SCHEMA);
        assert_eq!(validation.errors.len(), 1);
        assert_eq!(validation.errors[0].path, "/description");
        assert_eq!(validation.errors[0].message, "is required");
    }

    #[test]
    fn reports_wrong_primitive_type() {
        let value = json!({ "title": 7, "description": "x", "attributes": [] });
        let validation = validate(&value, &METADATA_SCHEMA);
        assert_eq!(validation.errors.len(), 1);
        assert_eq!(validation.errors[0].path, "/title");
        assert_eq!(validation.errors[0].message, "must be of type string");
    }

    #[test]
    fn collects_every_violation_at_once() {
        let validation = validate(&json!({}), &METADATA_SCHEMA);
        assert_eq!(validation.errors.len(), 3);
    }

    #[test]
    fn rejects_non_object_input() {
        let validation = validate(&json!([1, 2, 3]), &METADATA_SCHEMA);
        assert_eq!(validation.errors[0].message, "must be an object");
    }

    #[test]
    fn percentage_format_bounds_are_inclusive() {
        for (percent, valid) in [(0, true), (100, true), (101, false)] {
            let value = config_fixture(percent);
            assert_eq!(
                validate(&value, &CONFIGURATION_SCHEMA).is_valid(),
                valid,
                "royaltiesPercent = {}",
                percent
            );
        }
    }

    fn config_fixture(royalties_percent: i64) -> Value {
        json!({
            "walletAuthority": "minter.near",
            "collectionName": "Mars Rocks",
            "symbol": "ROCK",
            "description": "Rocks from Mars",
            "size": 3,
            "costInNear": 2.5,
            "premintStartDate": "2022-05-01T00:00:00Z",
            "publicMintStartDate": "2022-05-02T00:00:00Z",
            "initialsPayout": { "a.near": 100 },
            "royaltiesPayout": { "a.near": 100 },
            "royaltiesPercent": royalties_percent,
            "ipfsLink": "bafybeigdyrzt",
        })
    }
}
