//! Named schemas for inbound records.
//!
//! A schema is a table entry: its name plus one rule per required field.
//! Adding a schema means adding an entry to [`SCHEMAS`].

/// Target type a field must be coercible to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any JSON scalar, kept as a string.
    Text,
    /// A JSON number, boolean or numeric string, read as `f64`.
    Float,
}

impl FieldKind {
    pub fn describe(&self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::Float => "float",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn rule(name: &'static str, kind: FieldKind) -> FieldRule {
    FieldRule { name, kind }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [FieldRule],
}

impl Schema {
    pub fn rule(&self, field: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|rule| rule.name == field)
    }
}

pub const PREDICT: &str = "predict";

const PREDICT_FIELDS: &[FieldRule] = &[
    rule("id", FieldKind::Text),
    rule("x_1", FieldKind::Float),
    rule("x_2", FieldKind::Float),
    rule("x_3", FieldKind::Float),
    rule("x_4", FieldKind::Float),
];

/// Every known schema.
pub static SCHEMAS: &[Schema] = &[Schema {
    name: PREDICT,
    fields: PREDICT_FIELDS,
}];

/// Find a schema by name.
pub fn lookup(name: &str) -> Option<&'static Schema> {
    SCHEMAS.iter().find(|schema| schema.name == name)
}
