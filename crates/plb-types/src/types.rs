use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag of a column.
///
/// `Any` and `DateTimeOffset` exist only in memory; the payload codec has no wire tag for
/// them (see [`Type::wire_tag`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    Any,
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    DateTime,
    DateTimeOffset,
    Decimal,
    Array,
    Table,
    Object,
}

impl Type {
    /// Stable lowercase name, also used when synthesizing column names.
    pub fn name(self) -> &'static str {
        match self {
            Type::Any => "any",
            Type::Boolean => "boolean",
            Type::Int32 => "int32",
            Type::Int64 => "int64",
            Type::Float32 => "float32",
            Type::Float64 => "float64",
            Type::String => "string",
            Type::DateTime => "datetime",
            Type::DateTimeOffset => "datetimeoffset",
            Type::Decimal => "decimal",
            Type::Array => "array",
            Type::Table => "table",
            Type::Object => "object",
        }
    }

    /// Fixed wire tag used by the payload type descriptor.
    ///
    /// | Tag | Type |
    /// |-----|------|
    /// | 0 | Boolean |
    /// | 1 | Int32 |
    /// | 2 | Int64 |
    /// | 3 | Float32 |
    /// | 4 | Float64 |
    /// | 5 | String |
    /// | 6 | DateTime |
    /// | 7 | Decimal |
    /// | 8 | Array |
    /// | 9 | Table |
    /// | 10 | Object |
    ///
    /// `DateTimeOffset` is carried as `DateTime` (epoch preserved, zone dropped).
    pub fn wire_tag(self) -> Option<u8> {
        match self {
            Type::Boolean => Some(0),
            Type::Int32 => Some(1),
            Type::Int64 => Some(2),
            Type::Float32 => Some(3),
            Type::Float64 => Some(4),
            Type::String => Some(5),
            Type::DateTime | Type::DateTimeOffset => Some(6),
            Type::Decimal => Some(7),
            Type::Array => Some(8),
            Type::Table => Some(9),
            Type::Object => Some(10),
            Type::Any => None,
        }
    }

    pub fn from_wire_tag(tag: u8) -> Option<Type> {
        match tag {
            0 => Some(Type::Boolean),
            1 => Some(Type::Int32),
            2 => Some(Type::Int64),
            3 => Some(Type::Float32),
            4 => Some(Type::Float64),
            5 => Some(Type::String),
            6 => Some(Type::DateTime),
            7 => Some(Type::Decimal),
            8 => Some(Type::Array),
            9 => Some(Type::Table),
            10 => Some(Type::Object),
            _ => None,
        }
    }

    pub fn is_composite(self) -> bool {
        matches!(self, Type::Array | Type::Table | Type::Object)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fully resolved column type: a scalar tag, an array of some element type, or a
/// table/object with a nested column schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedType {
    Any,
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    DateTime,
    DateTimeOffset,
    Decimal,
    Array(Box<ResolvedType>),
    Table(Schema),
    Object(Schema),
}

impl ResolvedType {
    pub fn array(element: ResolvedType) -> Self {
        ResolvedType::Array(Box::new(element))
    }

    pub fn tag(&self) -> Type {
        match self {
            ResolvedType::Any => Type::Any,
            ResolvedType::Boolean => Type::Boolean,
            ResolvedType::Int32 => Type::Int32,
            ResolvedType::Int64 => Type::Int64,
            ResolvedType::Float32 => Type::Float32,
            ResolvedType::Float64 => Type::Float64,
            ResolvedType::String => Type::String,
            ResolvedType::DateTime => Type::DateTime,
            ResolvedType::DateTimeOffset => Type::DateTimeOffset,
            ResolvedType::Decimal => Type::Decimal,
            ResolvedType::Array(_) => Type::Array,
            ResolvedType::Table(_) => Type::Table,
            ResolvedType::Object(_) => Type::Object,
        }
    }

    /// Build the resolved type for a scalar tag. Returns `None` for composite tags, which need
    /// an element type or a schema.
    pub fn scalar(ty: Type) -> Option<Self> {
        Some(match ty {
            Type::Any => ResolvedType::Any,
            Type::Boolean => ResolvedType::Boolean,
            Type::Int32 => ResolvedType::Int32,
            Type::Int64 => ResolvedType::Int64,
            Type::Float32 => ResolvedType::Float32,
            Type::Float64 => ResolvedType::Float64,
            Type::String => ResolvedType::String,
            Type::DateTime => ResolvedType::DateTime,
            Type::DateTimeOffset => ResolvedType::DateTimeOffset,
            Type::Decimal => ResolvedType::Decimal,
            Type::Array | Type::Table | Type::Object => return None,
        })
    }

    pub fn element_type(&self) -> Option<&ResolvedType> {
        match self {
            ResolvedType::Array(element) => Some(element),
            _ => None,
        }
    }

    pub fn schema(&self) -> Option<&Schema> {
        match self {
            ResolvedType::Table(schema) | ResolvedType::Object(schema) => Some(schema),
            _ => None,
        }
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedType::Array(element) => write!(f, "array<{element}>"),
            ResolvedType::Table(schema) => write!(f, "table({schema})"),
            ResolvedType::Object(schema) => write!(f, "object({schema})"),
            other => f.write_str(other.tag().name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ResolvedType,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: ResolvedType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Ordered list of named, typed columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of<N: Into<String>>(columns: impl IntoIterator<Item = (N, ResolvedType)>) -> Self {
        Self::new(
            columns
                .into_iter()
                .map(|(name, ty)| Column::new(name, ty))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, ordinal: usize) -> Option<&Column> {
        self.columns.get(ordinal)
    }

    /// Case-insensitive lookup by name; returns the ordinal of the first match.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn push(&mut self, column: Column) {
        self.columns.push(column);
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}

impl FromIterator<Column> for Schema {
    fn from_iter<T: IntoIterator<Item = Column>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", column.name, column.ty)?;
        }
        Ok(())
    }
}

/// Column name used when the wire format carries no name: `{type}_{ordinal}`.
pub fn synthesized_column_name(ty: &ResolvedType, ordinal: usize) -> String {
    format!("{}_{ordinal}", ty.tag().name())
}
