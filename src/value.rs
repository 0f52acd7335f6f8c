// used for validating lexical forms
use regex::Regex;
use lazy_static::lazy_static;

// used for validating dates and timestamps
use chrono::{NaiveDate, NaiveDateTime};

// used when reporting argument snapshots
use serde::Serialize;

// used to print out readable forms of a value
use std::fmt;

use crate::error::{Result, RulebindError};

pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

lazy_static! {
    static ref INTEGER: Regex = Regex::new(r"^[+-]?[0-9]+$").unwrap();
    static ref DECIMAL: Regex = Regex::new(r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)$").unwrap();
    static ref BOOLEAN: Regex = Regex::new(r"^(true|false|1|0)$").unwrap();
    // the calendar part is handed to chrono, the timezone is optional
    static ref DATE: Regex =
        Regex::new(r"^([0-9]{4}-[0-9]{2}-[0-9]{2})(Z|[+-](0[0-9]|1[0-4]):[0-5][0-9])?$").unwrap();
    static ref DATE_TIME: Regex = Regex::new(
        r"^([0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]+)?)(Z|[+-](0[0-9]|1[0-4]):[0-5][0-9])?$"
    )
    .unwrap();
}

// ------------- Kind -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum VariableKind {
    Entity,
    Scalar,
}
impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Entity => write!(f, "entity"),
            Self::Scalar => write!(f, "scalar"),
        }
    }
}

// ------------- Entity -------------
// An entity is opaque, only its identifier can be talked about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Entity {
    id: String,
}
impl Entity {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
    pub fn id(&self) -> &str {
        &self.id
    }
}
impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{}>", self.id)
    }
}

// ------------- Scalar -------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ScalarType {
    String,
    Integer,
    Decimal,
    Boolean,
    Date,
    DateTime,
    Other(String),
}
impl ScalarType {
    pub fn from_iri(iri: &str) -> Self {
        match iri.strip_prefix(XSD) {
            Some("string") => Self::String,
            Some("integer") => Self::Integer,
            Some("decimal") => Self::Decimal,
            Some("boolean") => Self::Boolean,
            Some("date") => Self::Date,
            Some("dateTime") => Self::DateTime,
            _ => Self::Other(iri.to_owned()),
        }
    }
    pub fn iri(&self) -> String {
        match self {
            Self::Other(iri) => iri.clone(),
            _ => format!("{}{}", XSD, self.local_name()),
        }
    }
    fn local_name(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "dateTime",
            Self::Other(iri) => iri.as_str(),
        }
    }
    fn accepts(&self, lexical: &str) -> bool {
        match self {
            Self::String | Self::Other(_) => true,
            Self::Integer => INTEGER.is_match(lexical),
            Self::Decimal => DECIMAL.is_match(lexical),
            Self::Boolean => BOOLEAN.is_match(lexical),
            Self::Date => DATE
                .captures(lexical)
                .is_some_and(|c| NaiveDate::parse_from_str(&c[1], "%Y-%m-%d").is_ok()),
            Self::DateTime => DATE_TIME
                .captures(lexical)
                .is_some_and(|c| c[1].parse::<NaiveDateTime>().is_ok()),
        }
    }
}
impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Other(iri) => write!(f, "<{}>", iri),
            _ => write!(f, "xsd:{}", self.local_name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Scalar {
    lexical: String,
    data_type: ScalarType,
}
impl Scalar {
    pub fn new(lexical: impl Into<String>, data_type: ScalarType) -> Result<Self> {
        let lexical = lexical.into();
        if !data_type.accepts(&lexical) {
            return Err(RulebindError::InvalidLiteral(format!(
                "\"{}\" is not a valid {}",
                lexical, data_type
            )));
        }
        Ok(Self { lexical, data_type })
    }
    pub fn string(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            data_type: ScalarType::String,
        }
    }
    pub fn integer(value: i64) -> Self {
        Self {
            lexical: value.to_string(),
            data_type: ScalarType::Integer,
        }
    }
    pub fn lexical(&self) -> &str {
        &self.lexical
    }
    pub fn data_type(&self) -> &ScalarType {
        &self.data_type
    }
    pub fn as_i64(&self) -> Option<i64> {
        match self.data_type {
            ScalarType::Integer => self.lexical.trim_start_matches('+').parse().ok(),
            _ => None,
        }
    }
}
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"{}\"^^{}", self.lexical, self.data_type)
    }
}

// ------------- Value -------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Value {
    Entity(Entity),
    Scalar(Scalar),
}
impl Value {
    pub fn entity(id: impl Into<String>) -> Self {
        Self::Entity(Entity::new(id))
    }
    pub fn string(lexical: impl Into<String>) -> Self {
        Self::Scalar(Scalar::string(lexical))
    }
    pub fn integer(value: i64) -> Self {
        Self::Scalar(Scalar::integer(value))
    }
    pub fn kind(&self) -> VariableKind {
        match self {
            Self::Entity(_) => VariableKind::Entity,
            Self::Scalar(_) => VariableKind::Scalar,
        }
    }
    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Self::Entity(entity) => Some(entity),
            Self::Scalar(_) => None,
        }
    }
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            Self::Entity(_) => None,
        }
    }
}
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Entity(entity) => write!(f, "{}", entity),
            Self::Scalar(scalar) => write!(f, "{}", scalar),
        }
    }
}
impl From<Entity> for Value {
    fn from(entity: Entity) -> Self {
        Self::Entity(entity)
    }
}
impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Self::Scalar(scalar)
    }
}
