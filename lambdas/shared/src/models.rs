//! Domain models for the Movies API
//!
//! - MovieItem: the record written to the table, parsed from a request body
//!   or built from the default literal
//! - MessageResponse: the JSON body returned to API Gateway

use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use serde_json::{Map, Value};
use std::io;
use uuid::Uuid;

use crate::errors::{Error, Result};

/// Year used when the request carries no payload
pub const DEFAULT_YEAR: i64 = 2012;
/// Title used when the request carries no payload
pub const DEFAULT_TITLE: &str = "The Amazing Spider-Man 2";
/// Message returned for every successful insert
pub const INSERTED_MESSAGE: &str = "Successfully inserted data!";

/// A movie record as stored in DynamoDB
///
/// `year` serializes to a DynamoDB number, `title` and `id` to strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieItem {
    pub year: i64,
    pub title: String,
    pub id: String,
}

impl MovieItem {
    pub fn new(year: i64, title: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            year,
            title: title.into(),
            id: id.into(),
        }
    }

    /// The default movie with a freshly generated id
    pub fn default_with_new_id() -> Self {
        Self::new(DEFAULT_YEAR, DEFAULT_TITLE, Uuid::new_v4().to_string())
    }

    /// Parse a request body into a movie
    ///
    /// The body must be a JSON object with `year`, `title` and `id`. `year`
    /// may be an integer or a string holding one; `title` and `id` may be any
    /// scalar and are stored in their string form.
    pub fn from_body(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body).map_err(|e| Error::Parse(e.to_string()))?;
        let object = value
            .as_object()
            .ok_or_else(|| Error::Parse("expected a JSON object".to_string()))?;

        let year = parse_year(required(object, "year")?)?;
        let title = coerce_string("title", required(object, "title")?)?;
        let id = coerce_string("id", required(object, "id")?)?;

        if id.is_empty() {
            return Err(Error::invalid("id", "must not be empty"));
        }

        Ok(Self { year, title, id })
    }
}

fn required<'a>(object: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value> {
    object
        .get(field)
        .filter(|value| !value.is_null())
        .ok_or(Error::MissingField(field))
}

fn parse_year(value: &Value) -> Result<i64> {
    match value {
        Value::Number(n) => {
            if let Some(year) = n.as_i64() {
                return Ok(year);
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
                _ => Err(Error::invalid("year", format!("{} is not an integer", n))),
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::invalid("year", format!("{:?} is not an integer", s))),
        _ => Err(Error::invalid("year", "expected a number")),
    }
}

fn coerce_string(field: &'static str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(Error::invalid(field, "expected a string")),
    }
}

/// JSON body returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn inserted() -> Self {
        Self::new(INSERTED_MESSAGE)
    }

    /// Response body text, e.g. `{"message": "Successfully inserted data!"}`
    pub fn to_body(&self) -> Result<String> {
        to_spaced_json(self)
    }
}

/// JSON with `", "` between members and `": "` after keys
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Serialize with the separators API clients of this endpoint already expect
pub fn to_spaced_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
