use serde::Deserialize;
use serde_json::Value;
use service_core::error::AppError;
use thiserror::Error;
use validator::Validate;

/// Raw body of `POST /api/gemini/generate`.
///
/// Fields are kept as untyped JSON so that missing and mistyped values are
/// reported as a malformed request instead of a generic JSON rejection.
/// Numbers may also arrive as numeric strings.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
    #[serde(default)]
    pub radius: Option<Value>,
    #[serde(default)]
    pub prompt: Option<Value>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedRequest {
    #[error("Missing required field '{0}'")]
    Missing(&'static str),

    #[error("Field '{field}' must be {expected}")]
    Invalid {
        field: &'static str,
        expected: &'static str,
    },
}

impl From<MalformedRequest> for AppError {
    fn from(err: MalformedRequest) -> Self {
        AppError::BadRequest(anyhow::Error::new(err))
    }
}

impl GenerateRequest {
    /// Coerce every field to its expected type.
    pub fn into_query(self) -> Result<LocationQuery, MalformedRequest> {
        Ok(LocationQuery {
            latitude: decimal_field("latitude", self.latitude)?,
            longitude: decimal_field("longitude", self.longitude)?,
            radius: integer_field("radius", self.radius)?,
            prompt: text_field("prompt", self.prompt)?,
        })
    }
}

fn decimal_field(field: &'static str, value: Option<Value>) -> Result<f64, MalformedRequest> {
    let value = value.ok_or(MalformedRequest::Missing(field))?;
    let parsed = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .ok_or(MalformedRequest::Invalid {
            field,
            expected: "a decimal number",
        })
}

fn integer_field(field: &'static str, value: Option<Value>) -> Result<i32, MalformedRequest> {
    let value = value.ok_or(MalformedRequest::Missing(field))?;
    let parsed = match &value {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    };

    parsed.ok_or(MalformedRequest::Invalid {
        field,
        expected: "an integer",
    })
}

fn text_field(field: &'static str, value: Option<Value>) -> Result<String, MalformedRequest> {
    match value.ok_or(MalformedRequest::Missing(field))? {
        Value::String(s) => Ok(s),
        _ => Err(MalformedRequest::Invalid {
            field,
            expected: "a string",
        }),
    }
}

/// A coerced generate request.
///
/// Coordinates are relayed as given. Map clients report longitudes outside
/// [-180, 180] once the view has been panned across the antimeridian.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct LocationQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// Search radius in meters.
    pub radius: i32,
    #[validate(length(min = 1, message = "Prompt must not be empty"))]
    pub prompt: String,
}

impl LocationQuery {
    /// The single sentence sent to the provider.
    pub fn compose_prompt(&self) -> String {
        format!(
            "Latitude: {}, Longitude: {}, Radius: {} meters. Question: {}",
            self.latitude, self.longitude, self.radius, self.prompt
        )
    }
}
