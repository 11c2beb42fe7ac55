//! The `HealthRecord` written to disk, and validation of model replies into it.
//!
//! The typed structs below only check that the reply has the expected shape.
//! What gets written is the model's own object, untouched apart from `date`.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::GenerationError;
use crate::generation::extract::{extract_json_object, ExtractError};

/// Validated output for one day: `date` first, then the model's other keys as sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HealthRecord(Map<String, Value>);

impl HealthRecord {
    pub fn date(&self) -> Option<&str> {
        self.0.get("date").and_then(Value::as_str)
    }

    pub fn health_tips(&self) -> &Value {
        static MISSING: Value = Value::Null;
        self.0.get("healthTips").unwrap_or(&MISSING)
    }
}

// Schema checks. Fields are deserialized to prove presence and type, never read.

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct HealthTips {
    sugar: SugarTip,
    calorie: CalorieTip,
    caffeine: CaffeineTip,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct SugarTip {
    #[serde(deserialize_with = "text_leaf")]
    daily_amount: String,
    #[serde(deserialize_with = "text_leaf")]
    note: String,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct CalorieTip {
    range: CalorieRange,
    #[serde(deserialize_with = "text_leaf")]
    tip: String,
}

/// Daily calorie needs by activity level.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct CalorieRange {
    #[serde(deserialize_with = "text_leaf")]
    light_activity: String,
    #[serde(deserialize_with = "text_leaf")]
    moderate_activity: String,
    #[serde(deserialize_with = "text_leaf")]
    heavy_activity: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct CaffeineTip {
    #[serde(deserialize_with = "text_leaf")]
    safe_amount: String,
    #[serde(deserialize_with = "text_leaf")]
    warning: String,
}

/// Leaves must be strings or bare numbers (`25` instead of `"25g"`).
fn text_leaf<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string, found {other}"
        ))),
    }
}

/// Extracts, parses and validates a raw model reply, stamping it with `canonical_date`.
pub fn parse_reply(raw: &str, canonical_date: &str) -> Result<HealthRecord, GenerationError> {
    let candidate = extract_json_object(raw).map_err(|e| match e {
        ExtractError::NoObject => GenerationError::MalformedReply(format!(
            "{e}: {:?}",
            raw.chars().take(120).collect::<String>()
        )),
        ExtractError::Unparseable(_) => GenerationError::MalformedReply(e.to_string()),
    })?;

    let Value::Object(fields) = serde_json::from_str::<Value>(candidate)
        .map_err(|e| GenerationError::MalformedReply(format!("reply JSON did not parse: {e}")))?
    else {
        return Err(GenerationError::MalformedReply(
            "reply JSON is not an object".to_string(),
        ));
    };

    let tips = fields.get("healthTips").ok_or_else(|| {
        GenerationError::MalformedReply(
            "reply JSON does not match the schema: missing field `healthTips`".to_string(),
        )
    })?;
    HealthTips::deserialize(tips).map_err(|e| {
        GenerationError::MalformedReply(format!("reply JSON does not match the schema: {e}"))
    })?;

    if let Some(model_date) = fields.get("date") {
        if model_date.as_str() != Some(canonical_date) {
            debug!(
                "Replacing model date {} with canonical date {}",
                model_date, canonical_date
            );
        }
    }

    let mut record = Map::new();
    record.insert("date".to_string(), Value::String(canonical_date.to_string()));
    record.extend(fields.into_iter().filter(|(key, _)| key != "date"));
    Ok(HealthRecord(record))
}
