use async_trait::async_trait;
use serde_json::json;

use crate::clients::wttr::{UpstreamError, WttrClient};
use crate::core::content::{ContentItem, ToolOutput};
use crate::core::error::ToolError;
use crate::core::tool::{Tool, ToolSpec};
use crate::domain::{UpstreamWeatherDocument, WeatherQuery, WeatherReport};

pub const LOCATION_REQUIRED: &str = "Location parameter is required and must be a string";
/// Shared by unparseable bodies and documents missing `current_condition`/`weather`.
pub const UNPARSEABLE: &str = "Unable to parse weather data from wttr.in";

#[derive(Clone)]
pub struct GetWeatherTool {
    client: WttrClient,
}

impl GetWeatherTool {
    pub fn new(client: WttrClient) -> Self {
        Self { client }
    }
}

impl ToolSpec for GetWeatherTool {
    fn name(&self) -> &'static str {
        "get_weather"
    }
    fn description(&self) -> &'static str {
        "Get current weather information for a specific location using wttr.in service"
    }
    fn input_schema(&self) -> serde_json::Value {
        json!({
          "type": "object",
          "properties": {
            "location": {
              "type": "string",
              "description": "City or location to retrieve the weather for (e.g., \"London\", \"New York\", \"Tokyo\")"
            }
          },
          "required": ["location"]
        })
    }
}

fn upstream_failure(location: &str, e: UpstreamError) -> ToolError {
    match e {
        UpstreamError::NotFound => {
            ToolError::InvalidParams(format!("Location \"{location}\" not found"))
        }
        UpstreamError::Timeout => {
            ToolError::Internal("Weather service timeout - please try again".into())
        }
        other => ToolError::Internal(format!("Failed to retrieve weather data: {other}")),
    }
}

#[async_trait]
impl Tool for GetWeatherTool {
    async fn call(&self, arguments: &serde_json::Value) -> Result<serde_json::Value, ToolError> {
        if arguments.is_null() {
            return Err(ToolError::BadEnvelope("get_weather called without arguments".into()));
        }
        let Some(location) = arguments
            .get("location")
            .and_then(|v| v.as_str())
            .filter(|l| !l.is_empty())
        else {
            return Err(ToolError::InvalidParams(LOCATION_REQUIRED.into()));
        };
        let query = WeatherQuery::new(location, None)
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;

        let body = self
            .client
            .fetch(&query)
            .await
            .map_err(|e| upstream_failure(location, e))?;

        let doc: UpstreamWeatherDocument = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, body = %body, "JSON parse error");
            ToolError::Internal(UNPARSEABLE.into())
        })?;
        let report = WeatherReport::from_document(location, &doc).ok_or_else(|| {
            tracing::warn!(
                location = %location,
                "upstream document lacks current_condition or weather"
            );
            ToolError::Internal(UNPARSEABLE.into())
        })?;

        let structured = serde_json::to_string_pretty(&report)
            .map_err(|e| ToolError::Internal(e.to_string()))?;
        let out = ToolOutput::default()
            .push(ContentItem::text(report.summary()))
            .push(ContentItem::text(structured));
        serde_json::to_value(out).map_err(|e| ToolError::Internal(e.to_string()))
    }
}
