//! wttr.in `format=j1` document. Only the fields the gateway reshapes are modelled;
//! everything is optional and unknown fields are ignored.
//!
//! Leaves are kept as raw JSON: wttr.in sends strings, but a number or bool
//! in their place is passed through rather than failing the whole document.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
pub struct UpstreamWeatherDocument {
    #[serde(default)]
    pub current_condition: Option<Vec<CurrentCondition>>,
    #[serde(default)]
    pub weather: Option<Vec<WeatherDay>>,
}

impl UpstreamWeatherDocument {
    pub fn current(&self) -> Option<&CurrentCondition> {
        self.current_condition.as_ref()?.first()
    }

    pub fn today(&self) -> Option<&WeatherDay> {
        self.weather.as_ref()?.first()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CurrentCondition {
    #[serde(rename = "temp_C")]
    pub temp_c: Option<Value>,
    #[serde(rename = "temp_F")]
    pub temp_f: Option<Value>,
    #[serde(rename = "FeelsLikeC")]
    pub feels_like_c: Option<Value>,
    #[serde(rename = "FeelsLikeF")]
    pub feels_like_f: Option<Value>,
    pub humidity: Option<Value>,
    pub pressure: Option<Value>,
    pub visibility: Option<Value>,
    #[serde(rename = "uvIndex")]
    pub uv_index: Option<Value>,
    #[serde(rename = "windspeedKmph")]
    pub windspeed_kmph: Option<Value>,
    #[serde(rename = "windspeedMiles")]
    pub windspeed_miles: Option<Value>,
    #[serde(rename = "winddir16Point")]
    pub winddir_16_point: Option<Value>,
    #[serde(rename = "weatherDesc")]
    pub weather_desc: Option<Vec<TextValue>>,
    pub cloudcover: Option<Value>,
}

impl CurrentCondition {
    pub fn description(&self) -> Option<&Value> {
        self.weather_desc.as_ref()?.first()?.value.as_ref()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TextValue {
    pub value: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WeatherDay {
    #[serde(rename = "maxtempC")]
    pub max_temp_c: Option<Value>,
    #[serde(rename = "maxtempF")]
    pub max_temp_f: Option<Value>,
    #[serde(rename = "mintempC")]
    pub min_temp_c: Option<Value>,
    #[serde(rename = "mintempF")]
    pub min_temp_f: Option<Value>,
    #[serde(rename = "avgtempC")]
    pub avg_temp_c: Option<Value>,
    #[serde(rename = "avgtempF")]
    pub avg_temp_f: Option<Value>,
    #[serde(rename = "totalSnow_cm")]
    pub total_snow_cm: Option<Value>,
    #[serde(rename = "sunHour")]
    pub sun_hour: Option<Value>,
    #[serde(rename = "uvIndex")]
    pub uv_index: Option<Value>,
    pub astronomy: Option<Vec<Astronomy>>,
}

impl WeatherDay {
    pub fn astronomy(&self) -> Option<&Astronomy> {
        self.astronomy.as_ref()?.first()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Astronomy {
    pub sunrise: Option<Value>,
    pub sunset: Option<Value>,
    pub moonrise: Option<Value>,
    pub moonset: Option<Value>,
    pub moon_phase: Option<Value>,
    pub moon_illumination: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_sparse_document() {
        let doc: UpstreamWeatherDocument = serde_json::from_str(
            r#"{"current_condition":[{"temp_C":"20","weatherDesc":[{"value":"Sunny"}]}],
                "weather":[{"maxtempC":"25"}],
                "nearest_area":[{"areaName":[{"value":"x"}]}]}"#,
        )
        .unwrap();
        let current = doc.current().unwrap();
        assert_eq!(current.temp_c, Some(json!("20")));
        assert_eq!(current.description(), Some(&json!("Sunny")));
        assert!(current.humidity.is_none());
        let today = doc.today().unwrap();
        assert_eq!(today.max_temp_c, Some(json!("25")));
        assert!(today.astronomy().is_none());
    }

    #[test]
    fn non_string_leaves_are_kept() {
        let doc: UpstreamWeatherDocument = serde_json::from_str(
            r#"{"current_condition":[{"uvIndex":3,"temp_C":-1.5}],"weather":[{"sunHour":true}]}"#,
        )
        .unwrap();
        assert_eq!(doc.current().unwrap().uv_index, Some(json!(3)));
        assert_eq!(doc.current().unwrap().temp_c, Some(json!(-1.5)));
        assert_eq!(doc.today().unwrap().sun_hour, Some(json!(true)));
    }

    #[test]
    fn empty_arrays_have_no_first_entry() {
        let doc: UpstreamWeatherDocument =
            serde_json::from_str(r#"{"current_condition":[],"weather":[]}"#).unwrap();
        assert!(doc.current().is_none());
        assert!(doc.today().is_none());
    }

    #[test]
    fn explicit_nulls_are_absent() {
        let doc: UpstreamWeatherDocument =
            serde_json::from_str(r#"{"current_condition":null,"weather":[{"astronomy":null}]}"#)
                .unwrap();
        assert!(doc.current().is_none());
        assert!(doc.today().unwrap().astronomy().is_none());
    }
}
