use serde::Serialize;
use serde_json::Value;

use super::wttr::{Astronomy, UpstreamWeatherDocument};

/// Reshaped `get_weather` result. Absent upstream fields are omitted when serialized.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WeatherReport {
    pub location: String,
    pub current: CurrentReport,
    pub today: TodayReport,
    pub astronomy: AstronomyReport,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct CurrentReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_f: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feels_like_c: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feels_like_f: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uv_index: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_speed_kmh: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_speed_mph: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_direction: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_description: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_cover: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct TodayReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_temp_c: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_temp_f: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_temp_c: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_temp_f: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_temp_c: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_temp_f: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_snow_cm: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sun_hour: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uv_index: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct AstronomyReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunset: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moonrise: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moonset: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moon_phase: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moon_illumination: Option<Value>,
}

impl From<Option<&Astronomy>> for AstronomyReport {
    fn from(a: Option<&Astronomy>) -> Self {
        let Some(a) = a else {
            return Self::default();
        };
        Self {
            sunrise: a.sunrise.clone(),
            sunset: a.sunset.clone(),
            moonrise: a.moonrise.clone(),
            moonset: a.moonset.clone(),
            moon_phase: a.moon_phase.clone(),
            moon_illumination: a.moon_illumination.clone(),
        }
    }
}

impl WeatherReport {
    /// `None` when the document lacks `current_condition[0]` or `weather[0]`.
    pub fn from_document(location: &str, doc: &UpstreamWeatherDocument) -> Option<Self> {
        let c = doc.current()?;
        let t = doc.today()?;
        Some(Self {
            location: location.to_owned(),
            current: CurrentReport {
                temperature_c: c.temp_c.clone(),
                temperature_f: c.temp_f.clone(),
                feels_like_c: c.feels_like_c.clone(),
                feels_like_f: c.feels_like_f.clone(),
                humidity: c.humidity.clone(),
                pressure: c.pressure.clone(),
                visibility: c.visibility.clone(),
                uv_index: c.uv_index.clone(),
                wind_speed_kmh: c.windspeed_kmph.clone(),
                wind_speed_mph: c.windspeed_miles.clone(),
                wind_direction: c.winddir_16_point.clone(),
                weather_description: c.description().cloned(),
                cloud_cover: c.cloudcover.clone(),
            },
            today: TodayReport {
                max_temp_c: t.max_temp_c.clone(),
                max_temp_f: t.max_temp_f.clone(),
                min_temp_c: t.min_temp_c.clone(),
                min_temp_f: t.min_temp_f.clone(),
                avg_temp_c: t.avg_temp_c.clone(),
                avg_temp_f: t.avg_temp_f.clone(),
                total_snow_cm: t.total_snow_cm.clone(),
                sun_hour: t.sun_hour.clone(),
                uv_index: t.uv_index.clone(),
            },
            astronomy: t.astronomy().into(),
        })
    }

    /// Human-readable summary: current conditions, today's forecast, astronomy.
    pub fn summary(&self) -> String {
        let c = &self.current;
        let t = &self.today;
        let a = &self.astronomy;
        format!(
            "Weather for {}:\n\n\
             Current Conditions:\n\
             • Temperature: {}°C ({}°F)\n\
             • Feels like: {}°C ({}°F)\n\
             • Condition: {}\n\
             • Humidity: {}%\n\
             • Wind: {} km/h {}\n\
             • Pressure: {} mb\n\
             • Visibility: {} km\n\
             • UV Index: {}\n\
             • Cloud Cover: {}%\n\n\
             Today's Forecast:\n\
             • High: {}°C ({}°F)\n\
             • Low: {}°C ({}°F)\n\
             • UV Index: {}\n\
             • Sun Hours: {}\n\n\
             Astronomy:\n\
             • Sunrise: {}\n\
             • Sunset: {}\n\
             • Moon Phase: {}\n\
             • Moon Illumination: {}%",
            self.location,
            show(&c.temperature_c),
            show(&c.temperature_f),
            show(&c.feels_like_c),
            show(&c.feels_like_f),
            show(&c.weather_description),
            show(&c.humidity),
            show(&c.wind_speed_kmh),
            show(&c.wind_direction),
            show(&c.pressure),
            show(&c.visibility),
            show(&c.uv_index),
            show(&c.cloud_cover),
            show(&t.max_temp_c),
            show(&t.max_temp_f),
            show(&t.min_temp_c),
            show(&t.min_temp_f),
            show(&t.uv_index),
            show(&t.sun_hour),
            show(&a.sunrise),
            show(&a.sunset),
            show(&a.moon_phase),
            show(&a.moon_illumination),
        )
    }
}

/// Missing values keep the `undefined` placeholder clients already parse.
fn show(v: &Option<Value>) -> String {
    match v {
        None => "undefined".to_owned(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> UpstreamWeatherDocument {
        serde_json::from_str(
            r#"{
              "current_condition":[{"temp_C":"20","temp_F":"68","humidity":"50","FeelsLikeC":"19",
                "FeelsLikeF":"66","pressure":"1012","visibility":"10","uvIndex":"4",
                "windspeedKmph":"11","windspeedMiles":"7","winddir16Point":"NW",
                "weatherDesc":[{"value":"Partly cloudy"}],"cloudcover":"25"}],
              "weather":[{"maxtempC":"25","maxtempF":"77","mintempC":"15","mintempF":"59",
                "avgtempC":"20","avgtempF":"68","totalSnow_cm":"0.0","sunHour":"11.5","uvIndex":"5",
                "astronomy":[{"sunrise":"06:00","sunset":"20:00",
                  "moonrise":"21:10","moonset":"07:40",
                  "moon_phase":"Waxing Gibbous","moon_illumination":"78"}]}]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn reshapes_current_today_and_astronomy() {
        let r = WeatherReport::from_document("London", &sample()).unwrap();
        assert_eq!(r.current.temperature_c, Some(json!("20")));
        assert_eq!(r.current.weather_description, Some(json!("Partly cloudy")));
        assert_eq!(r.today.max_temp_c, Some(json!("25")));
        assert_eq!(r.astronomy.sunrise, Some(json!("06:00")));

        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["location"], "London");
        assert_eq!(v["current"]["wind_speed_kmh"], "11");
        assert_eq!(v["today"]["total_snow_cm"], "0.0");
        assert_eq!(v["astronomy"]["moon_phase"], "Waxing Gibbous");
    }

    #[test]
    fn missing_sections_yield_none() {
        let doc: UpstreamWeatherDocument = serde_json::from_str(r#"{"weather":[{}]}"#).unwrap();
        assert!(WeatherReport::from_document("x", &doc).is_none());
        let doc: UpstreamWeatherDocument =
            serde_json::from_str(r#"{"current_condition":[{}]}"#).unwrap();
        assert!(WeatherReport::from_document("x", &doc).is_none());
    }

    #[test]
    fn missing_astronomy_is_lenient() {
        let doc: UpstreamWeatherDocument = serde_json::from_str(
            r#"{"current_condition":[{"temp_C":"1"}],"weather":[{"maxtempC":"2"}]}"#,
        )
        .unwrap();
        let r = WeatherReport::from_document("Oslo", &doc).unwrap();
        assert_eq!(r.astronomy, AstronomyReport::default());
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["astronomy"], json!({}));
        assert!(r.summary().contains("• Sunrise: undefined"));
    }

    #[test]
    fn summary_lists_every_section() {
        let text = WeatherReport::from_document("London", &sample()).unwrap().summary();
        assert!(text.starts_with("Weather for London:\n\nCurrent Conditions:\n"));
        assert!(text.contains("• Temperature: 20°C (68°F)\n"));
        assert!(text.contains("• Wind: 11 km/h NW\n"));
        assert!(text.contains("Today's Forecast:\n• High: 25°C (77°F)\n• Low: 15°C (59°F)\n"));
        assert!(text.contains("• Sun Hours: 11.5\n\nAstronomy:\n"));
        assert!(text.ends_with("• Moon Illumination: 78%"));
    }

    #[test]
    fn numeric_leaves_pass_through() {
        let doc: UpstreamWeatherDocument = serde_json::from_str(
            r#"{"current_condition":[{"temp_C":20,"uvIndex":3}],"weather":[{"maxtempC":25.5}]}"#,
        )
        .unwrap();
        let r = WeatherReport::from_document("Lima", &doc).unwrap();
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["current"]["uv_index"], 3);
        assert_eq!(v["today"]["max_temp_c"], 25.5);
        let text = r.summary();
        assert!(text.contains("• Temperature: 20°C (undefined°F)\n"));
        assert!(text.contains("• High: 25.5°C"));
    }
}
