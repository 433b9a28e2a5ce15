pub mod report;
pub mod wttr;

use thiserror::Error;

pub use report::WeatherReport;
pub use wttr::UpstreamWeatherDocument;

/// The only upstream format this gateway proxies.
pub const J1: &str = "j1";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Location parameter is required")]
    MissingLocation,
    #[error("Format parameter must be \"j1\"")]
    UnsupportedFormat,
}

/// A validated lookup: non-empty location, `j1` format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    location: String,
    format: String,
}

impl WeatherQuery {
    pub fn new(location: impl Into<String>, format: Option<&str>) -> Result<Self, QueryError> {
        let location = location.into();
        if location.is_empty() {
            return Err(QueryError::MissingLocation);
        }
        let format = format.unwrap_or(J1);
        if format != J1 {
            return Err(QueryError::UnsupportedFormat);
        }
        Ok(Self { location, format: format.to_owned() })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn format(&self) -> &str {
        &self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_defaults_to_j1() {
        let q = WeatherQuery::new("London", None).unwrap();
        assert_eq!(q.location(), "London");
        assert_eq!(q.format(), "j1");
    }

    #[test]
    fn rejects_empty_location() {
        assert_eq!(WeatherQuery::new("", Some("j1")), Err(QueryError::MissingLocation));
    }

    #[test]
    fn rejects_other_formats() {
        for f in ["j2", "J1", "", "3"] {
            assert_eq!(
                WeatherQuery::new("Paris", Some(f)),
                Err(QueryError::UnsupportedFormat),
                "format {f:?}"
            );
        }
    }

    #[test]
    fn location_is_checked_before_format() {
        assert_eq!(WeatherQuery::new("", Some("xml")), Err(QueryError::MissingLocation));
    }
}
