//! Weather snapshots, forecasts and alerts.
//!
//! Weather is read-only and externally sourced. This module only defines the
//! shapes and the advice rules derived from them.

use crate::{error::Result, Error};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Number of forecast days returned when the caller does not ask.
pub const DEFAULT_FORECAST_DAYS: usize = 5;

/// Current conditions at a location. Temperatures in °F, wind in mph,
/// humidity and precipitation chance in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub location: String,
    pub temperature: f64,
    pub condition: String,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_direction: String,
    #[serde(default)]
    pub precipitation: f64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub high: f64,
    pub low: f64,
    pub precipitation: f64,
    pub condition: String,
    pub humidity: f64,
    pub wind_speed: f64,
}

impl ForecastDay {
    pub fn mean_temperature(&self) -> f64 {
        (self.high + self.low) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Warning,
    Watch,
    Advisory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherAlert {
    pub title: String,
    pub severity: AlertSeverity,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Everything a weather source knows at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub current: WeatherSnapshot,
    pub forecast: Vec<ForecastDay>,
    #[serde(default)]
    pub alerts: Vec<WeatherAlert>,
}

impl WeatherReport {
    /// Parse a report from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidPayload(format!("weather report: {e}")))
    }

    /// The first `days` forecast entries. `days` must be between 1 and the
    /// number of days the report holds.
    pub fn forecast(&self, days: usize) -> Result<Vec<ForecastDay>> {
        if days == 0 || days > self.forecast.len() {
            return Err(Error::InvalidPayload(format!(
                "forecast days must be between 1 and {}, got {days}",
                self.forecast.len()
            )));
        }
        Ok(self.forecast[..days].to_vec())
    }
}

/// Aggregates shown next to a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastOutlook {
    pub average_temperature: f64,
    pub rainy_days: usize,
    pub average_wind_speed: f64,
}

impl ForecastOutlook {
    /// A day counts as rainy above 30% precipitation chance.
    pub fn from_days(days: &[ForecastDay]) -> Option<Self> {
        if days.is_empty() {
            return None;
        }
        let n = days.len() as f64;
        Some(Self {
            average_temperature: (days.iter().map(ForecastDay::mean_temperature).sum::<f64>() / n)
                .round(),
            rainy_days: days.iter().filter(|d| d.precipitation > 30.0).count(),
            average_wind_speed: (days.iter().map(|d| d.wind_speed).sum::<f64>() / n).round(),
        })
    }
}

/// Field-work advice for the current conditions.
pub fn farming_advice(weather: &WeatherSnapshot) -> Vec<&'static str> {
    let mut advice = Vec::new();

    if weather.precipitation > 70.0 {
        advice.push("Heavy rain expected - avoid irrigation and field work");
    } else if weather.precipitation < 10.0 && weather.temperature > 80.0 {
        advice.push("Hot and dry conditions - increase irrigation schedule");
    }

    if weather.wind_speed > 15.0 {
        advice.push("High winds - secure greenhouse structures and avoid spraying");
    }

    if weather.temperature < 40.0 {
        advice.push("Frost risk - protect sensitive plants");
    }

    if weather.humidity > 80.0 {
        advice.push("High humidity - monitor for fungal diseases");
    }

    advice
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn snapshot(temperature: f64, humidity: f64, wind_speed: f64, precipitation: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            location: "Green Valley".into(),
            temperature,
            condition: "Sunny".into(),
            humidity,
            wind_speed,
            wind_direction: "NW".into(),
            precipitation,
            updated_at: Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap(),
        }
    }

    fn day(offset: u32, high: f64, low: f64, precipitation: f64, wind_speed: f64) -> ForecastDay {
        ForecastDay {
            date: NaiveDate::from_ymd_opt(2024, 6, 1 + offset).unwrap(),
            day_of_week: "Mon".into(),
            high,
            low,
            precipitation,
            condition: "Cloudy".into(),
            humidity: 50.0,
            wind_speed,
        }
    }

    #[test]
    fn calm_day_has_no_advice() {
        assert!(farming_advice(&snapshot(70.0, 50.0, 5.0, 20.0)).is_empty());
    }

    #[test]
    fn hot_dry_and_windy() {
        let advice = farming_advice(&snapshot(92.0, 30.0, 20.0, 5.0));
        assert_eq!(advice.len(), 2);
        assert!(advice[0].starts_with("Hot and dry"));
        assert!(advice[1].starts_with("High winds"));
    }

    #[test]
    fn heavy_rain_takes_precedence() {
        let advice = farming_advice(&snapshot(95.0, 85.0, 0.0, 80.0));
        assert_eq!(
            advice,
            vec![
                "Heavy rain expected - avoid irrigation and field work",
                "High humidity - monitor for fungal diseases",
            ]
        );
    }

    #[test]
    fn frost_risk() {
        let advice = farming_advice(&snapshot(35.0, 40.0, 3.0, 20.0));
        assert_eq!(advice, vec!["Frost risk - protect sensitive plants"]);
    }

    #[test]
    fn forecast_bounds() {
        let report = WeatherReport {
            current: snapshot(70.0, 50.0, 5.0, 20.0),
            forecast: vec![day(0, 80.0, 60.0, 10.0, 5.0), day(1, 70.0, 50.0, 40.0, 9.0)],
            alerts: vec![],
        };
        assert_eq!(report.forecast(1).unwrap().len(), 1);
        assert_eq!(report.forecast(2).unwrap().len(), 2);
        assert!(matches!(report.forecast(0), Err(Error::InvalidPayload(_))));
        assert!(matches!(report.forecast(3), Err(Error::InvalidPayload(_))));
    }

    #[test]
    fn outlook() {
        let days = vec![day(0, 80.0, 60.0, 10.0, 5.0), day(1, 70.0, 50.0, 40.0, 9.0)];
        let outlook = ForecastOutlook::from_days(&days).unwrap();
        assert_eq!(outlook.average_temperature, 65.0);
        assert_eq!(outlook.rainy_days, 1);
        assert_eq!(outlook.average_wind_speed, 7.0);
        assert!(ForecastOutlook::from_days(&[]).is_none());
    }

    #[test]
    fn report_from_json() {
        let json = r#"{
            "current": {
                "location": "Green Valley",
                "temperature": 72,
                "condition": "Partly Cloudy",
                "humidity": 65,
                "windSpeed": 8,
                "windDirection": "SW",
                "precipitation": 20,
                "updatedAt": "2024-06-01T08:00:00Z"
            },
            "forecast": [],
            "alerts": [{
                "title": "Heat Advisory",
                "severity": "advisory",
                "description": "High temperatures expected",
                "startDate": "2024-06-02T12:00:00Z",
                "endDate": "2024-06-02T20:00:00Z"
            }]
        }"#;
        let report = WeatherReport::from_json(json).unwrap();
        assert_eq!(report.current.temperature, 72.0);
        assert_eq!(report.alerts[0].severity, AlertSeverity::Advisory);

        assert!(WeatherReport::from_json("{}").is_err());
    }
}
