//! Read-only weather source.

use std::path::Path;

use farmdesk_engine::{
    weather::{farming_advice, ForecastDay, WeatherAlert, WeatherReport, WeatherSnapshot},
    Envelope,
};
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};

use super::latency::{Latency, Op};
use super::record_store::finish;
use crate::error::AppError;

const BUNDLED_FIXTURE: &str = include_str!("../../fixtures/weather.json");
const SOURCE: &str = "weather";

/// A source of weather data. Same envelope and latency as the record
/// stores, without a write path.
pub trait WeatherProvider: Send + Sync {
    fn current(&self) -> BoxFuture<'_, Envelope<WeatherSnapshot>>;

    /// The next `days` forecast entries.
    fn forecast(&self, days: usize) -> BoxFuture<'_, Envelope<Vec<ForecastDay>>>;

    fn alerts(&self) -> BoxFuture<'_, Envelope<Vec<WeatherAlert>>>;
}

/// Weather served from a fixed report.
#[derive(Debug, Clone)]
pub struct FixtureWeather {
    report: WeatherReport,
    latency: Latency,
}

impl FixtureWeather {
    pub fn new(report: WeatherReport, latency: Latency) -> Self {
        Self { report, latency }
    }

    /// The report shipped with the server.
    pub fn bundled(latency: Latency) -> Result<Self, AppError> {
        Self::from_json(BUNDLED_FIXTURE, latency)
    }

    pub fn from_json(json: &str, latency: Latency) -> Result<Self, AppError> {
        Ok(Self::new(WeatherReport::from_json(json)?, latency))
    }

    /// Load a report from a JSON file.
    pub fn from_file(path: &Path, latency: Latency) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path)?;
        tracing::info!("Loaded weather fixture from {}", path.display());
        Self::from_json(&json, latency)
    }

    pub fn report(&self) -> &WeatherReport {
        &self.report
    }
}

impl WeatherProvider for FixtureWeather {
    fn current(&self) -> BoxFuture<'_, Envelope<WeatherSnapshot>> {
        async move {
            self.latency.wait(Op::CurrentWeather).await;
            finish(SOURCE, Op::CurrentWeather, None, Ok(self.report.current.clone()))
        }
        .boxed()
    }

    fn forecast(&self, days: usize) -> BoxFuture<'_, Envelope<Vec<ForecastDay>>> {
        async move {
            self.latency.wait(Op::Forecast).await;
            finish(SOURCE, Op::Forecast, None, self.report.forecast(days))
        }
        .boxed()
    }

    fn alerts(&self) -> BoxFuture<'_, Envelope<Vec<WeatherAlert>>> {
        async move {
            self.latency.wait(Op::Alerts).await;
            finish(SOURCE, Op::Alerts, None, Ok(self.report.alerts.clone()))
        }
        .boxed()
    }
}

/// Current conditions with the field-work advice they call for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherAdvice {
    pub current: WeatherSnapshot,
    pub advice: Vec<String>,
}

/// Fetch current conditions and derive advice from them.
pub async fn advice(provider: &dyn WeatherProvider) -> Envelope<WeatherAdvice> {
    provider.current().await.map(|current| WeatherAdvice {
        advice: farming_advice(&current)
            .into_iter()
            .map(str::to_string)
            .collect(),
        current,
    })
}
