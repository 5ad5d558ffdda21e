//! Simulated backend latency.
//!
//! Every service call sleeps for a fixed, operation-dependent time before it
//! touches its data, like a remote backend would.

use std::time::Duration;

/// Operations with their own simulated latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    List,
    Get,
    Owner,
    Create,
    Update,
    Delete,
    Month,
    Recent,
    CurrentWeather,
    Forecast,
    Alerts,
}

impl Op {
    pub fn name(&self) -> &'static str {
        match self {
            Op::List => "list",
            Op::Get => "get",
            Op::Owner => "get_by_owner",
            Op::Create => "create",
            Op::Update => "update",
            Op::Delete => "delete",
            Op::Month => "by_month",
            Op::Recent => "recent",
            Op::CurrentWeather => "current",
            Op::Forecast => "forecast",
            Op::Alerts => "alerts",
        }
    }

    /// Default delay for this operation.
    pub fn default_delay(&self) -> Duration {
        let millis = match self {
            Op::List => 300,
            Op::Get => 200,
            Op::Owner => 250,
            Op::Create => 400,
            Op::Update => 350,
            Op::Delete => 300,
            Op::Month => 200,
            Op::Recent => 100,
            Op::CurrentWeather => 500,
            Op::Forecast => 600,
            Op::Alerts => 400,
        };
        Duration::from_millis(millis)
    }
}

/// Whether service calls sleep before running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    enabled: bool,
}

impl Latency {
    pub fn simulated() -> Self {
        Self { enabled: true }
    }

    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn from_flag(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn delay(&self, op: Op) -> Duration {
        if self.enabled {
            op.default_delay()
        } else {
            Duration::ZERO
        }
    }

    /// Sleep for the delay of `op`.
    pub async fn wait(&self, op: Op) {
        let delay = self.delay(op);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self::simulated()
    }
}
