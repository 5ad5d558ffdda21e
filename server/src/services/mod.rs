//! Async services over the engine collections.

mod farm_book;
mod latency;
mod record_store;
mod weather;

pub use farm_book::*;
pub use latency::{Latency, Op};
pub use record_store::RecordStore;
pub use weather::{advice, FixtureWeather, WeatherAdvice, WeatherProvider};
