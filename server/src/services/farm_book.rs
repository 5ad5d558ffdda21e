//! The farm book: the four entity stores plus weather, and the operations
//! that span more than one of them.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use farmdesk_engine::{
    entities::{
        from_records, Crop, Entity, Farm, Task, Transaction, TransactionFilter, TransactionSummary,
    },
    record::{check_id, into_fields},
    Collection, Envelope, Error, Fields, IdStrategy, Query, Record, RecordId, SeedData,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::latency::{Latency, Op};
use super::record_store::{finish, RecordStore};
use super::weather::{self, FixtureWeather, WeatherAdvice, WeatherProvider};
use crate::config::Config;
use crate::error::AppError;

/// How many transactions `recent` returns when not told otherwise.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Counts reported by a cascading farm delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeReport {
    pub farm_id: RecordId,
    pub crops_deleted: usize,
    pub tasks_deleted: usize,
    pub transactions_detached: usize,
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_farms: usize,
    pub active_crops: usize,
    pub pending_tasks: usize,
    pub tasks_due_today: usize,
    pub monthly_income: Decimal,
    pub monthly_expenses: Decimal,
}

impl DashboardStats {
    pub fn compute(
        farms: &[Farm],
        crops: &[Crop],
        tasks: &[Task],
        transactions: &[Transaction],
        today: NaiveDate,
    ) -> Self {
        let month = TransactionSummary::for_month(transactions, today.year(), today.month());
        Self {
            total_farms: farms.len(),
            active_crops: crops.iter().filter(|c| c.is_active()).count(),
            pending_tasks: tasks.iter().filter(|t| t.is_pending()).count(),
            tasks_due_today: tasks
                .iter()
                .filter(|t| t.is_pending() && t.is_due_on(today))
                .count(),
            monthly_income: month.total_income,
            monthly_expenses: month.total_expenses,
        }
    }
}

/// A farm with the counts shown on its card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmOverview {
    pub farm: Farm,
    pub active_crops: usize,
    pub pending_tasks: usize,
}

/// Entities with a store in the farm book.
pub trait Stored: Entity {
    fn store(book: &FarmBook) -> &RecordStore<Self>;
}

impl Stored for Farm {
    fn store(book: &FarmBook) -> &RecordStore<Self> {
        &book.farms
    }
}

impl Stored for Crop {
    fn store(book: &FarmBook) -> &RecordStore<Self> {
        &book.crops
    }
}

impl Stored for Task {
    fn store(book: &FarmBook) -> &RecordStore<Self> {
        &book.tasks
    }
}

impl Stored for Transaction {
    fn store(book: &FarmBook) -> &RecordStore<Self> {
        &book.transactions
    }
}

/// All farm data of one process.
pub struct FarmBook {
    pub farms: RecordStore<Farm>,
    pub crops: RecordStore<Crop>,
    pub tasks: RecordStore<Task>,
    pub transactions: RecordStore<Transaction>,
    pub weather: Arc<dyn WeatherProvider>,
    latency: Latency,
}

impl FarmBook {
    /// Empty stores.
    pub fn new(strategy: IdStrategy, latency: Latency, weather: Arc<dyn WeatherProvider>) -> Self {
        Self {
            farms: RecordStore::new(strategy, latency),
            crops: RecordStore::new(strategy, latency),
            tasks: RecordStore::new(strategy, latency),
            transactions: RecordStore::new(strategy, latency),
            weather,
            latency,
        }
    }

    /// Stores preloaded from seed data.
    pub fn seeded(
        seed: &SeedData,
        strategy: IdStrategy,
        latency: Latency,
        weather: Arc<dyn WeatherProvider>,
    ) -> Result<Self, Error> {
        Ok(Self {
            farms: RecordStore::from_collection(load::<Farm>(seed, strategy)?, latency),
            crops: RecordStore::from_collection(load::<Crop>(seed, strategy)?, latency),
            tasks: RecordStore::from_collection(load::<Task>(seed, strategy)?, latency),
            transactions: RecordStore::from_collection(load::<Transaction>(seed, strategy)?, latency),
            weather,
            latency,
        })
    }

    /// Build the book described by `config`: optional seed file and
    /// weather fixture, Id strategy and latency.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let latency = Latency::from_flag(config.simulate_latency);

        let weather: Arc<dyn WeatherProvider> = match &config.weather_fixture {
            Some(path) => Arc::new(FixtureWeather::from_file(path, latency)?),
            None => Arc::new(FixtureWeather::bundled(latency)?),
        };

        match &config.seed_path {
            Some(path) => {
                let seed = SeedData::from_json(&std::fs::read_to_string(path)?)?;
                tracing::info!(
                    "Seeding {} records from {}",
                    seed.record_count(),
                    path.display()
                );
                Ok(Self::seeded(&seed, config.id_strategy, latency, weather)?)
            }
            None => Ok(Self::new(config.id_strategy, latency, weather)),
        }
    }

    /// Delete a farm with its crops and tasks. Its transactions are kept and
    /// detached. Nothing changes when the farm does not exist.
    pub async fn delete_farm_cascade(&self, farm_id: i64) -> Envelope<CascadeReport> {
        self.latency.wait(Op::Delete).await;
        let result = match check_id(farm_id) {
            Ok(id) => self.cascade(id).await,
            Err(e) => Err(e),
        };
        finish(Farm::COLLECTION, Op::Delete, Some(farm_id), result)
    }

    async fn cascade(&self, farm_id: RecordId) -> Result<CascadeReport, Error> {
        // Lock order: farms, crops, tasks, transactions.
        let mut farms = self.farms.lock().await;
        let mut crops = self.crops.lock().await;
        let mut tasks = self.tasks.lock().await;
        let mut transactions = self.transactions.lock().await;

        farms.get(farm_id)?;

        let owned = |record: &Record| record.reference("farmId") == Some(farm_id);
        let detach = into_fields(json!({ "farmId": null }))?;
        let transactions_detached = transactions.merge_where(owned, &detach)?;
        let crops_deleted = crops.remove_where(owned);
        let tasks_deleted = tasks.remove_where(owned);
        farms.delete(farm_id)?;

        tracing::info!(
            farm_id,
            crops_deleted,
            tasks_deleted,
            transactions_detached,
            "farm deleted with cascade"
        );

        Ok(CascadeReport {
            farm_id,
            crops_deleted,
            tasks_deleted,
            transactions_detached,
        })
    }

    /// Flip a task between pending and completed.
    pub async fn toggle_task(&self, id: i64) -> Envelope<Task> {
        self.tasks
            .update_with(id, |task| {
                let mut fields = Fields::new();
                fields.insert("status".into(), json!(task.status.toggled().as_str()));
                fields
            })
            .await
    }

    /// Transactions dated within one calendar month.
    pub async fn transactions_by_month(&self, year: i32, month: u32) -> Envelope<Vec<Transaction>> {
        match TransactionFilter::month(year, month) {
            Some(filter) => self.transactions.find_as(Op::Month, &filter.to_query()).await,
            None => finish(
                Transaction::COLLECTION,
                Op::Month,
                None,
                Err(Error::InvalidMonth { year, month }),
            ),
        }
    }

    /// The most recent transactions, newest date first.
    pub async fn recent_transactions(&self, limit: Option<usize>) -> Envelope<Vec<Transaction>> {
        let query = Query::new()
            .sort_desc("date")
            .limit(limit.unwrap_or(DEFAULT_RECENT_LIMIT));
        self.transactions.find_as(Op::Recent, &query).await
    }

    /// Totals over the transactions matching `filter`.
    pub async fn transaction_summary(
        &self,
        filter: &TransactionFilter,
    ) -> Envelope<TransactionSummary> {
        self.transactions
            .find(&filter.to_query())
            .await
            .map(|matching| TransactionSummary::from_transactions(&matching))
    }

    /// Dashboard numbers, fetching the four collections concurrently.
    pub async fn dashboard(&self, today: NaiveDate) -> Envelope<DashboardStats> {
        let (farms, crops, tasks, transactions) = futures::join!(
            self.farms.list(),
            self.crops.list(),
            self.tasks.list(),
            self.transactions.list(),
        );

        let stats = (|| -> Result<DashboardStats, Envelope<DashboardStats>> {
            Ok(DashboardStats::compute(
                &farms.into_data::<DashboardStats>()?,
                &crops.into_data::<DashboardStats>()?,
                &tasks.into_data::<DashboardStats>()?,
                &transactions.into_data::<DashboardStats>()?,
                today,
            ))
        })();
        stats.map_or_else(|failed| failed, Envelope::ok)
    }

    /// A farm with its active crop and pending task counts.
    pub async fn farm_overview(&self, farm_id: i64) -> Envelope<FarmOverview> {
        let (farm, crops, tasks) = futures::join!(
            self.farms.get_by_id(farm_id),
            self.crops.get_by_owner(farm_id),
            self.tasks.get_by_owner(farm_id),
        );

        let overview = (|| -> Result<FarmOverview, Envelope<FarmOverview>> {
            Ok(FarmOverview {
                farm: farm.into_data::<FarmOverview>()?,
                active_crops: crops
                    .into_data::<FarmOverview>()?
                    .iter()
                    .filter(|c| c.is_active())
                    .count(),
                pending_tasks: tasks
                    .into_data::<FarmOverview>()?
                    .iter()
                    .filter(|t| t.is_pending())
                    .count(),
            })
        })();
        overview.map_or_else(|failed| failed, Envelope::ok)
    }

    pub async fn weather_advice(&self) -> Envelope<WeatherAdvice> {
        weather::advice(self.weather.as_ref()).await
    }

    /// Everything currently stored, in seed format.
    pub async fn snapshot(&self) -> SeedData {
        let farms = self.farms.lock().await;
        let crops = self.crops.lock().await;
        let tasks = self.tasks.lock().await;
        let transactions = self.transactions.lock().await;
        SeedData::capture(&farms, &crops, &tasks, &transactions)
    }
}

fn load<T: Entity>(seed: &SeedData, strategy: IdStrategy) -> Result<Collection, Error> {
    let mut collection = Collection::with_strategy(T::schema(), strategy);
    seed.load_into(&mut collection)?;
    from_records::<T, _>(collection.records())
        .map_err(|e| Error::InvalidSeed(e.to_string()))?;
    Ok(collection)
}
