use super::Entity;
use crate::{
    query::Query,
    schema::{FieldDef, FieldType},
    CollectionSchema, RecordId,
};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

const INCOME_CATEGORIES: &[(&str, &str)] = &[
    ("crop_sale", "Crop Sales"),
    ("livestock", "Livestock Sales"),
    ("government_subsidy", "Government Subsidy"),
    ("rental_income", "Rental Income"),
    ("other_income", "Other Income"),
];

const EXPENSE_CATEGORIES: &[(&str, &str)] = &[
    ("seeds", "Seeds"),
    ("fertilizer", "Fertilizer"),
    ("equipment", "Equipment"),
    ("fuel", "Fuel"),
    ("labor", "Labor"),
    ("maintenance", "Maintenance"),
    ("insurance", "Insurance"),
    ("utilities", "Utilities"),
    ("other_expense", "Other Expenses"),
];

impl TransactionType {
    pub const NAMES: [&'static str; 2] = ["income", "expense"];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// Known categories as `(value, label)` pairs. Categories are free-form;
    /// these are the ones with display labels.
    pub fn categories(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            TransactionType::Income => INCOME_CATEGORIES,
            TransactionType::Expense => EXPENSE_CATEGORIES,
        }
    }

    /// Display label for a category, falling back to the raw value.
    pub fn category_label<'a>(&self, category: &'a str) -> &'a str {
        self.categories()
            .iter()
            .find(|(value, _)| *value == category)
            .map_or(category, |(_, label)| *label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub farm_id: Option<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farm_id: Option<RecordId>,
}

impl Entity for Transaction {
    const COLLECTION: &'static str = "transactions";

    fn schema() -> CollectionSchema {
        CollectionSchema::new(
            Self::COLLECTION,
            vec![
                FieldDef::required("type", FieldType::one_of(&TransactionType::NAMES)),
                FieldDef::required("category", FieldType::String),
                FieldDef::required("amount", FieldType::Number).positive(),
                FieldDef::required("description", FieldType::String),
                FieldDef::required("date", FieldType::Date),
                FieldDef::optional("farmId", FieldType::Int).positive(),
            ],
        )
        .owned_by("farmId")
    }

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Criteria for narrowing the transaction list. Empty criteria match all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
    pub farm_id: Option<RecordId>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub search: Option<String>,
}

impl TransactionFilter {
    /// Transactions dated within one calendar month.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(Self {
            date_from: Some(first),
            date_to: next.pred_opt(),
            ..Self::default()
        })
    }

    /// Translate into a record query.
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        if let Some(kind) = self.kind {
            query = query.eq("type", kind.as_str());
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            query = query.eq("category", category);
        }
        if let Some(farm_id) = self.farm_id {
            query = query.owned_by("farmId", farm_id);
        }
        if self.date_from.is_some() || self.date_to.is_some() {
            query = query.date_range("date", self.date_from, self.date_to);
        }
        if let Some(term) = self.search.as_deref() {
            query = query.search(&["description", "category"], term);
        }
        query
    }
}

/// Income, expense and net totals over a set of transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_balance: Decimal,
    pub count: usize,
}

impl TransactionSummary {
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut summary = Self::default();
        for t in transactions {
            match t.kind {
                TransactionType::Income => summary.total_income += t.amount,
                TransactionType::Expense => summary.total_expenses += t.amount,
            }
            summary.count += 1;
        }
        summary.net_balance = summary.total_income - summary.total_expenses;
        summary
    }

    /// Summary restricted to one calendar month.
    pub fn for_month<'a, I>(transactions: I, year: i32, month: u32) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        Self::from_transactions(
            transactions
                .into_iter()
                .filter(|t| t.date.year() == year && t.date.month() == month),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{into_fields, Record};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn seed() -> Vec<Record> {
        [
            json!({"type": "income", "category": "crop_sale", "amount": 2500.0, "description": "Wheat harvest sale", "date": "2024-01-15", "farmId": 1}),
            json!({"type": "expense", "category": "seeds", "amount": 450.0, "description": "Corn seeds purchase", "date": "2024-01-10", "farmId": 1}),
            json!({"type": "income", "category": "crop_sale", "amount": 1800.0, "description": "Vegetable harvest", "date": "2024-01-20", "farmId": 2}),
            json!({"type": "expense", "category": "fertilizer", "amount": 320.0, "description": "Organic fertilizer", "date": "2024-02-12", "farmId": 1}),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, v)| Record::new(i as RecordId + 1, into_fields(v).unwrap()))
        .collect()
    }

    fn transactions() -> Vec<Transaction> {
        crate::entities::from_records(&seed()).unwrap()
    }

    #[test]
    fn records_convert() {
        let all = transactions();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].kind, TransactionType::Income);
        assert_eq!(all[0].amount, dec!(2500));
        assert_eq!(all[3].farm_id, Some(1));
    }

    #[test]
    fn summary_totals() {
        let summary = TransactionSummary::from_transactions(&transactions());
        assert_eq!(summary.total_income, dec!(4300));
        assert_eq!(summary.total_expenses, dec!(770));
        assert_eq!(summary.net_balance, dec!(3530));
        assert_eq!(summary.count, 4);

        let january = TransactionSummary::for_month(&transactions(), 2024, 1);
        assert_eq!(january.total_expenses, dec!(450));
        assert_eq!(january.count, 3);
    }

    #[test]
    fn filter_to_query() {
        let records = seed();
        let filter = TransactionFilter {
            kind: Some(TransactionType::Income),
            farm_id: Some(1),
            ..Default::default()
        };
        let hits = filter.to_query().run(&records);
        assert_eq!(hits.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1]);

        let filter = TransactionFilter {
            search: Some("FERT".into()),
            ..Default::default()
        };
        assert_eq!(filter.to_query().run(&records).len(), 1);

        assert_eq!(TransactionFilter::default().to_query().run(&records).len(), 4);
    }

    #[test]
    fn month_filter_bounds() {
        let records = seed();
        let january = TransactionFilter::month(2024, 1).unwrap();
        assert_eq!(january.date_to, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(january.to_query().run(&records).len(), 3);

        let december = TransactionFilter::month(2023, 12).unwrap();
        assert_eq!(december.date_to, NaiveDate::from_ymd_opt(2023, 12, 31));
        assert!(TransactionFilter::month(2024, 13).is_none());
    }

    #[test]
    fn category_labels() {
        assert_eq!(
            TransactionType::Income.category_label("crop_sale"),
            "Crop Sales"
        );
        assert_eq!(
            TransactionType::Expense.category_label("drone_rental"),
            "drone_rental"
        );
    }

    #[test]
    fn amount_must_be_positive() {
        let schema = Transaction::schema();
        let mut payload = seed().remove(0).fields;
        payload.insert("amount".into(), json!(0));
        assert!(schema.validate_payload(&payload).is_err());
    }
}
