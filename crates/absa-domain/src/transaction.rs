//! Domain models for monthly income and expense entries.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::*;

/// An income or expense line recorded against a month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient::optional_id")]
    pub category_id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub subcategory: String,
    #[serde(
        default,
        deserialize_with = "lenient::optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_method_id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient::optional_date")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default, deserialize_with = "lenient::optional_date")]
    pub payment_date: Option<NaiveDate>,
}

impl Transaction {
    pub fn from_new(id: EntityId, kind: TransactionKind, new: NewTransaction) -> Self {
        let payment_method_id = match kind {
            TransactionKind::Expense => new.payment_method_id,
            TransactionKind::Income => None,
        };
        Self {
            id,
            description: new.description,
            amount: new.amount,
            category_id: new.category_id,
            subcategory: new.subcategory,
            payment_method_id,
            date: Some(new.date),
            status: PaymentStatus::Pending,
            payment_date: None,
        }
    }

    /// True when `other` would be treated as the same recurring entry on import.
    pub fn matches_entry(&self, other: &Transaction) -> bool {
        self.description == other.description && self.amount == other.amount
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Amounted for Transaction {
    fn amount(&self) -> f64 {
        self.amount
    }
}

/// Selects which list of a month a transaction lives in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Expense => "expense",
            TransactionKind::Income => "income",
        };
        f.write_str(label)
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "expense" | "expenses" | "gasto" | "gastos" => Ok(TransactionKind::Expense),
            "income" | "incomes" | "ingreso" | "ingresos" => Ok(TransactionKind::Income),
            other => Err(format!("unknown transaction kind `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub description: String,
    pub amount: f64,
    pub category_id: Option<EntityId>,
    pub subcategory: String,
    /// Ignored for incomes.
    pub payment_method_id: Option<EntityId>,
    pub date: NaiveDate,
}

impl NewTransaction {
    pub fn new(description: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self {
            description: description.into(),
            amount,
            category_id: None,
            subcategory: String::new(),
            payment_method_id: None,
            date,
        }
    }

    pub fn with_category(mut self, category_id: EntityId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = subcategory.into();
        self
    }

    pub fn with_payment_method(mut self, payment_method_id: EntityId) -> Self {
        self.payment_method_id = Some(payment_method_id);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub category_id: Option<Option<EntityId>>,
    pub subcategory: Option<String>,
    pub payment_method_id: Option<Option<EntityId>>,
    pub date: Option<NaiveDate>,
    pub status: Option<PaymentStatus>,
    pub payment_date: Option<Option<NaiveDate>>,
}

impl TransactionPatch {
    pub fn apply(self, transaction: &mut Transaction) {
        if let Some(description) = self.description {
            transaction.description = description;
        }
        if let Some(amount) = self.amount {
            transaction.amount = amount;
        }
        if let Some(category_id) = self.category_id {
            transaction.category_id = category_id;
        }
        if let Some(subcategory) = self.subcategory {
            transaction.subcategory = subcategory;
        }
        if let Some(payment_method_id) = self.payment_method_id {
            transaction.payment_method_id = payment_method_id;
        }
        if let Some(date) = self.date {
            transaction.date = Some(date);
        }
        if let Some(status) = self.status {
            transaction.status = status;
        }
        if let Some(payment_date) = self.payment_date {
            transaction.payment_date = payment_date;
        }
    }
}
