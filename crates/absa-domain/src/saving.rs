use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::*;

/// Money set aside in a month: savings, debt repayment, or investment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Saving {
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient::optional_date")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "type", default)]
    pub kind: SavingKind,
}

impl Saving {
    pub fn from_new(id: EntityId, new: NewSaving) -> Self {
        Self {
            id,
            description: new.description,
            amount: new.amount,
            date: Some(new.date),
            kind: new.kind,
        }
    }
}

impl Identifiable for Saving {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Amounted for Saving {
    fn amount(&self) -> f64 {
        self.amount
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SavingKind {
    #[default]
    Ahorro,
    Deuda,
    Inversion,
}

impl fmt::Display for SavingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SavingKind::Ahorro => "Ahorro",
            SavingKind::Deuda => "Deuda",
            SavingKind::Inversion => "Inversión",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSaving {
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub kind: SavingKind,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavingPatch {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<NaiveDate>,
    pub kind: Option<SavingKind>,
}

impl SavingPatch {
    pub fn apply(self, saving: &mut Saving) {
        if let Some(description) = self.description {
            saving.description = description;
        }
        if let Some(amount) = self.amount {
            saving.amount = amount;
        }
        if let Some(date) = self.date {
            saving.date = Some(date);
        }
        if let Some(kind) = self.kind {
            saving.kind = kind;
        }
    }
}
