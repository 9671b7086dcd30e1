use serde::{Deserialize, Serialize};

use crate::{
    common::*, piano_class::PianoClass, saving::Saving, transaction::Transaction,
    transaction::TransactionKind,
};

/// One calendar month of records.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Month {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default)]
    pub piano_classes: Vec<PianoClass>,
    #[serde(default)]
    pub expenses: Vec<Transaction>,
    #[serde(default)]
    pub incomes: Vec<Transaction>,
    #[serde(default)]
    pub savings: Vec<Saving>,
}

impl Month {
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn transactions(&self, kind: TransactionKind) -> &[Transaction] {
        match kind {
            TransactionKind::Expense => &self.expenses,
            TransactionKind::Income => &self.incomes,
        }
    }

    pub fn transactions_mut(&mut self, kind: TransactionKind) -> &mut Vec<Transaction> {
        match kind {
            TransactionKind::Expense => &mut self.expenses,
            TransactionKind::Income => &mut self.incomes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.piano_classes.is_empty()
            && self.expenses.is_empty()
            && self.incomes.is_empty()
            && self.savings.is_empty()
    }
}
