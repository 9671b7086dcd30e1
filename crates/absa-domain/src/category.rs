//! Domain types representing income and expense categories.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::*;

/// Groups transactions for budgeting and reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub color: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_band: Option<BudgetBand>,
    #[serde(default)]
    pub subcategories: Vec<String>,
}

impl Category {
    pub fn from_new(id: EntityId, new: NewCategory) -> Self {
        let budget_band = match new.kind {
            CategoryKind::Expense => Some(new.budget_band.unwrap_or(BudgetBand::Lifestyle)),
            CategoryKind::Income => new.budget_band,
        };
        Self {
            id,
            name: new.name,
            color: new.color,
            kind: new.kind,
            budget_band,
            subcategories: Vec::new(),
        }
    }

    /// Band used by the 50/30/20 breakdown; expenses without a band count as lifestyle.
    pub fn effective_band(&self) -> Option<BudgetBand> {
        match self.kind {
            CategoryKind::Expense => Some(self.budget_band.unwrap_or(BudgetBand::Lifestyle)),
            CategoryKind::Income => None,
        }
    }

    pub fn has_subcategory(&self, label: &str) -> bool {
        self.subcategories.iter().any(|existing| existing == label)
    }
}

impl Identifiable for Category {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl NamedEntity for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Supported category types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Expense,
    Income,
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CategoryKind::Expense => "expense",
            CategoryKind::Income => "income",
        };
        f.write_str(label)
    }
}

/// Budget band an expense category contributes to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BudgetBand {
    /// Essentials, targeted at 50% of monthly income.
    #[serde(rename = "basicos")]
    Basics,
    /// Personal spending, targeted at 30% of monthly income.
    #[serde(rename = "estiloVida")]
    Lifestyle,
}

impl BudgetBand {
    /// Share of monthly income the band should not exceed.
    pub fn target_share(self) -> f64 {
        match self {
            BudgetBand::Basics => 0.50,
            BudgetBand::Lifestyle => 0.30,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BudgetBand::Basics => "Gastos Básicos",
            BudgetBand::Lifestyle => "Estilo de Vida",
        }
    }
}

/// Input for creating a category. New categories start without subcategories.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub name: String,
    pub color: String,
    pub kind: CategoryKind,
    pub budget_band: Option<BudgetBand>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            name: name.into(),
            color: "bg-indigo-500".into(),
            kind,
            budget_band: None,
        }
    }

    pub fn with_band(mut self, band: BudgetBand) -> Self {
        self.budget_band = Some(band);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub kind: Option<CategoryKind>,
    pub budget_band: Option<BudgetBand>,
    pub subcategories: Option<Vec<String>>,
}

impl CategoryPatch {
    pub fn band(band: BudgetBand) -> Self {
        Self {
            budget_band: Some(band),
            ..Self::default()
        }
    }

    pub fn apply(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(color) = self.color {
            category.color = color;
        }
        if let Some(kind) = self.kind {
            category.kind = kind;
        }
        if let Some(band) = self.budget_band {
            category.budget_band = Some(band);
        }
        if let Some(subcategories) = self.subcategories {
            category.subcategories = subcategories;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expense_categories_default_to_lifestyle_band() {
        let category = Category::from_new(
            EntityId::new(10),
            NewCategory::new("Mascotas", CategoryKind::Expense),
        );
        assert_eq!(category.budget_band, Some(BudgetBand::Lifestyle));
        assert!(category.subcategories.is_empty());
    }

    #[test]
    fn income_categories_have_no_band() {
        let category = Category::from_new(
            EntityId::new(11),
            NewCategory::new("Conciertos", CategoryKind::Income),
        );
        assert_eq!(category.effective_band(), None);
        let json = serde_json::to_value(&category).unwrap();
        assert!(json.get("budgetBand").is_none());
        assert_eq!(json["type"], "income");
    }

    #[test]
    fn band_uses_persisted_spelling() {
        let category: Category = serde_json::from_str(
            r#"{"id":1,"name":"Hogar","color":"bg-blue-500","type":"expense","budgetBand":"basicos"}"#,
        )
        .unwrap();
        assert_eq!(category.budget_band, Some(BudgetBand::Basics));
    }
}
