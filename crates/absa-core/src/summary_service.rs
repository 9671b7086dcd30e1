//! Read-only aggregates behind the dashboard and budget views.

use std::collections::BTreeMap;

use absa_domain::{
    category::BudgetBand,
    common::{total_of, EntityId},
    month::Month,
    state::AppState,
};
use serde::Serialize;

/// Label shown for an expense whose category no longer exists.
pub const FALLBACK_CATEGORY_LABEL: &str = "Otros";
/// Label shown for an expense whose payment method is unset or gone.
pub const FALLBACK_PAYMENT_METHOD_LABEL: &str = "Sin medio";
/// Share of income the 50/30/20 rule reserves for savings, debt, and investment.
pub const SAVINGS_TARGET_SHARE: f64 = 0.2;

/// Ratio above target still shown as a warning rather than an overrun.
const NEAR_LIMIT_RATIO: f64 = 1.15;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MonthSummary {
    pub piano_income: f64,
    pub other_income: f64,
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
    /// Income minus expenses. Savings are reported separately.
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthRow {
    pub name: String,
    pub income: f64,
    pub expense: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub months: Vec<MonthRow>,
}

/// How a band's real spending compares with its ideal share of income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BandStatus {
    /// No income this month, so there is nothing to compare against.
    NoTarget,
    OnTrack,
    NearLimit,
    OverLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandUsage {
    pub real: f64,
    pub ideal: f64,
}

impl BandUsage {
    fn new(real: f64, income: f64, share: f64) -> Self {
        Self {
            real,
            ideal: income * share,
        }
    }

    pub fn status(&self) -> BandStatus {
        if self.ideal == 0.0 {
            return BandStatus::NoTarget;
        }
        let ratio = self.real / self.ideal;
        if ratio <= 1.0 {
            BandStatus::OnTrack
        } else if ratio <= NEAR_LIMIT_RATIO {
            BandStatus::NearLimit
        } else {
            BandStatus::OverLimit
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    pub category_id: Option<EntityId>,
    pub name: String,
    pub color: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetBreakdown {
    pub total_income: f64,
    pub total_expenses: f64,
    pub basics: BandUsage,
    pub lifestyle: BandUsage,
    pub savings: BandUsage,
    /// Expense totals per category, largest first.
    pub categories: Vec<CategorySpend>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyTotal {
    pub family: String,
    pub classes: usize,
    pub total: f64,
}

pub fn month_summary(month: &Month) -> MonthSummary {
    let piano_income = total_of(&month.piano_classes);
    let other_income = total_of(&month.incomes);
    let expenses = total_of(&month.expenses);
    let income = piano_income + other_income;
    MonthSummary {
        piano_income,
        other_income,
        income,
        expenses,
        savings: total_of(&month.savings),
        balance: income - expenses,
    }
}

pub fn annual_summary(state: &AppState) -> AnnualSummary {
    let months: Vec<MonthRow> = state
        .months
        .iter()
        .map(|month| {
            let summary = month_summary(month);
            MonthRow {
                name: month.name.clone(),
                income: summary.income,
                expense: summary.expenses,
            }
        })
        .collect();
    let total_income: f64 = months.iter().map(|row| row.income).sum();
    let total_expense: f64 = months.iter().map(|row| row.expense).sum();
    AnnualSummary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        months,
    }
}

/// Applies the 50/30/20 rule to month `month`. Expenses are banded by their
/// category's `budgetBand`; dangling categories count as lifestyle spending.
pub fn budget_breakdown(state: &AppState, month: usize) -> Option<BudgetBreakdown> {
    let target = state.month(month)?;
    let summary = month_summary(target);

    let mut basics = 0.0;
    let mut lifestyle = 0.0;
    let mut per_category: Vec<CategorySpend> = Vec::new();

    for expense in &target.expenses {
        let category = expense.category_id.and_then(|id| state.category(id));
        match category.and_then(|c| c.effective_band()) {
            Some(BudgetBand::Basics) => basics += expense.amount,
            _ => lifestyle += expense.amount,
        }

        match per_category
            .iter_mut()
            .find(|entry| entry.category_id == expense.category_id)
        {
            Some(entry) => entry.amount += expense.amount,
            None => per_category.push(CategorySpend {
                category_id: expense.category_id,
                name: category
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| FALLBACK_CATEGORY_LABEL.to_string()),
                color: category
                    .map(|c| c.color.clone())
                    .unwrap_or_else(|| "bg-slate-500".to_string()),
                amount: expense.amount,
            }),
        }
    }
    per_category.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    let income = summary.income;
    Some(BudgetBreakdown {
        total_income: income,
        total_expenses: basics + lifestyle,
        basics: BandUsage::new(basics, income, BudgetBand::Basics.target_share()),
        lifestyle: BandUsage::new(lifestyle, income, BudgetBand::Lifestyle.target_share()),
        savings: BandUsage::new(summary.savings, income, SAVINGS_TARGET_SHARE),
        categories: per_category,
    })
}

/// Class totals grouped by family, ordered by family name. Classes without a
/// family are left out.
pub fn family_totals(month: &Month) -> Vec<FamilyTotal> {
    let mut groups: BTreeMap<&str, FamilyTotal> = BTreeMap::new();
    for class in &month.piano_classes {
        let Some(family) = class.family.as_deref() else {
            continue;
        };
        let entry = groups.entry(family).or_insert_with(|| FamilyTotal {
            family: family.to_string(),
            classes: 0,
            total: 0.0,
        });
        entry.classes += 1;
        entry.total += class.total;
    }
    groups.into_values().collect()
}

pub fn category_label(state: &AppState, id: Option<EntityId>) -> &str {
    id.and_then(|id| state.category(id))
        .map(|category| category.name.as_str())
        .unwrap_or(FALLBACK_CATEGORY_LABEL)
}

pub fn payment_method_label(state: &AppState, id: Option<EntityId>) -> &str {
    id.and_then(|id| state.payment_method(id))
        .map(|method| method.name.as_str())
        .unwrap_or(FALLBACK_PAYMENT_METHOD_LABEL)
}
