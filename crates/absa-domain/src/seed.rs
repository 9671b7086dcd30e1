//! Built-in dataset used for first launch and for backfilling missing fields.

use std::sync::Arc;

use crate::{
    category::{BudgetBand, Category, CategoryKind},
    common::EntityId,
    month::Month,
    payment_method::{PaymentMethod, PaymentMethodKind},
    state::{AppState, BrandSettings},
};

pub const SEED_YEAR: i32 = 2026;

pub const MONTH_NAMES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Expense categories that shipped as essentials before `budgetBand` existed.
pub const BASIC_CATEGORY_IDS: [u64; 4] = [1, 2, 3, 4];

fn category(
    id: u64,
    name: &str,
    color: &str,
    kind: CategoryKind,
    band: Option<BudgetBand>,
    subcategories: &[&str],
) -> Category {
    Category {
        id: EntityId::new(id),
        name: name.into(),
        color: color.into(),
        kind,
        budget_band: band,
        subcategories: subcategories.iter().map(|label| label.to_string()).collect(),
    }
}

pub fn initial_categories() -> Vec<Category> {
    use BudgetBand::*;
    use CategoryKind::*;
    vec![
        category(1, "Hogar", "bg-blue-500", Expense, Some(Basics), &["Alquiler", "Gastos Comunes", "Mantenimiento"]),
        category(2, "Transporte", "bg-green-500", Expense, Some(Basics), &["Bencina", "Uber/Taxi", "Transporte Público"]),
        category(3, "Familia", "bg-yellow-500", Expense, Some(Basics), &["Supermercado", "Restaurante", "Delivery"]),
        category(4, "Salud", "bg-red-500", Expense, Some(Basics), &["Medicamentos", "Consultas", "Exámenes"]),
        category(5, "Educación", "bg-purple-500", Expense, Some(Lifestyle), &["Cursos", "Materiales"]),
        category(6, "Ocio", "bg-pink-500", Expense, Some(Lifestyle), &["Cine", "Salidas", "Streaming"]),
        category(7, "Clases de Piano", "bg-indigo-500", Income, None, &[]),
        category(8, "Otros Ingresos", "bg-teal-500", Income, None, &[]),
    ]
}

pub fn initial_payment_methods() -> Vec<PaymentMethod> {
    vec![
        PaymentMethod {
            id: EntityId::new(1),
            name: "Efectivo".into(),
            kind: PaymentMethodKind::Cash,
            color: "bg-emerald-500".into(),
        },
        PaymentMethod {
            id: EntityId::new(2),
            name: "Débito".into(),
            kind: PaymentMethodKind::Debit,
            color: "bg-blue-500".into(),
        },
        PaymentMethod {
            id: EntityId::new(3),
            name: "Crédito Visa".into(),
            kind: PaymentMethodKind::Credit,
            color: "bg-purple-500".into(),
        },
    ]
}

/// Twelve empty months, freshly allocated on every call.
pub fn empty_months() -> Vec<Arc<Month>> {
    MONTH_NAMES
        .iter()
        .map(|name| Arc::new(Month::empty(*name)))
        .collect()
}

pub fn initial_state() -> AppState {
    AppState {
        year: SEED_YEAR,
        categories: Arc::new(initial_categories()),
        payment_methods: Arc::new(initial_payment_methods()),
        student_db: Arc::new(Vec::new()),
        months: empty_months(),
        schedule: Arc::new(Vec::new()),
        brand_settings: BrandSettings::default(),
    }
}
