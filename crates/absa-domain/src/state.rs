//! Root state tree that owns every collection.
//!
//! Collections and months sit behind [`Arc`] so a snapshot clone is cheap and a
//! mutation copies only the path it touches (`Arc::make_mut`).

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    category::Category, common::*, month::Month, payment_method::PaymentMethod,
    schedule::ScheduleEntry, student::Student,
};

/// Number of months in a year of records.
pub const MONTHS_PER_YEAR: usize = 12;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub year: i32,
    pub categories: Arc<Vec<Category>>,
    pub payment_methods: Arc<Vec<PaymentMethod>>,
    pub student_db: Arc<Vec<Student>>,
    pub months: Vec<Arc<Month>>,
    pub schedule: Arc<Vec<ScheduleEntry>>,
    pub brand_settings: BrandSettings,
}

impl AppState {
    pub fn month(&self, index: usize) -> Option<&Month> {
        self.months.get(index).map(Arc::as_ref)
    }

    /// Copy-on-write access to one month; other months stay shared.
    pub fn month_mut(&mut self, index: usize) -> Option<&mut Month> {
        self.months.get_mut(index).map(Arc::make_mut)
    }

    pub fn categories_mut(&mut self) -> &mut Vec<Category> {
        Arc::make_mut(&mut self.categories)
    }

    pub fn payment_methods_mut(&mut self) -> &mut Vec<PaymentMethod> {
        Arc::make_mut(&mut self.payment_methods)
    }

    pub fn student_db_mut(&mut self) -> &mut Vec<Student> {
        Arc::make_mut(&mut self.student_db)
    }

    pub fn schedule_mut(&mut self) -> &mut Vec<ScheduleEntry> {
        Arc::make_mut(&mut self.schedule)
    }

    pub fn category(&self, id: EntityId) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn payment_method(&self, id: EntityId) -> Option<&PaymentMethod> {
        self.payment_methods.iter().find(|method| method.id == id)
    }

    pub fn student(&self, id: EntityId) -> Option<&Student> {
        self.student_db.iter().find(|student| student.id == id)
    }

    pub fn active_students(&self) -> impl Iterator<Item = &Student> {
        self.student_db.iter().filter(|student| student.active)
    }

    /// True when `other` shares the month at `index` without a copy.
    pub fn shares_month_with(&self, other: &AppState, index: usize) -> bool {
        match (self.months.get(index), other.months.get(index)) {
            (Some(left), Some(right)) => Arc::ptr_eq(left, right),
            _ => false,
        }
    }
}

/// Studio name and icon shown in the header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrandSettings {
    #[serde(default = "BrandSettings::default_name")]
    pub name: String,
    #[serde(default = "BrandSettings::default_icon")]
    pub icon: String,
}

impl BrandSettings {
    pub fn default_name() -> String {
        "AbsaPiano".into()
    }

    pub fn default_icon() -> String {
        "Music".into()
    }
}

impl Default for BrandSettings {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            icon: Self::default_icon(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrandSettingsPatch {
    pub name: Option<String>,
    pub icon: Option<String>,
}

impl BrandSettingsPatch {
    pub fn apply(self, settings: &mut BrandSettings) {
        if let Some(name) = self.name {
            settings.name = name;
        }
        if let Some(icon) = self.icon {
            settings.icon = icon;
        }
    }
}
