//! Billed piano classes for a month.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{common::*, student::Student};

/// Classes given once imported from the roster.
pub const DEFAULT_CLASS_COUNT: u32 = 4;

/// A month's billing line for one student: `count` classes at `rate` each.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PianoClass {
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub student_name: String,
    #[serde(
        default,
        deserialize_with = "lenient::optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub student_id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub rate: f64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub count: u32,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total: f64,
    #[serde(default)]
    pub duration: ClassDuration,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default, deserialize_with = "lenient::optional_date")]
    pub payment_date: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub family: Option<String>,
}

impl PianoClass {
    pub fn from_new(id: EntityId, new: NewPianoClass) -> Self {
        let mut class = Self {
            id,
            student_name: new.student_name,
            student_id: new.student_id,
            rate: new.rate,
            count: new.count,
            total: 0.0,
            duration: new.duration,
            status: PaymentStatus::Pending,
            payment_date: None,
            family: new.family,
        };
        class.recompute_total();
        class
    }

    /// Builds the default billing line for a roster student.
    pub fn for_student(id: EntityId, student: &Student) -> Self {
        Self::from_new(
            id,
            NewPianoClass {
                student_name: student.name.clone(),
                student_id: Some(student.id),
                rate: student.default_rate,
                count: DEFAULT_CLASS_COUNT,
                duration: student.duration,
                family: student.family.clone(),
            },
        )
    }

    pub fn recompute_total(&mut self) {
        self.total = self.rate * f64::from(self.count);
    }

    /// True when this line already bills `student`, by id or by name.
    pub fn represents(&self, student: &Student) -> bool {
        self.student_id == Some(student.id) || self.student_name == student.name
    }
}

impl Identifiable for PianoClass {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Amounted for PianoClass {
    fn amount(&self) -> f64 {
        self.total
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPianoClass {
    pub student_name: String,
    pub student_id: Option<EntityId>,
    pub rate: f64,
    pub count: u32,
    pub duration: ClassDuration,
    pub family: Option<String>,
}

impl NewPianoClass {
    pub fn new(student_name: impl Into<String>, rate: f64, count: u32) -> Self {
        Self {
            student_name: student_name.into(),
            student_id: None,
            rate,
            count,
            duration: ClassDuration::Minutes45,
            family: None,
        }
    }
}

/// Partial update for a class. `total` is derived and cannot be patched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PianoClassPatch {
    pub student_name: Option<String>,
    pub student_id: Option<Option<EntityId>>,
    pub rate: Option<f64>,
    pub count: Option<u32>,
    pub duration: Option<ClassDuration>,
    pub status: Option<PaymentStatus>,
    pub payment_date: Option<Option<NaiveDate>>,
    pub family: Option<Option<String>>,
}

impl PianoClassPatch {
    pub fn apply(self, class: &mut PianoClass) {
        if let Some(student_name) = self.student_name {
            class.student_name = student_name;
        }
        if let Some(student_id) = self.student_id {
            class.student_id = student_id;
        }
        if let Some(rate) = self.rate {
            class.rate = rate;
        }
        if let Some(count) = self.count {
            class.count = count;
        }
        if let Some(duration) = self.duration {
            class.duration = duration;
        }
        if let Some(status) = self.status {
            class.status = status;
        }
        if let Some(payment_date) = self.payment_date {
            class.payment_date = payment_date;
        }
        if let Some(family) = self.family {
            class.family = family;
        }
        class.recompute_total();
    }
}
