//! Recurring weekly class slots.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::*;

/// A weekly slot (not a dated event) reserved for a student.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: EntityId,
    pub day: Weekday,
    #[serde(default, deserialize_with = "lenient::text")]
    pub time: String,
    #[serde(default, deserialize_with = "lenient::optional_id")]
    pub student_id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub student_name: String,
    #[serde(default)]
    pub duration: ClassDuration,
}

impl ScheduleEntry {
    pub fn from_new(id: EntityId, new: NewScheduleEntry) -> Self {
        Self {
            id,
            day: new.day,
            time: new.time,
            student_id: new.student_id,
            student_name: new.student_name,
            duration: new.duration,
        }
    }
}

impl Identifiable for ScheduleEntry {
    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weekday {
    Lunes,
    Martes,
    #[serde(rename = "Miércoles")]
    Miercoles,
    Jueves,
    Viernes,
    #[serde(rename = "Sábado")]
    Sabado,
    Domingo,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Lunes,
        Weekday::Martes,
        Weekday::Miercoles,
        Weekday::Jueves,
        Weekday::Viernes,
        Weekday::Sabado,
        Weekday::Domingo,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Weekday::Lunes => "Lunes",
            Weekday::Martes => "Martes",
            Weekday::Miercoles => "Miércoles",
            Weekday::Jueves => "Jueves",
            Weekday::Viernes => "Viernes",
            Weekday::Sabado => "Sábado",
            Weekday::Domingo => "Domingo",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewScheduleEntry {
    pub day: Weekday,
    pub time: String,
    pub student_id: Option<EntityId>,
    pub student_name: String,
    pub duration: ClassDuration,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleEntryPatch {
    pub day: Option<Weekday>,
    pub time: Option<String>,
    pub student_id: Option<Option<EntityId>>,
    pub student_name: Option<String>,
    pub duration: Option<ClassDuration>,
}

impl ScheduleEntryPatch {
    /// Moves the slot to another day and time, as a calendar drag does.
    pub fn move_to(day: Weekday, time: impl Into<String>) -> Self {
        Self {
            day: Some(day),
            time: Some(time.into()),
            ..Self::default()
        }
    }

    pub fn apply(self, entry: &mut ScheduleEntry) {
        if let Some(day) = self.day {
            entry.day = day;
        }
        if let Some(time) = self.time {
            entry.time = time;
        }
        if let Some(student_id) = self.student_id {
            entry.student_id = student_id;
        }
        if let Some(student_name) = self.student_name {
            entry.student_name = student_name;
        }
        if let Some(duration) = self.duration {
            entry.duration = duration;
        }
    }
}
