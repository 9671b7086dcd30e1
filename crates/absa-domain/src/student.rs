//! Roster entries for the students taught by the studio.

use serde::{Deserialize, Serialize};

use crate::common::*;

/// A student in the roster, including the contact data used for invoicing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub rut: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub default_rate: f64,
    #[serde(default)]
    pub duration: ClassDuration,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub family: Option<String>,
    #[serde(default = "Student::default_active")]
    pub active: bool,
}

impl Student {
    pub fn default_active() -> bool {
        true
    }

    pub fn from_new(id: EntityId, new: NewStudent) -> Self {
        Self {
            id,
            name: new.name,
            full_name: new.full_name,
            address: new.address,
            phone: new.phone,
            rut: new.rut,
            email: new.email,
            default_rate: new.default_rate,
            duration: new.duration,
            family: new.family,
            active: true,
        }
    }
}

impl Identifiable for Student {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl NamedEntity for Student {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Input for adding a student to the roster.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewStudent {
    pub name: String,
    pub full_name: String,
    pub address: String,
    pub phone: String,
    pub rut: String,
    pub email: String,
    pub default_rate: f64,
    pub duration: ClassDuration,
    pub family: Option<String>,
}

impl NewStudent {
    pub fn new(name: impl Into<String>, default_rate: f64) -> Self {
        Self {
            name: name.into(),
            default_rate,
            ..Self::default()
        }
    }

    pub fn with_duration(mut self, duration: ClassDuration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }
}

/// Partial update merged onto an existing student.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub rut: Option<String>,
    pub email: Option<String>,
    pub default_rate: Option<f64>,
    pub duration: Option<ClassDuration>,
    pub family: Option<Option<String>>,
    pub active: Option<bool>,
}

impl StudentPatch {
    pub fn active(active: bool) -> Self {
        Self {
            active: Some(active),
            ..Self::default()
        }
    }

    pub fn apply(self, student: &mut Student) {
        if let Some(name) = self.name {
            student.name = name;
        }
        if let Some(full_name) = self.full_name {
            student.full_name = full_name;
        }
        if let Some(address) = self.address {
            student.address = address;
        }
        if let Some(phone) = self.phone {
            student.phone = phone;
        }
        if let Some(rut) = self.rut {
            student.rut = rut;
        }
        if let Some(email) = self.email {
            student.email = email;
        }
        if let Some(rate) = self.default_rate {
            student.default_rate = rate;
        }
        if let Some(duration) = self.duration {
            student.duration = duration;
        }
        if let Some(family) = self.family {
            student.family = family;
        }
        if let Some(active) = self.active {
            student.active = active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_student_without_contact_fields_loads() {
        let student: Student =
            serde_json::from_str(r#"{"id":1,"name":"Ana","defaultRate":"35000"}"#).unwrap();
        assert_eq!(student.default_rate, 35000.0);
        assert!(student.active);
        assert_eq!(student.duration, ClassDuration::OneHour);
        assert!(student.full_name.is_empty());
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let mut student = Student::from_new(EntityId::new(7), NewStudent::new("Ana", 30000.0));
        StudentPatch {
            default_rate: Some(32000.0),
            ..StudentPatch::default()
        }
        .apply(&mut student);
        assert_eq!(student.default_rate, 32000.0);
        assert_eq!(student.name, "Ana");
        assert!(student.active);
    }
}
