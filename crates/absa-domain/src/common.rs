//! Shared identifiers, traits, enums, and lenient decoders for persisted records.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Largest integer an IEEE double represents exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Opaque numeric identifier assigned to every stored entity.
///
/// Identifiers are millisecond timestamps for freshly created records. Older
/// saved data may hold fractional identifiers, which are preserved as-is.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct EntityId(f64);

impl EntityId {
    pub const fn new(value: u64) -> Self {
        Self(value as f64)
    }

    /// Builds an identifier from a raw float, rejecting non-finite values.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        // -0.0 and 0.0 must hash identically.
        Some(Self(if value == 0.0 { 0.0 } else { value }))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_integral(self) -> bool {
        self.0.fract() == 0.0 && self.0.abs() <= MAX_EXACT_INTEGER
    }
}

impl Eq for EntityId {}

impl Hash for EntityId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integral() {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for EntityId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(EntityId::from_f64)
            .ok_or_else(|| format!("invalid identifier `{value}`"))
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_integral() {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Number(value) => EntityId::from_f64(value)
                .ok_or_else(|| de::Error::custom("identifier must be finite")),
            NumberOrText::Text(text) => text.parse().map_err(de::Error::custom),
        }
    }
}

/// Exposes a stable identifier for entities stored in the books.
pub trait Identifiable {
    fn id(&self) -> EntityId;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a common contract for retrieving monetary amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Sums the amounts of any slice of amounted records.
pub fn total_of<T: Amounted>(items: &[T]) -> f64 {
    items.iter().map(Amounted::amount).sum()
}

/// Payment state shared by transactions and piano classes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentStatus {
    #[default]
    #[serde(rename = "Pendiente")]
    Pending,
    #[serde(rename = "Al día")]
    Paid,
}

impl PaymentStatus {
    pub fn toggled(self) -> Self {
        match self {
            PaymentStatus::Pending => PaymentStatus::Paid,
            PaymentStatus::Paid => PaymentStatus::Pending,
        }
    }

    pub fn is_paid(self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentStatus::Pending => "Pendiente",
            PaymentStatus::Paid => "Al día",
        };
        f.write_str(label)
    }
}

/// Supported class lengths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ClassDuration {
    Minutes20,
    Minutes30,
    Minutes45,
    #[default]
    OneHour,
}

impl ClassDuration {
    pub const ALL: [ClassDuration; 4] = [
        ClassDuration::Minutes20,
        ClassDuration::Minutes30,
        ClassDuration::Minutes45,
        ClassDuration::OneHour,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ClassDuration::Minutes20 => "20 min",
            ClassDuration::Minutes30 => "30 min",
            ClassDuration::Minutes45 => "45 min",
            ClassDuration::OneHour => "1 hora",
        }
    }

    /// Parses a stored label; unknown labels fall back to one hour.
    pub fn from_label(value: &str) -> Self {
        let normalized = value.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|duration| duration.label() == normalized)
            .unwrap_or_default()
    }

    pub fn minutes(self) -> u32 {
        match self {
            ClassDuration::Minutes20 => 20,
            ClassDuration::Minutes30 => 30,
            ClassDuration::Minutes45 => 45,
            ClassDuration::OneHour => 60,
        }
    }
}

impl fmt::Display for ClassDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ClassDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ClassDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .map(|label| ClassDuration::from_label(&label))
            .unwrap_or_default())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Field decoders that tolerate the loosely typed values older saves contain
/// (numbers stored as strings, empty strings for missing dates or references).
pub mod lenient {
    use super::*;

    fn parse_number(text: &str) -> f64 {
        text.trim().parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0)
    }

    pub fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
            None => 0.0,
            Some(NumberOrText::Number(value)) => value,
            Some(NumberOrText::Text(text)) => parse_number(&text),
        })
    }

    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let raw = match Option::<NumberOrText>::deserialize(deserializer)? {
            None => 0.0,
            Some(NumberOrText::Number(value)) => value,
            Some(NumberOrText::Text(text)) => parse_number(&text),
        };
        if raw.is_finite() && raw > 0.0 {
            Ok(raw.round().min(u32::MAX as f64) as u32)
        } else {
            Ok(0)
        }
    }

    pub fn optional_date<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.and_then(|text| parse_date(&text)))
    }

    pub fn optional_id<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<EntityId>, D::Error> {
        Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
            None => None,
            Some(NumberOrText::Number(value)) => EntityId::from_f64(value),
            Some(NumberOrText::Text(text)) => text.parse().ok(),
        })
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
    }

    pub fn optional_text<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.filter(|text| !text.trim().is_empty()))
    }

    /// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp; anything else is treated as absent.
    pub fn parse_date(text: &str) -> Option<NaiveDate> {
        let trimmed = text.trim();
        let head = trimmed.get(..10).unwrap_or(trimmed);
        NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
    }
}
