use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::*;

/// A card, account, or cash drawer that expenses are paid from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentMethod {
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PaymentMethodKind,
    #[serde(default, deserialize_with = "lenient::text")]
    pub color: String,
}

impl PaymentMethod {
    pub fn from_new(id: EntityId, new: NewPaymentMethod) -> Self {
        Self {
            id,
            name: new.name,
            kind: new.kind,
            color: new.color,
        }
    }
}

impl Identifiable for PaymentMethod {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl NamedEntity for PaymentMethod {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethodKind {
    Credit,
    Debit,
    Cash,
}

impl fmt::Display for PaymentMethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentMethodKind::Credit => "Tarjeta de Crédito",
            PaymentMethodKind::Debit => "Débito / Cuenta Vista",
            PaymentMethodKind::Cash => "Efectivo",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPaymentMethod {
    pub name: String,
    pub kind: PaymentMethodKind,
    pub color: String,
}

impl NewPaymentMethod {
    pub fn new(name: impl Into<String>, kind: PaymentMethodKind) -> Self {
        Self {
            name: name.into(),
            kind,
            color: "bg-slate-500".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentMethodPatch {
    pub name: Option<String>,
    pub kind: Option<PaymentMethodKind>,
    pub color: Option<String>,
}

impl PaymentMethodPatch {
    pub fn apply(self, method: &mut PaymentMethod) {
        if let Some(name) = self.name {
            method.name = name;
        }
        if let Some(kind) = self.kind {
            method.kind = kind;
        }
        if let Some(color) = self.color {
            method.color = color;
        }
    }
}
