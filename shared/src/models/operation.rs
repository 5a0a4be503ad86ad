//! Stock operations and the groups they are booked in

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::audit::AuditFields;
use crate::ledger::line_amount;
use crate::types::Label;

/// Ledger action of an operation group.
///
/// Debit books goods into stock (a purchase from a supplier); credit books
/// them out (a sale to a customer). Stored as a small integer, 1 and 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum Action {
    Debit = 1,
    Credit = 2,
}

/// Unknown action code
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("unknown action code {0}, expected 1 (debit) or 2 (credit)")]
pub struct InvalidAction(pub i16);

impl Action {
    pub const ALL: [Action; 2] = [Action::Debit, Action::Credit];

    pub fn code(self) -> i16 {
        self as i16
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Debit => "debit",
            Action::Credit => "credit",
        }
    }

    pub fn label(self) -> Label {
        match self {
            Action::Debit => Label::new("Debit", "Приход"),
            Action::Credit => Label::new("Credit", "Расход"),
        }
    }

    /// +1 for movements into stock, -1 for movements out of it
    pub fn sign(self) -> i64 {
        match self {
            Action::Debit => 1,
            Action::Credit => -1,
        }
    }

    /// Whether this action takes goods out of stock
    pub fn is_deducting(self) -> bool {
        self == Action::Credit
    }

    /// Quantity with the stock sign applied
    pub fn signed(self, quantity: i32) -> i64 {
        self.sign() * i64::from(quantity)
    }
}

impl TryFrom<i16> for Action {
    type Error = InvalidAction;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Action::Debit),
            2 => Ok(Action::Credit),
            other => Err(InvalidAction(other)),
        }
    }
}

impl std::str::FromStr for Action {
    type Err = InvalidAction;

    /// Accepts the name (`debit`, `credit`) or the stored code (`1`, `2`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debit" | "1" => Ok(Action::Debit),
            "credit" | "2" => Ok(Action::Credit),
            _ => Err(InvalidAction(0)),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label().en)
    }
}

/// A batch of operations under one counterparty and one action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OperationGroup {
    pub id: Uuid,
    pub counterparty_id: Uuid,
    pub action: Action,
    pub comment: Option<String>,
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub audit: AuditFields,
}

/// A single line-item movement of a product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Operation {
    pub id: Uuid,
    pub product_id: Uuid,
    pub group_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
    /// Percentage, 0 to 100
    pub discount: Decimal,
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub audit: AuditFields,
}

impl Operation {
    /// quantity × price × (1 − discount/100), unrounded
    pub fn amount(&self) -> Decimal {
        line_amount(self.quantity, self.price, self.discount)
    }
}
