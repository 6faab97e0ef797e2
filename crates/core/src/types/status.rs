//! Status enums for orders.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Order lifecycle status.
///
/// The backend stores this as a plain string; the set is closed and the
/// client rejects anything outside it at the normalization boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order received, payment not yet confirmed.
    #[default]
    Pending,
    /// Payment confirmed, order being worked on.
    InProgress,
    /// Order packed and ready to ship.
    Prepared,
    /// Order handed to the carrier.
    Shipped,
    /// Order cancelled.
    Cancelled,
}

/// Error returned when parsing an unknown order status string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid order status: {0}")]
pub struct InvalidOrderStatus(pub String);

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Prepared => write!(f, "prepared"),
            Self::Shipped => write!(f, "shipped"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = InvalidOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" | "in-progress" => Ok(Self::InProgress),
            "prepared" => Ok(Self::Prepared),
            "shipped" => Ok(Self::Shipped),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(InvalidOrderStatus(s.to_owned())),
        }
    }
}
