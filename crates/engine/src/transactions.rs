use std::fmt;

use crate::EngineError;

/// Settlement status of a [`Transaction`].
///
/// `Pending` is the only initial state; the three others are terminal.
/// Numeric codes match the server encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransactionStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl TransactionStatus {
    pub const ALL: [TransactionStatus; 4] = [
        TransactionStatus::Pending,
        TransactionStatus::Completed,
        TransactionStatus::Failed,
        TransactionStatus::Cancelled,
    ];

    pub fn code(self) -> i64 {
        match self {
            Self::Pending => 0,
            Self::Completed => 1,
            Self::Failed => 2,
            Self::Cancelled => 3,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, EngineError> {
        match code {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Completed),
            2 => Ok(Self::Failed),
            3 => Ok(Self::Cancelled),
            other => Err(EngineError::InvalidStatus(other.to_string())),
        }
    }

    /// Case-insensitive lookup by label (`"completed"`, `"Failed"`, ...).
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(label.trim()))
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returns `true` only for `Pending -> {Completed, Failed, Cancelled}`.
pub fn can_transition(from: TransactionStatus, to: TransactionStatus) -> bool {
    matches!(from, TransactionStatus::Pending) && to.is_terminal()
}

/// Server identifier of a transaction, kept exactly as it was received.
///
/// A numeric id stays a number and a text id stays text, so a record can be
/// written back without changing its identity (`"007"` is not `7`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TransactionId {
    Number(i64),
    Text(String),
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => f.pad(&n.to_string()),
            Self::Text(s) => f.pad(s),
        }
    }
}

impl From<i64> for TransactionId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// Text is kept verbatim; nothing is parsed.
impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A payment record as seen by the admin console.
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: Option<i64>,
    pub user_name: String,
    pub total_payment: f64,
    pub payment_date: String,
    pub status: TransactionStatus,
    pub reason: Option<String>,
}

/// Validates `current.status -> next` and builds the replacement record.
///
/// Every field of `current` is carried over except `status` and, when
/// `reason` is given, `reason`. The input is never modified; on rejection
/// nothing is built and the caller must not write anything.
pub fn apply_status(
    current: &Transaction,
    next: TransactionStatus,
    reason: Option<String>,
) -> Result<Transaction, EngineError> {
    if !can_transition(current.status, next) {
        return Err(EngineError::InvalidTransition {
            from: current.status,
            to: next,
        });
    }

    let mut updated = current.clone();
    updated.status = next;
    if let Some(reason) = reason.filter(|r| !r.trim().is_empty()) {
        updated.reason = Some(reason);
    }
    Ok(updated)
}
