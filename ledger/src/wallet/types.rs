//! # Wallet Types
//!
//! The wire shapes accepted and returned by the service, and the validated
//! records the handler actually works with. Deserialization is deliberately
//! loose ([`OperationPayload`] takes strings) so that every validation
//! failure surfaces as a precise [`WalletError::InvalidRequest`] instead of
//! a generic decoding error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::WalletError;
use crate::config::{OP_DEPOSIT, OP_WITHDRAW};

// ---------------------------------------------------------------------------
// Wallet
// ---------------------------------------------------------------------------

/// A wallet as seen by readers: its identifier and current balance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub wallet_id: Uuid,
    pub balance: f64,
}

// ---------------------------------------------------------------------------
// Operation Kind
// ---------------------------------------------------------------------------

/// The two balance mutations the service supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Increase the balance, creating the wallet if it does not exist.
    Deposit,
    /// Decrease the balance. Never creates a wallet.
    Withdraw,
}

impl OperationKind {
    /// The exact string used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Deposit => OP_DEPOSIT,
            OperationKind::Withdraw => OP_WITHDRAW,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = WalletError;

    /// Matching is exact and case-sensitive: `"deposit"` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            OP_DEPOSIT => Ok(OperationKind::Deposit),
            OP_WITHDRAW => Ok(OperationKind::Withdraw),
            other => Err(WalletError::InvalidRequest(format!(
                "unknown operation type: {other:?}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Raw body of `POST /api/v1/wallet`, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationPayload {
    pub wallet_id: String,
    pub operation_type: String,
    pub amount: f64,
}

/// A validated operation, ready to be applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperationRequest {
    pub wallet_id: Uuid,
    pub kind: OperationKind,
    pub amount: f64,
}

impl OperationRequest {
    /// Builds a request, enforcing the amount rules.
    ///
    /// Amounts must be finite and non-negative. Zero is allowed.
    pub fn new(wallet_id: Uuid, kind: OperationKind, amount: f64) -> Result<Self, WalletError> {
        if !amount.is_finite() {
            return Err(WalletError::InvalidRequest(format!(
                "amount must be a finite number, got {amount}"
            )));
        }
        if amount < 0.0 {
            return Err(WalletError::InvalidRequest(format!(
                "amount must not be negative, got {amount}"
            )));
        }
        Ok(Self {
            wallet_id,
            kind,
            amount,
        })
    }

    pub fn deposit(wallet_id: Uuid, amount: f64) -> Result<Self, WalletError> {
        Self::new(wallet_id, OperationKind::Deposit, amount)
    }

    pub fn withdraw(wallet_id: Uuid, amount: f64) -> Result<Self, WalletError> {
        Self::new(wallet_id, OperationKind::Withdraw, amount)
    }
}

impl TryFrom<OperationPayload> for OperationRequest {
    type Error = WalletError;

    fn try_from(payload: OperationPayload) -> Result<Self, Self::Error> {
        let kind: OperationKind = payload.operation_type.parse()?;
        let wallet_id = parse_wallet_id(&payload.wallet_id)?;
        OperationRequest::new(wallet_id, kind, payload.amount)
    }
}

/// Parses a wallet identifier, mapping failures to `InvalidRequest`.
pub fn parse_wallet_id(raw: &str) -> Result<Uuid, WalletError> {
    Uuid::parse_str(raw.trim())
        .map_err(|e| WalletError::InvalidRequest(format!("invalid wallet id {raw:?}: {e}")))
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of a successfully committed operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperationOutcome {
    pub wallet_id: Uuid,
    /// Balance before the operation; `None` if this operation created the wallet.
    pub previous_balance: Option<f64>,
    /// Balance after the operation.
    pub balance: f64,
}

impl OperationOutcome {
    pub fn created(&self) -> bool {
        self.previous_balance.is_none()
    }

    /// Human-readable confirmation returned to HTTP callers.
    pub fn confirmation(&self) -> String {
        if self.created() {
            format!("Wallet created and funded. New balance: {:.2}", self.balance)
        } else {
            format!(
                "Operation completed successfully. New balance: {:.2}",
                self.balance
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(wallet_id: &str, operation_type: &str, amount: f64) -> OperationPayload {
        OperationPayload {
            wallet_id: wallet_id.into(),
            operation_type: operation_type.into(),
            amount,
        }
    }

    #[test]
    fn parses_camel_case_body() {
        let id = Uuid::new_v4();
        let body = format!(
            r#"{{"walletId":"{id}","operationType":"DEPOSIT","amount":100}}"#
        );
        let payload: OperationPayload = serde_json::from_str(&body).unwrap();
        let req = OperationRequest::try_from(payload).unwrap();
        assert_eq!(req.wallet_id, id);
        assert_eq!(req.kind, OperationKind::Deposit);
        assert_eq!(req.amount, 100.0);
    }

    #[test]
    fn rejects_unknown_operation_type() {
        let err = OperationRequest::try_from(payload(
            &Uuid::new_v4().to_string(),
            "TRANSFER",
            10.0,
        ))
        .unwrap_err();
        assert!(matches!(err, WalletError::InvalidRequest(ref m) if m.contains("TRANSFER")));
    }

    #[test]
    fn operation_type_is_case_sensitive() {
        assert!("deposit".parse::<OperationKind>().is_err());
        assert_eq!(
            "WITHDRAW".parse::<OperationKind>().unwrap(),
            OperationKind::Withdraw
        );
    }

    #[test]
    fn rejects_malformed_wallet_id() {
        let err = OperationRequest::try_from(payload("not-a-uuid", "DEPOSIT", 1.0)).unwrap_err();
        assert!(matches!(err, WalletError::InvalidRequest(_)));
    }

    #[test]
    fn rejects_negative_and_non_finite_amounts() {
        let id = Uuid::new_v4();
        assert!(OperationRequest::deposit(id, -5.0).is_err());
        assert!(OperationRequest::withdraw(id, f64::NAN).is_err());
        assert!(OperationRequest::deposit(id, f64::INFINITY).is_err());
        assert!(OperationRequest::deposit(id, 0.0).is_ok());
    }

    #[test]
    fn wallet_serializes_with_camel_case_keys() {
        let wallet = Wallet {
            wallet_id: Uuid::nil(),
            balance: 70.0,
        };
        let json = serde_json::to_value(wallet).unwrap();
        assert_eq!(json["walletId"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["balance"], 70.0);
    }

    #[test]
    fn confirmation_distinguishes_creation() {
        let id = Uuid::new_v4();
        let created = OperationOutcome {
            wallet_id: id,
            previous_balance: None,
            balance: 100.0,
        };
        let updated = OperationOutcome {
            wallet_id: id,
            previous_balance: Some(100.0),
            balance: 70.0,
        };
        assert_eq!(
            created.confirmation(),
            "Wallet created and funded. New balance: 100.00"
        );
        assert!(updated.confirmation().ends_with("New balance: 70.00"));
    }
}
