use serde::Deserialize;

use crate::bank::error::OperationError;

/// Raw operation record as parsed from CSV input.
/// This is the unvalidated form that needs conversion to an [`Operation`].
#[derive(Debug, Deserialize, Clone)]
pub struct OperationRecord {
    #[serde(rename = "type")]
    pub op_type: OperationType,
    /// Amount as written: required for deposit/withdrawal, must be empty for interest.
    /// Kept as text so a non-numeric value surfaces as a validation error.
    pub amount: Option<String>,
}

impl std::fmt::Display for OperationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.amount {
            Some(amount) => write!(f, "{} (amount: {})", self.op_type, amount),
            None => write!(f, "{}", self.op_type),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Deposit,
    Withdrawal,
    Interest,
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationType::Deposit => write!(f, "deposit"),
            OperationType::Withdrawal => write!(f, "withdrawal"),
            OperationType::Interest => write!(f, "interest"),
        }
    }
}

/// An operation with the right shape for its type, ready for the teller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Deposit { amount: String },
    Withdrawal { amount: String },
    Interest,
}

impl TryFrom<OperationRecord> for Operation {
    type Error = OperationError;

    fn try_from(record: OperationRecord) -> Result<Self, Self::Error> {
        match record {
            OperationRecord {
                op_type: OperationType::Deposit,
                amount: Some(amount),
            } => Ok(Operation::Deposit { amount }),
            OperationRecord {
                op_type: OperationType::Withdrawal,
                amount: Some(amount),
            } => Ok(Operation::Withdrawal { amount }),
            OperationRecord {
                op_type: OperationType::Interest,
                amount: None,
            } => Ok(Operation::Interest),
            _ => Err(OperationError::InvalidOperation(record)),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Deposit { amount } => write!(f, "[deposit] amount={amount}"),
            Operation::Withdrawal { amount } => write!(f, "[withdrawal] amount={amount}"),
            Operation::Interest => write!(f, "[interest]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(op_type: OperationType, amount: Option<&str>) -> OperationRecord {
        OperationRecord {
            op_type,
            amount: amount.map(str::to_owned),
        }
    }

    #[test]
    fn test_valid_operations() {
        assert_eq!(
            Operation::try_from(make_record(OperationType::Deposit, Some("100.5"))).unwrap(),
            Operation::Deposit {
                amount: "100.5".to_owned()
            }
        );
        assert_eq!(
            Operation::try_from(make_record(OperationType::Withdrawal, Some("abc"))).unwrap(),
            Operation::Withdrawal {
                amount: "abc".to_owned()
            }
        );
        assert_eq!(
            Operation::try_from(make_record(OperationType::Interest, None)).unwrap(),
            Operation::Interest
        );
    }

    #[test]
    fn test_rejects_missing_amount() {
        assert!(Operation::try_from(make_record(OperationType::Deposit, None)).is_err());
        assert!(Operation::try_from(make_record(OperationType::Withdrawal, None)).is_err());
    }

    #[test]
    fn test_rejects_amount_on_interest() {
        let err = Operation::try_from(make_record(OperationType::Interest, Some("1"))).unwrap_err();
        assert_eq!(err.to_string(), "Invalid operation: interest (amount: 1)");
    }
}
