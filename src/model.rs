//! Core domain types for the ledger.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::Amount;

/// Customer identifier.
pub type CustomerId = u16;

/// Transaction identifier, unique within its owning account.
pub type TxId = u32;

/// The five record kinds the ledger understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Deposit,
    Withdraw,
    Dispute,
    Chargeback,
    Resolve,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Deposit => "deposit",
            RecordKind::Withdraw => "withdraw",
            RecordKind::Dispute => "dispute",
            RecordKind::Chargeback => "chargeback",
            RecordKind::Resolve => "resolve",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a record's type column names no known kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transaction kind '{0}'")]
pub struct UnknownTransactionKind(pub String);

impl FromStr for RecordKind {
    type Err = UnknownTransactionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deposit" => Ok(RecordKind::Deposit),
            "withdraw" | "withdrawal" => Ok(RecordKind::Withdraw),
            "dispute" => Ok(RecordKind::Dispute),
            "chargeback" => Ok(RecordKind::Chargeback),
            "resolve" => Ok(RecordKind::Resolve),
            _ => Err(UnknownTransactionKind(s.to_string())),
        }
    }
}

/// A typed input record, as fed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionRecord {
    /// Credit funds to a customer's available balance, opening the account if needed.
    Deposit {
        customer: CustomerId,
        tx: TxId,
        amount: Amount,
    },
    /// Debit funds from a customer's available balance.
    Withdraw {
        customer: CustomerId,
        tx: TxId,
        amount: Amount,
    },
    /// Move the referenced transaction's amount from available to held.
    Dispute { customer: CustomerId, tx: TxId },
    /// Remove disputed funds for good and freeze the account.
    Chargeback { customer: CustomerId, tx: TxId },
    /// Release disputed funds back to available.
    Resolve { customer: CustomerId, tx: TxId },
}

impl TransactionRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            TransactionRecord::Deposit { .. } => RecordKind::Deposit,
            TransactionRecord::Withdraw { .. } => RecordKind::Withdraw,
            TransactionRecord::Dispute { .. } => RecordKind::Dispute,
            TransactionRecord::Chargeback { .. } => RecordKind::Chargeback,
            TransactionRecord::Resolve { .. } => RecordKind::Resolve,
        }
    }

    pub fn customer(&self) -> CustomerId {
        match self {
            TransactionRecord::Deposit { customer, .. }
            | TransactionRecord::Withdraw { customer, .. }
            | TransactionRecord::Dispute { customer, .. }
            | TransactionRecord::Chargeback { customer, .. }
            | TransactionRecord::Resolve { customer, .. } => *customer,
        }
    }

    pub fn tx(&self) -> TxId {
        match self {
            TransactionRecord::Deposit { tx, .. }
            | TransactionRecord::Withdraw { tx, .. }
            | TransactionRecord::Dispute { tx, .. }
            | TransactionRecord::Chargeback { tx, .. }
            | TransactionRecord::Resolve { tx, .. } => *tx,
        }
    }

    pub fn amount(&self) -> Option<Amount> {
        match self {
            TransactionRecord::Deposit { amount, .. }
            | TransactionRecord::Withdraw { amount, .. } => Some(*amount),
            _ => None,
        }
    }
}

/// Kind of a stored, disputable transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Deposit,
    Withdraw,
}

/// Where a stored transaction sits in the dispute lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisputeState {
    /// Never disputed.
    #[default]
    None,
    /// Funds are currently held.
    Disputed,
    /// A dispute was resolved; the transaction can be disputed again.
    Resolved,
    /// Terminal.
    ChargedBack,
}

/// A deposit or withdraw recorded on an account.
///
/// `id`, `kind` and `amount` never change once stored; only `state` moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    id: TxId,
    kind: TransactionKind,
    /// Signed: positive for deposits, negative for withdrawals.
    amount: Amount,
    state: DisputeState,
}

impl Transaction {
    pub fn deposit(id: TxId, amount: Amount) -> Self {
        Self {
            id,
            kind: TransactionKind::Deposit,
            amount,
            state: DisputeState::None,
        }
    }

    pub fn withdraw(id: TxId, amount: Amount) -> Self {
        Self {
            id,
            kind: TransactionKind::Withdraw,
            amount: -amount,
            state: DisputeState::None,
        }
    }

    pub fn id(&self) -> TxId {
        self.id
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Amount moved between available and held when this transaction is disputed.
    pub fn disputed_amount(&self) -> Amount {
        self.amount.abs()
    }

    pub fn state(&self) -> DisputeState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: DisputeState) {
        self.state = state;
    }
}
