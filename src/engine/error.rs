//! Error types for ledger operations.

use thiserror::Error;

use crate::Amount;
use crate::model::{CustomerId, DisputeState, TxId};

/// The dispute-class operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Dispute,
    Resolve,
    Chargeback,
}

/// Error returned by [`Engine::apply`](super::Engine::apply).
///
/// Every variant is per-record: the record is skipped and the store is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("account {0} not found")]
    AccountNotFound(CustomerId),

    #[error("account {0} is frozen")]
    AccountFrozen(CustomerId),

    #[error("insufficient available funds for customer {customer}: available {available}, requested {requested}")]
    InsufficientFunds {
        customer: CustomerId,
        available: Amount,
        requested: Amount,
    },

    #[error("{0:?}: transaction {1} not found")]
    TransactionNotFound(Operation, TxId),

    #[error("insufficient held funds for customer {customer}: held {held}, requested {requested}")]
    InsufficientHeldFunds {
        customer: CustomerId,
        held: Amount,
        requested: Amount,
    },

    #[error("{0:?}: transaction {1} is in state {2:?}")]
    InvalidDisputeState(Operation, TxId, DisputeState),

    #[error("duplicate transaction id {0}")]
    DuplicateTransaction(TxId),

    #[error("balance overflow for customer {customer} applying {amount}")]
    BalanceOverflow { customer: CustomerId, amount: Amount },
}
