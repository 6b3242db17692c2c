//! Ledger engine.
//!
//! The engine applies transaction records to an [`AccountStore`], one at a time and in
//! the order supplied. Deposits and withdrawals move funds in and out of an account;
//! disputes, resolves and chargebacks move a previously recorded amount between the
//! available and held balances or remove it entirely.
//! Also supports async stream of records.

use tokio_stream::{Stream, StreamExt};
use tracing::{debug, warn};

use crate::Amount;
use crate::model::{
    CustomerId, DisputeState, RecordKind, Transaction, TransactionRecord, TxId,
};

mod config;
pub use config::{DuplicatePolicy, EngineConfig, UnfreezePolicy};

mod error;
pub use error::{LedgerError, Operation};

mod state;
pub use state::Account;

mod store;
pub use store::AccountStore;

/// The ledger engine: an account store plus the policies used to mutate it.
#[derive(Debug, Default)]
pub struct Engine {
    store: AccountStore,
    config: EngineConfig,
}

/// Public API
impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            store: AccountStore::new(),
            config,
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Run the engine over the given record stream
    pub async fn run(&mut self, mut stream: impl Stream<Item = TransactionRecord> + Unpin) {
        while let Some(record) = stream.next().await {
            // failures are logged in `apply` and never stop the run
            let _ = self.apply(record);
        }
    }

    /// Final state of every account, in no particular order.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> + '_ {
        self.store.iter()
    }

    pub fn account(&self, customer: CustomerId) -> Option<&Account> {
        self.store.get(customer)
    }

    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    /// Apply a single record on top of the current state.
    ///
    /// On error nothing has been mutated.
    pub fn apply(&mut self, record: TransactionRecord) -> Result<(), LedgerError> {
        let result = self.dispatch(&record);
        Self::log_result(&record, &result);
        result
    }
}

/// Private API
impl Engine {
    fn dispatch(&mut self, record: &TransactionRecord) -> Result<(), LedgerError> {
        let customer = record.customer();
        let kind = record.kind();
        let config = self.config;

        let account = self.store.get_or_create(customer, kind)?;

        if account.is_frozen() && kind != RecordKind::Resolve {
            return Err(LedgerError::AccountFrozen(customer));
        }

        match *record {
            TransactionRecord::Deposit { tx, amount, .. } => {
                apply_deposit(account, tx, amount, config.duplicates)
            }
            TransactionRecord::Withdraw { tx, amount, .. } => {
                apply_withdraw(account, tx, amount, config.duplicates)
            }
            TransactionRecord::Dispute { tx, .. } => apply_dispute(account, tx),
            TransactionRecord::Chargeback { tx, .. } => apply_chargeback(account, tx),
            TransactionRecord::Resolve { tx, .. } => apply_resolve(account, tx, config.unfreeze),
        }
    }

    fn log_result(record: &TransactionRecord, result: &Result<(), LedgerError>) {
        let kind = record.kind();
        let customer = record.customer();
        let tx = record.tx();
        match (result, record.amount()) {
            (Ok(()), Some(amt)) => {
                debug!(customer = %customer, tx = %tx, amount = %amt, "{kind} applied");
            }
            (Ok(()), None) => {
                debug!(customer = %customer, tx = %tx, "{kind} applied");
            }
            (Err(e), Some(amt)) => {
                warn!(
                    customer = %customer,
                    tx = %tx,
                    amount = %amt,
                    reason = %e,
                    "{kind} skipped"
                );
            }
            (Err(e), None) => {
                warn!(customer = %customer, tx = %tx, reason = %e, "{kind} skipped");
            }
        }
    }
}

fn check_duplicate(
    account: &Account,
    tx: TxId,
    policy: DuplicatePolicy,
) -> Result<(), LedgerError> {
    let Some(stored) = account.transaction(tx) else {
        return Ok(());
    };
    // a disputed or charged back entry is never replaced
    let locked = matches!(
        stored.state(),
        DisputeState::Disputed | DisputeState::ChargedBack
    );
    match policy {
        DuplicatePolicy::Overwrite if !locked => Ok(()),
        _ => Err(LedgerError::DuplicateTransaction(tx)),
    }
}

/// Apply a deposit:
/// - Reject a reused id unless duplicates overwrite and the stored entry is not disputed or charged back
/// - Credit available and total
/// - Record the transaction for later disputes
fn apply_deposit(
    account: &mut Account,
    tx: TxId,
    amount: Amount,
    duplicates: DuplicatePolicy,
) -> Result<(), LedgerError> {
    check_duplicate(account, tx, duplicates)?;

    account.credit(amount)?;
    account.record(Transaction::deposit(tx, amount));

    Ok(())
}

/// Apply a withdraw:
/// - Reject a reused id, as for deposits
/// - Ensure enough available funds
/// - Debit available and total
/// - Record the transaction (stored with a negative amount)
fn apply_withdraw(
    account: &mut Account,
    tx: TxId,
    amount: Amount,
    duplicates: DuplicatePolicy,
) -> Result<(), LedgerError> {
    check_duplicate(account, tx, duplicates)?;

    if account.available() < amount {
        return Err(LedgerError::InsufficientFunds {
            customer: account.id(),
            available: account.available(),
            requested: amount,
        });
    }

    account.debit(amount)?;
    account.record(Transaction::withdraw(tx, amount));

    Ok(())
}

/// Apply a dispute:
/// - Find the referenced transaction on this account
/// - Check it is not already disputed or charged back
/// - Ensure the disputed amount is available
/// - Move it from available to held
fn apply_dispute(account: &mut Account, tx: TxId) -> Result<(), LedgerError> {
    use Operation::Dispute;

    let transaction = account
        .transaction(tx)
        .ok_or(LedgerError::TransactionNotFound(Dispute, tx))?;

    match transaction.state() {
        DisputeState::None | DisputeState::Resolved => {}
        state => return Err(LedgerError::InvalidDisputeState(Dispute, tx, state)),
    }

    let amount = transaction.disputed_amount();
    if account.available() < amount {
        return Err(LedgerError::InsufficientFunds {
            customer: account.id(),
            available: account.available(),
            requested: amount,
        });
    }

    account.hold(amount)?;
    set_state(account, tx, DisputeState::Disputed);

    Ok(())
}

/// Apply a chargeback:
/// - Find the referenced transaction, which must be under dispute
/// - Remove the held amount from held and total
/// - Freeze the account; the transaction can never be referenced again
fn apply_chargeback(account: &mut Account, tx: TxId) -> Result<(), LedgerError> {
    use Operation::Chargeback;

    let transaction = account
        .transaction(tx)
        .ok_or(LedgerError::TransactionNotFound(Chargeback, tx))?;

    if transaction.state() != DisputeState::Disputed {
        return Err(LedgerError::InvalidDisputeState(
            Chargeback,
            tx,
            transaction.state(),
        ));
    }

    let amount = transaction.disputed_amount();
    account.charge_back(amount)?;
    set_state(account, tx, DisputeState::ChargedBack);

    Ok(())
}

/// Apply a resolve:
/// - Find the referenced transaction
/// - Ensure at least its amount is on hold
/// - Check it is under dispute
/// - Move the amount back from held to available and unfreeze per policy
fn apply_resolve(
    account: &mut Account,
    tx: TxId,
    unfreeze: UnfreezePolicy,
) -> Result<(), LedgerError> {
    use Operation::Resolve;

    let transaction = account
        .transaction(tx)
        .ok_or(LedgerError::TransactionNotFound(Resolve, tx))?;

    let amount = transaction.disputed_amount();
    if account.held() < amount {
        return Err(LedgerError::InsufficientHeldFunds {
            customer: account.id(),
            held: account.held(),
            requested: amount,
        });
    }

    if transaction.state() != DisputeState::Disputed {
        return Err(LedgerError::InvalidDisputeState(
            Resolve,
            tx,
            transaction.state(),
        ));
    }

    account.release(amount)?;
    set_state(account, tx, DisputeState::Resolved);

    let unfreeze = match unfreeze {
        UnfreezePolicy::AnyResolve => true,
        UnfreezePolicy::NeverChargedBack => account.chargebacks() == 0,
    };
    if unfreeze {
        account.unfreeze();
    }

    Ok(())
}

fn set_state(account: &mut Account, tx: TxId, state: DisputeState) {
    if let Some(transaction) = account.transaction_mut(tx) {
        transaction.set_state(state);
    }
}
