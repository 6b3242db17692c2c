use std::collections::HashMap;

use super::LedgerError;
use crate::Amount;
use crate::model::{CustomerId, Transaction, TxId};

/// A customer account: balances, frozen flag and the transactions it owns.
///
/// Every mutator keeps `total == available + held`.
#[derive(Debug, Clone)]
pub struct Account {
    id: CustomerId,
    available: Amount,
    held: Amount,
    total: Amount,
    frozen: bool,
    chargebacks: u32,
    transactions: HashMap<TxId, Transaction>,
}

impl Account {
    pub fn new(id: CustomerId) -> Self {
        Self {
            id,
            available: Amount::ZERO,
            held: Amount::ZERO,
            total: Amount::ZERO,
            frozen: false,
            chargebacks: 0,
            transactions: HashMap::new(),
        }
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn available(&self) -> Amount {
        self.available
    }

    pub fn held(&self) -> Amount {
        self.held
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Number of transactions charged back on this account.
    pub fn chargebacks(&self) -> u32 {
        self.chargebacks
    }

    pub fn transaction(&self, tx: TxId) -> Option<&Transaction> {
        self.transactions.get(&tx)
    }

    pub(crate) fn transaction_mut(&mut self, tx: TxId) -> Option<&mut Transaction> {
        self.transactions.get_mut(&tx)
    }

    pub(crate) fn record(&mut self, transaction: Transaction) {
        self.transactions.insert(transaction.id(), transaction);
    }

    pub(crate) fn credit(&mut self, amount: Amount) -> Result<(), LedgerError> {
        let available = self.add(self.available, amount)?;
        let total = self.add(self.total, amount)?;
        self.available = available;
        self.total = total;
        Ok(())
    }

    pub(crate) fn debit(&mut self, amount: Amount) -> Result<(), LedgerError> {
        let available = self.sub(self.available, amount)?;
        let total = self.sub(self.total, amount)?;
        self.available = available;
        self.total = total;
        Ok(())
    }

    /// available -> held
    pub(crate) fn hold(&mut self, amount: Amount) -> Result<(), LedgerError> {
        let available = self.sub(self.available, amount)?;
        let held = self.add(self.held, amount)?;
        self.available = available;
        self.held = held;
        Ok(())
    }

    /// held -> available
    pub(crate) fn release(&mut self, amount: Amount) -> Result<(), LedgerError> {
        let held = self.sub(self.held, amount)?;
        let available = self.add(self.available, amount)?;
        self.held = held;
        self.available = available;
        Ok(())
    }

    /// Drop held funds from the account and freeze it.
    pub(crate) fn charge_back(&mut self, amount: Amount) -> Result<(), LedgerError> {
        let held = self.sub(self.held, amount)?;
        let total = self.sub(self.total, amount)?;
        self.held = held;
        self.total = total;
        self.chargebacks += 1;
        self.frozen = true;
        Ok(())
    }

    pub(crate) fn unfreeze(&mut self) {
        self.frozen = false;
    }

    fn add(&self, balance: Amount, amount: Amount) -> Result<Amount, LedgerError> {
        balance.checked_add(amount).ok_or_else(|| self.overflow(amount))
    }

    fn sub(&self, balance: Amount, amount: Amount) -> Result<Amount, LedgerError> {
        balance.checked_sub(amount).ok_or_else(|| self.overflow(amount))
    }

    fn overflow(&self, amount: Amount) -> LedgerError {
        LedgerError::BalanceOverflow {
            customer: self.id,
            amount,
        }
    }
}
