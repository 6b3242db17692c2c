use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::error::LedgerError;
use super::state::Account;
use crate::model::{CustomerId, RecordKind};

/// Owns every account, keyed by customer id.
///
/// Accounts are only ever opened by a deposit and are never removed.
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: HashMap<CustomerId, Account>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the customer's account, opening a fresh one only for a deposit.
    pub fn get_or_create(
        &mut self,
        customer: CustomerId,
        kind: RecordKind,
    ) -> Result<&mut Account, LedgerError> {
        match self.accounts.entry(customer) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) if kind == RecordKind::Deposit => {
                Ok(entry.insert(Account::new(customer)))
            }
            Entry::Vacant(_) => Err(LedgerError::AccountNotFound(customer)),
        }
    }

    pub fn get(&self, customer: CustomerId) -> Option<&Account> {
        self.accounts.get(&customer)
    }

    /// Accounts in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Account> + '_ {
        self.accounts.values()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
