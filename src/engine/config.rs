//! Engine policies for the behaviors that have more than one defensible answer.

use clap::ValueEnum;

/// When a successful resolve clears an account's frozen flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum UnfreezePolicy {
    /// Every successful resolve unfreezes the account.
    #[default]
    AnyResolve,
    /// Only unfreeze an account that has never had a transaction charged back.
    NeverChargedBack,
}

/// What a deposit or withdraw does when its id is already stored on the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DuplicatePolicy {
    /// Skip the record with `DuplicateTransaction`.
    #[default]
    Reject,
    /// Apply the record and replace the stored transaction.
    Overwrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineConfig {
    pub unfreeze: UnfreezePolicy,
    pub duplicates: DuplicatePolicy,
}
