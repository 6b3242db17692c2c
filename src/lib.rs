pub mod amount;
pub mod cli;
pub mod csv;
pub mod engine;
pub mod model;

pub use amount::Amount;
pub use engine::{Account, Engine, EngineConfig, LedgerError};
pub use model::{CustomerId, RecordKind, Transaction, TransactionRecord, TxId};
