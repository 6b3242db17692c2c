//! CSV adapters around the engine: typed records in, account report out.

use std::fs::File;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::Account;
use crate::model::{RecordKind, UnknownTransactionKind};
use crate::{Amount, CustomerId, TransactionRecord, TxId};

/// Errors that can occur when reading csv rows or writing the report
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to open {path}: {source}")]
    Open { path: String, source: csv::Error },

    #[error("line {line}: failed to parse row: {source}")]
    Malformed { line: u64, source: csv::Error },

    #[error("line {line}: {source}")]
    UnknownKind {
        line: u64,
        source: UnknownTransactionKind,
    },

    #[error("line {line}: {kind} missing amount")]
    MissingAmount { line: u64, kind: RecordKind },

    #[error("line {line}: {kind} has invalid amount {amount}")]
    InvalidAmount {
        line: u64,
        kind: RecordKind,
        amount: f64,
    },

    #[error("failed to write report: {0}")]
    Write(#[from] csv::Error),

    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// Row shape, read by position so the header names do not matter.
#[derive(Debug, Deserialize)]
struct InputRow {
    kind: String,
    customer: CustomerId,
    tx: TxId,
    #[serde(default)]
    amount: Option<f64>,
}

#[derive(Debug, Serialize)]
struct OutputRow {
    customer: CustomerId,
    available: String,
    held: String,
    total: String,
    frozen: bool,
}

/// Iterator of records read from csv, skipping the header row.
///
/// A bad row yields an error and the iterator moves on to the next one.
pub struct RecordReader<R> {
    rows: csv::StringRecordsIntoIter<R>,
}

impl RecordReader<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let path = path.as_ref();
        let reader = builder()
            .from_path(path)
            .map_err(|source| RecordError::Open {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self {
            rows: reader.into_records(),
        })
    }
}

impl<R: io::Read> RecordReader<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            rows: builder().from_reader(reader).into_records(),
        }
    }
}

impl<R: io::Read> Iterator for RecordReader<R> {
    type Item = Result<TransactionRecord, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        Some(
            row.map_err(|source| RecordError::Malformed {
                line: line_of(source.position()),
                source,
            })
            .and_then(parse_row),
        )
    }
}

/// Open a csv file of transaction records.
///
/// Failing to open the file is the only error returned here; row errors come out of the iterator.
pub fn read_records(path: impl AsRef<Path>) -> Result<RecordReader<File>, RecordError> {
    RecordReader::open(path)
}

/// Write the account report as csv, one row per account in iteration order.
pub fn write_accounts<'a, W: io::Write>(
    writer: W,
    accounts: impl IntoIterator<Item = &'a Account>,
) -> Result<(), RecordError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(["customer", "available", "held", "total", "frozen"])?;

    for account in accounts {
        writer.serialize(OutputRow {
            customer: account.id(),
            available: account.available().to_string(),
            held: account.held().to_string(),
            total: account.total().to_string(),
            frozen: account.is_frozen(),
        })?;
    }

    writer.flush()?;
    Ok(())
}

fn builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.trim(csv::Trim::All).flexible(true);
    builder
}

fn line_of(position: Option<&csv::Position>) -> u64 {
    position.map_or(0, csv::Position::line)
}

fn parse_row(row: csv::StringRecord) -> Result<TransactionRecord, RecordError> {
    let line = line_of(row.position());
    let input: InputRow = row
        .deserialize(None)
        .map_err(|source| RecordError::Malformed { line, source })?;

    let kind: RecordKind = input
        .kind
        .parse()
        .map_err(|source| RecordError::UnknownKind { line, source })?;
    let (customer, tx) = (input.customer, input.tx);

    let record = match kind {
        RecordKind::Deposit => TransactionRecord::Deposit {
            customer,
            tx,
            amount: amount(line, kind, input.amount)?,
        },
        RecordKind::Withdraw => TransactionRecord::Withdraw {
            customer,
            tx,
            amount: amount(line, kind, input.amount)?,
        },
        // any amount on these rows is ignored
        RecordKind::Dispute => TransactionRecord::Dispute { customer, tx },
        RecordKind::Chargeback => TransactionRecord::Chargeback { customer, tx },
        RecordKind::Resolve => TransactionRecord::Resolve { customer, tx },
    };
    Ok(record)
}

fn amount(line: u64, kind: RecordKind, amount: Option<f64>) -> Result<Amount, RecordError> {
    let amount = amount.ok_or(RecordError::MissingAmount { line, kind })?;
    if amount < 0.0 {
        return Err(RecordError::InvalidAmount { line, kind, amount });
    }
    Amount::try_from_float(amount).ok_or(RecordError::InvalidAmount { line, kind, amount })
}
