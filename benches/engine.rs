use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ledger_eng::csv::RecordReader;
use ledger_eng::{Amount, CustomerId, Engine, TransactionRecord, TxId};

/// Produces a valid ledger history, cycling through customers.
///
/// Every customer repeats: deposit 100, deposit 50, withdraw 30, and every
/// `dispute_every`-th cycle disputes and resolves that cycle's first deposit.
/// Nothing it produces is rejected by the engine.
pub struct LedgerHistory {
    customers: CustomerId,
    remaining: u64,
    dispute_every: u32,
    step: u32,
    cycle: u32,
    customer: CustomerId,
    next_tx: TxId,
    cycle_deposit: TxId,
}

impl LedgerHistory {
    pub fn new(customers: CustomerId, records: u64, dispute_every: u32) -> Self {
        Self {
            customers,
            remaining: records,
            dispute_every,
            step: 0,
            cycle: 0,
            customer: 1,
            next_tx: 1,
            cycle_deposit: 0,
        }
    }

    fn fresh_tx(&mut self) -> TxId {
        let tx = self.next_tx;
        self.next_tx += 1;
        tx
    }

    fn disputing(&self) -> bool {
        self.dispute_every > 0 && self.cycle % self.dispute_every == 0
    }

    fn end_cycle(&mut self) {
        self.step = 0;
        self.customer = self.customer % self.customers + 1;
        if self.customer == 1 {
            self.cycle += 1;
        }
    }
}

impl Iterator for LedgerHistory {
    type Item = TransactionRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let customer = self.customer;
        let record = match self.step {
            0 => {
                self.cycle_deposit = self.fresh_tx();
                TransactionRecord::Deposit {
                    customer,
                    tx: self.cycle_deposit,
                    amount: Amount::from_scaled(1_000_000),
                }
            }
            1 => TransactionRecord::Deposit {
                customer,
                tx: self.fresh_tx(),
                amount: Amount::from_scaled(500_000),
            },
            2 => TransactionRecord::Withdraw {
                customer,
                tx: self.fresh_tx(),
                amount: Amount::from_scaled(300_000),
            },
            3 => TransactionRecord::Dispute {
                customer,
                tx: self.cycle_deposit,
            },
            _ => TransactionRecord::Resolve {
                customer,
                tx: self.cycle_deposit,
            },
        };

        self.step += 1;
        let cycle_len = if self.disputing() { 5 } else { 3 };
        if self.step >= cycle_len {
            self.end_cycle();
        }

        Some(record)
    }
}

fn apply_all(records: impl Iterator<Item = TransactionRecord>) -> Engine {
    let mut engine = Engine::new();
    for record in records {
        let _ = black_box(engine.apply(record));
    }
    engine
}

fn bench_single_customer(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_customer");

    for count in [10_000u64, 100_000, 1_000_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| apply_all(LedgerHistory::new(1, count, 0)));
        });
    }

    group.finish();
}

fn bench_many_customers(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_customers");

    for customers in [10u16, 1_000, u16::MAX] {
        group.bench_with_input(
            BenchmarkId::from_parameter(customers),
            &customers,
            |b, &customers| {
                b.iter(|| apply_all(LedgerHistory::new(customers, 100_000, 0)));
            },
        );
    }

    group.finish();
}

fn bench_disputes(c: &mut Criterion) {
    let mut group = c.benchmark_group("disputes");

    for every in [1u32, 10, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(every), &every, |b, &every| {
            b.iter(|| apply_all(LedgerHistory::new(100, 100_000, every)));
        });
    }

    group.finish();
}

fn bench_csv_pipeline(c: &mut Criterion) {
    let mut input = String::from("type,customer,tx,amount\n");
    for record in LedgerHistory::new(100, 100_000, 10) {
        let line = match record {
            TransactionRecord::Deposit { customer, tx, amount } => {
                format!("deposit,{customer},{tx},{amount}\n")
            }
            TransactionRecord::Withdraw { customer, tx, amount } => {
                format!("withdraw,{customer},{tx},{amount}\n")
            }
            TransactionRecord::Dispute { customer, tx } => format!("dispute,{customer},{tx},\n"),
            TransactionRecord::Resolve { customer, tx } => format!("resolve,{customer},{tx},\n"),
            TransactionRecord::Chargeback { customer, tx } => {
                format!("chargeback,{customer},{tx},\n")
            }
        };
        input.push_str(&line);
    }

    c.bench_function("csv_pipeline_100k", |b| {
        b.iter(|| {
            let records = RecordReader::from_reader(input.as_bytes()).filter_map(Result::ok);
            apply_all(records)
        });
    });
}

criterion_group!(
    benches,
    bench_single_customer,
    bench_many_customers,
    bench_disputes,
    bench_csv_pipeline,
);

criterion_main!(benches);
