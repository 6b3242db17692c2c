use std::io;
use std::process::ExitCode;

use clap::Parser;
use ledger_eng::Engine;
use ledger_eng::cli::Args;
use ledger_eng::csv::{read_records, write_accounts};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if args.input.extension().is_none_or(|ext| ext != "csv") {
        warn!(path = %args.input.display(), "input file seems to not be a csv file");
    }

    let records = match read_records(&args.input) {
        Ok(records) => records,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut engine = Engine::with_config(args.engine_config());
    let (record_sender, record_receiver) = tokio::sync::mpsc::channel(16);

    let reader = tokio::task::spawn_blocking(move || {
        for result in records {
            match result {
                Ok(record) => {
                    if record_sender.blocking_send(record).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    engine.run(ReceiverStream::new(record_receiver)).await;

    if let Err(e) = reader.await {
        error!("record reader failed: {e}");
        return ExitCode::FAILURE;
    }

    if let Err(e) = write_accounts(io::stdout().lock(), engine.accounts()) {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
