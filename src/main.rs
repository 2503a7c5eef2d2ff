use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};
use pixcode::application::encoder::PixPayloadEncoder;
use pixcode::application::service::PixService;
use pixcode::domain::identity::PaymentIdentity;
use pixcode::domain::normalize::CITY_MAX_LEN;
use pixcode::domain::ports::ConfigSourceBox;
use pixcode::infrastructure::json_file::JsonFileConfigSource;
use pixcode::interfaces::csv::identity_reader::IdentityReader;
use pixcode::interfaces::csv::payload_writer::{PayloadRecord, PayloadWriter};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::{Level, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log encoder activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Maximum length of the merchant city after normalization
    #[arg(long, global = true, default_value_t = CITY_MAX_LEN)]
    city_max_len: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the BR Code for a single payee
    Encode {
        /// Pix key (phone, e-mail, tax id or random key)
        #[arg(long)]
        key: String,

        /// Payee name
        #[arg(long, default_value = "")]
        name: String,

        /// Payee city
        #[arg(long, default_value = "")]
        city: String,

        /// Fixed amount; omit (or pass 0) to let the payer choose
        #[arg(long)]
        amount: Option<Decimal>,

        /// Reference label, defaults to ***
        #[arg(long)]
        txid: Option<String>,
    },
    /// Check a BR Code and print its fields as JSON
    Validate {
        /// The payload text
        payload: String,
    },
    /// Print the BR Code configured for the landing page
    Site {
        /// Site configuration JSON document
        config: Option<PathBuf>,

        /// Path to persistent database (optional). If provided, uses RocksDB.
        #[arg(long, conflicts_with = "config")]
        db_path: Option<PathBuf>,
    },
    /// Encode every row of a CSV file (key,name,city,amount,transaction_id)
    Batch {
        /// Input CSV file
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let encoder = PixPayloadEncoder::new().with_city_max_len(cli.city_max_len);

    match cli.command {
        Command::Encode {
            key,
            name,
            city,
            amount,
            txid,
        } => {
            let mut identity = PaymentIdentity::new(key, name, city).into_diagnostic()?;
            if let Some(amount) = amount {
                identity = identity.with_amount(amount).into_diagnostic()?;
            }
            if let Some(txid) = txid {
                identity = identity.with_transaction_id(&txid).into_diagnostic()?;
            }
            println!("{}", encoder.encode(&identity).into_diagnostic()?);
        }
        Command::Validate { payload } => {
            let decoded = encoder.decode(payload.trim()).into_diagnostic()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&decoded).into_diagnostic()?
            );
        }
        Command::Site { config, db_path } => {
            let source = open_config_source(config, db_path)?;
            let service = PixService::new(source, encoder);
            println!("{}", service.payload().await.into_diagnostic()?);
        }
        Command::Batch { input } => {
            let file = File::open(input).into_diagnostic()?;
            let reader = IdentityReader::new(file);
            let stdout = io::stdout();
            let mut writer = PayloadWriter::new(stdout.lock());

            for (index, request) in reader.requests().enumerate() {
                let row = index + 1;
                let record = match request {
                    Ok(request) => {
                        let key = request.key.clone();
                        match PaymentIdentity::try_from(request)
                            .and_then(|identity| encoder.encode(&identity))
                        {
                            Ok(payload) => PayloadRecord::encoded(row, &key, payload),
                            Err(e) => {
                                warn!(row, error = %e, "rejected row");
                                PayloadRecord::rejected(row, &key, &e)
                            }
                        }
                    }
                    Err(e) => {
                        warn!(row, error = %e, "unreadable row");
                        PayloadRecord::rejected(row, "", &e)
                    }
                };
                writer.write_record(&record).into_diagnostic()?;
            }
            writer.flush().into_diagnostic()?;
        }
    }

    Ok(())
}

fn open_config_source(
    config: Option<PathBuf>,
    db_path: Option<PathBuf>,
) -> Result<ConfigSourceBox> {
    if let Some(db_path) = db_path {
        return open_rocksdb(db_path);
    }
    match config {
        Some(path) => Ok(Box::new(JsonFileConfigSource::new(path))),
        None => Err(miette!("either a configuration file or --db-path is required")),
    }
}

#[cfg(feature = "storage-rocksdb")]
fn open_rocksdb(db_path: PathBuf) -> Result<ConfigSourceBox> {
    use pixcode::infrastructure::rocksdb::RocksDbConfigSource;

    let source = RocksDbConfigSource::open(db_path).into_diagnostic()?;
    Ok(Box::new(source))
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_rocksdb(_db_path: PathBuf) -> Result<ConfigSourceBox> {
    Err(miette!(
        "--db-path needs a build with the storage-rocksdb feature"
    ))
}
