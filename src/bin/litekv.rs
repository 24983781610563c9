//! litekv binary
//!
//! Writes stores into the shared region, reads them back out, and runs the
//! writer → reader round trip end to end.

use std::path::PathBuf;
use std::thread;

use clap::{Parser, Subcommand};
use litekv::channel::{self, MmapChannel};
use litekv::{Config, LiteError, Result, Store};
use tracing_subscriber::{fmt, EnvFilter};

/// Pairs written by `demo`
const DEMO_PAIRS: [(&str, &str); 4] = [
    ("foo", "bar"),
    ("foo2", "bar2"),
    ("foo3", "bar3"),
    ("foo4", "bar4"),
];

/// Keys read back by `demo`
const DEMO_READS: [&str; 4] = ["foo", "foo3", "foo2", "missing"];

/// litekv shared-memory key-value store
#[derive(Parser, Debug)]
#[command(name = "litekv")]
#[command(about = "Pass a key-value store between processes through shared memory")]
#[command(version)]
struct Args {
    /// File backing the shared region
    #[arg(short, long, default_value = "/dev/shm/litekv_region")]
    region: PathBuf,

    /// Lock file guarding the region
    #[arg(short, long, default_value = "/dev/shm/litekv.lock")]
    lock: PathBuf,

    /// Region capacity in bytes
    #[arg(short, long, default_value_t = litekv::DEFAULT_CAPACITY)]
    capacity: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write sample pairs, pass them through the region, read them back
    Demo {
        /// Keep the region and lock files afterwards
        #[arg(long)]
        keep: bool,
    },

    /// Build a store from KEY=VALUE pairs and publish it to the region
    Write {
        /// Pairs in write order; a repeated key keeps its last value
        #[arg(value_parser = parse_pair, required = true)]
        pairs: Vec<(String, String)>,
    },

    /// Receive a store from the region and look up keys
    Read {
        /// Number of meaningful bytes in the region (printed by `write`)
        #[arg(short = 'n', long)]
        len: usize,

        /// Keys to look up
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// List every record in the region, live and superseded
    Dump {
        /// Number of meaningful bytes in the region (printed by `write`)
        #[arg(short = 'n', long)]
        len: usize,
    },

    /// Delete the region and lock files
    Remove,
}

fn main() {
    // Logs go to stderr; stdout carries command output
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,litekv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("litekv v{}", litekv::VERSION);

    let config = Config::builder()
        .region_path(&args.region)
        .lock_path(&args.lock)
        .capacity(args.capacity)
        .build();

    if let Err(e) = run(args.command, config) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Demo { keep } => run_demo(config, keep),
        Commands::Write { pairs } => run_write(config, &pairs),
        Commands::Read { len, keys } => run_read(config, len, &keys),
        Commands::Dump { len } => run_dump(config, len),
        Commands::Remove => MmapChannel::open(config)?.remove(),
    }
}

/// Writer and reader run on separate threads, each with its own handle on
/// the region, the way two processes would. The writer hands over the
/// payload length through a crossbeam channel.
fn run_demo(config: Config, keep: bool) -> Result<()> {
    let (len_tx, len_rx) = crossbeam::channel::bounded::<usize>(1);

    let writer_config = config.clone();
    let writer = thread::spawn(move || -> Result<u32> {
        let mut store = Store::new();
        for (key, value) in DEMO_PAIRS {
            store.write(key.as_bytes(), value.as_bytes())?;
        }

        let shm = MmapChannel::open(writer_config)?;
        let len = channel::publish(&shm, &store)?;
        tracing::info!(len, keys = store.key_count(), "writer published store");

        // The reader only goes away if it already failed
        let _ = len_tx.send(len);
        Ok(store.checksum())
    });

    let published = len_rx.recv();
    let writer_checksum = match writer.join() {
        Ok(result) => result?,
        Err(_) => return Err(std::io::Error::other("writer thread panicked").into()),
    };
    let len = published
        .map_err(|_| std::io::Error::other("writer finished without publishing"))?;

    let shm = MmapChannel::open(config)?;
    let mut reader = channel::fetch(&shm, len)?;
    tracing::info!(len = reader.len(), "reader copied region");

    let report = reader.rebuild_index()?;
    tracing::info!(
        records = report.records_scanned,
        keys = report.distinct_keys,
        "reader rebuilt index"
    );

    if reader.checksum() != writer_checksum {
        tracing::warn!(
            writer = writer_checksum,
            reader = reader.checksum(),
            "buffer changed in transit"
        );
    }

    for key in DEMO_READS {
        print_lookup(&reader, key)?;
    }

    if keep {
        tracing::info!(region = %shm.config().region_path.display(), "keeping region");
        Ok(())
    } else {
        shm.remove()
    }
}

fn run_write(config: Config, pairs: &[(String, String)]) -> Result<()> {
    let mut store = Store::new();
    for (key, value) in pairs {
        store.write(key.as_bytes(), value.as_bytes())?;
    }

    let shm = MmapChannel::open(config)?;
    let len = channel::publish(&shm, &store)?;
    tracing::info!(
        len,
        keys = store.key_count(),
        checksum = store.checksum(),
        "published store"
    );

    println!("{}", len);
    Ok(())
}

fn run_read(config: Config, len: usize, keys: &[String]) -> Result<()> {
    let shm = MmapChannel::open(config)?;
    let store = channel::receive(&shm, len)?;
    tracing::info!(len, keys = store.key_count(), "received store");

    for key in keys {
        print_lookup(&store, key)?;
    }
    Ok(())
}

fn run_dump(config: Config, len: usize) -> Result<()> {
    let shm = MmapChannel::open(config)?;
    let mut store = channel::fetch(&shm, len)?;

    // Still list what decodes if the buffer is damaged, then report it
    let rebuilt = store.rebuild_index();
    match &rebuilt {
        Ok(report) => tracing::info!(
            records = report.records_scanned,
            keys = report.distinct_keys,
            superseded = report.records_superseded,
            "scanned region"
        ),
        Err(e) => tracing::warn!(error = %e, "region is malformed, listing records before the damage"),
    }

    for item in store.records() {
        let (offset, record) = match item {
            Ok(entry) => entry,
            Err(_) => break,
        };

        let state = match &rebuilt {
            Err(_) => "?",
            Ok(_) if store.index().get(record.key) == Some(offset) => "live",
            Ok(_) => "superseded",
        };

        println!(
            "{:>8}  {:<10}  {} = {}",
            offset,
            state,
            String::from_utf8_lossy(record.key),
            String::from_utf8_lossy(record.value)
        );
    }

    rebuilt.map(|_| ())
}

/// Print `key = value`, or note the key is absent
fn print_lookup(store: &Store, key: &str) -> Result<()> {
    match store.read(key.as_bytes()) {
        Ok(value) => println!("{} = {}", key, String::from_utf8_lossy(value)),
        Err(LiteError::KeyNotFound) => println!("{}: key not found", key),
        Err(e) => return Err(e),
    }
    Ok(())
}

/// Parse a `KEY=VALUE` argument; the value may itself contain `=`
fn parse_pair(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{}`", s))?;
    Ok((key.to_string(), value.to_string()))
}
