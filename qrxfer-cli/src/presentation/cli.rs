use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "qrxfer CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest decoded QR records and reconstruct the original file
    Receive {
        /// Files with one scanned record per line; "-" or none reads stdin
        inputs: Vec<PathBuf>,

        /// Directory the reconstructed file is written into
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// Decryption password; prompted for interactively when the
        /// metadata fragment arrives if omitted
        #[arg(long)]
        password: Option<String>,

        /// Never prompt; treat the transfer as unencrypted unless
        /// --password was given
        #[arg(long)]
        no_prompt: bool,
    },

    /// Parse records and print an index table without decoding
    Inspect {
        /// Files with one scanned record per line; "-" or none reads stdin
        inputs: Vec<PathBuf>,
    },

    /// Split a file into scannable records (one JSON line per fragment)
    Make {
        input: PathBuf,

        /// Output path for the record lines; "-" writes stdout
        #[arg(long, default_value = "-")]
        out: PathBuf,

        /// Plaintext bytes per block, before compression
        #[arg(long, default_value_t = 1024)]
        block_size: usize,

        /// Encryption password (omit for plaintext fragments)
        #[arg(long)]
        password: Option<String>,

        /// Compression level (zstd scale; the brotli stage clamps to 0..=11)
        #[arg(long, default_value_t = 3)]
        level: i32,
    },
}
