use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use originhash::{OriginComputer, OriginError};

#[derive(Parser)]
#[command(
    name = "originhash",
    version,
    about = "Order-independent origin hashes for directory trees and archive containers"
)]
struct Cli {
    /// Streaming chunk size in bytes (performance only, never changes the digest)
    #[arg(long, global = true)]
    chunk_size: Option<usize>,

    /// Do not follow symbolic links when walking directories
    #[arg(long, global = true)]
    no_follow_symlinks: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Hash every file under a directory, recursively
    Dir { path: PathBuf },
    /// Hash the members of an archive (zip, tar, tar.gz, tar.bz2) without extracting
    Archive { path: PathBuf },
    /// Hash one file as a raw byte stream, ignoring its name
    File { path: PathBuf },
    /// Auto-detect the source type and hash it
    Auto { path: PathBuf },
    /// Recompute a digest and compare it against an expected value
    Verify { path: PathBuf, expected: String },
}

fn run(cli: Cli) -> Result<ExitCode, OriginError> {
    let mut computer = OriginComputer::new().with_follow_symlinks(!cli.no_follow_symlinks);
    if let Some(chunk_size) = cli.chunk_size {
        computer = computer.with_chunk_size(chunk_size);
    }

    match cli.command {
        Command::Dir { path } => println!("{}", computer.compute_origin_from_directory(path)?),
        Command::Archive { path } => println!("{}", computer.compute_origin_from_archive(path)?),
        Command::File { path } => println!("{}", computer.compute_file_digest(path)?),
        Command::Auto { path } => println!("{}", computer.compute(path)?),
        Command::Verify { path, expected } => {
            if computer.verify(path, &expected)? {
                println!("OK");
            } else {
                println!("MISMATCH");
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
