use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use debug_archive::{read_archive, recover_archive, ArchiveEntry, EntryKind};

/// Inspect debug archives written by the lifecycle recorder
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every entry in an archive
    List {
        archive: PathBuf,

        /// Read whatever survived from an archive that was never finalized
        #[arg(long)]
        recover: bool,
    },
    /// Write one entry's contents to stdout
    Cat {
        archive: PathBuf,
        entry: String,

        #[arg(long)]
        recover: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();

    match args.command {
        Command::List { archive, recover } => {
            let entries = load(&archive, recover)?;
            let mut stdout = io::stdout().lock();
            for entry in &entries {
                match entry.kind {
                    EntryKind::Directory => writeln!(stdout, "{}", entry.path)?,
                    EntryKind::File => writeln!(stdout, "{}\t{}", entry.path, entry.data.len())?,
                }
            }
        }
        Command::Cat {
            archive,
            entry,
            recover,
        } => {
            let entries = load(&archive, recover)?;
            let Some(found) = entries.iter().find(|e| e.path == entry) else {
                bail!("no entry {entry} in {}", archive.display());
            };
            io::stdout().lock().write_all(&found.data)?;
        }
    }

    Ok(())
}

fn load(path: &Path, recover: bool) -> Result<Vec<ArchiveEntry>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    if !recover {
        return read_archive(file).with_context(|| {
            format!(
                "failed to read {} (pass --recover for unfinished archives)",
                path.display()
            )
        });
    }

    let recovered = recover_archive(file);
    if !recovered.complete {
        tracing::warn!(
            path = %path.display(),
            entries = recovered.entries.len(),
            "Archive was not finalized; showing recovered entries"
        );
    }
    Ok(recovered.entries)
}
