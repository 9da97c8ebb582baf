//! gitpeek CLI - inspect the loose objects of a git repository

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use walkdir::WalkDir;

use gitpeek::{
    head_branch, is_loose_object, read_info, read_object_by_id, resolve_head, GitDir, Object,
    ObjectId,
};

#[derive(Parser)]
#[command(name = "gitpeek")]
#[command(about = "inspect the loose objects of a git repository")]
#[command(version)]
struct Cli {
    /// any path inside the repository (working tree or .git)
    #[arg(short = 'C', long, default_value = ".")]
    repo: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// decode and print an object
    CatFile {
        /// object id (40-char hex)
        object: String,

        /// print the decoded object as json
        #[arg(long)]
        json: bool,
    },

    /// list the entries of a tree object
    LsTree {
        /// tree object id (40-char hex)
        object: String,

        /// print the entries as json
        #[arg(long)]
        json: bool,
    },

    /// show the current branch and its commit
    Head,

    /// walk the object store and list every loose object
    Scan {
        /// directory to scan instead of the repository's object store
        path: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> gitpeek::Result<()> {
    let cwd = std::env::current_dir().map_err(|e| gitpeek::Error::Io {
        path: PathBuf::from("."),
        source: e,
    })?;
    let repo = GitDir::discover(&cli.repo, &cwd)?;

    match cli.command {
        Commands::CatFile { object, json } => {
            let id = ObjectId::from_hex(&object)?;
            let decoded = read_object_by_id(&repo, &id)?;

            if json {
                println!("{}", to_json(&decoded)?);
            } else {
                match decoded {
                    Object::Blob { content, .. } => print!("{}", content),
                    Object::Commit { content, .. } => print!("{}", content),
                    Object::Tree { entries, .. } => {
                        for entry in entries {
                            println!("{}", entry);
                        }
                    }
                    Object::Raw(info) => {
                        println!(
                            "{} {}",
                            info.kind,
                            info.size.map_or_else(|| "?".to_string(), |s| s.to_string())
                        );
                    }
                }
            }
        }

        Commands::LsTree { object, json } => {
            let id = ObjectId::from_hex(&object)?;

            match read_object_by_id(&repo, &id)? {
                Object::Tree { entries, .. } => {
                    if json {
                        println!("{}", to_json(&entries)?);
                    } else {
                        for entry in entries {
                            println!("{}", entry);
                        }
                    }
                }
                _ => return Err(gitpeek::Error::NotATree(id)),
            }
        }

        Commands::Head => {
            let branch = head_branch(&repo)?;
            let id = resolve_head(&repo)?;
            println!("{} {}", branch, id);
        }

        Commands::Scan { path } => {
            let root = path.unwrap_or_else(|| repo.objects_dir());

            for entry in WalkDir::new(&root).sort_by_file_name() {
                let entry = entry.map_err(|e| gitpeek::Error::Io {
                    path: root.clone(),
                    source: e.into(),
                })?;

                if !entry.file_type().is_file() || !is_loose_object(entry.path()) {
                    continue;
                }

                let info = read_info(entry.path())?;
                println!(
                    "{} {} {}",
                    info.id.map_or_else(|| "?".to_string(), |id| id.to_hex()),
                    info.kind,
                    info.size.map_or_else(|| "?".to_string(), |s| s.to_string())
                );
            }
        }
    }

    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> gitpeek::Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| gitpeek::Error::Io {
        path: PathBuf::from("<json>"),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })
}
