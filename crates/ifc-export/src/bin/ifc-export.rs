// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC export CLI
//!
//! # Usage
//!
//! ```bash
//! # STEP
//! ifc-export export --scene scene.json --output model.ifc
//!
//! # IFCX with options and an author override
//! ifc-export export --scene scene.json --output model.ifcx --options options.json --author "J. Doe"
//! ```
//!
//! Logging follows `RUST_LOG` (default `info`).

use clap::{Parser, Subcommand};
use ifc_export::{ExportOptions, ExportSession, LogPing, Scene};
use ifc_export_model::Registry;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "ifc-export")]
#[command(about = "Export scene descriptions as IFC STEP or IFCX files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a scene
    Export {
        /// Scene JSON file
        #[arg(short, long)]
        scene: PathBuf,

        /// Destination, `.ifc` or `.ifcx`
        #[arg(short, long)]
        output: PathBuf,

        /// Options JSON file
        #[arg(long)]
        options: Option<PathBuf>,

        /// Author written to the file header
        #[arg(long)]
        author: Option<String>,

        /// Do not log a usage line after export
        #[arg(long)]
        no_ping: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Export {
            scene,
            output,
            options,
            author,
            no_ping,
        } => match export(scene, output, options, author, no_ping) {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

/// Returns whether the export succeeded
fn export(
    scene: PathBuf,
    output: PathBuf,
    options: Option<PathBuf>,
    author: Option<String>,
    no_ping: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    let mut options = match options {
        Some(path) => ExportOptions::from_file(path)?,
        None => ExportOptions::default(),
    };
    if let Some(author) = author {
        options.author = author;
    }

    let scene = Scene::from_file(&scene)?;
    let mut session = ExportSession::new(Registry::ifc4()?, options);
    if !no_ping {
        session = session.with_ping(Arc::new(LogPing));
    }
    // A population failure is carried into the summary below
    let _ = session.populate(&scene);

    let summary = session.export(&output);
    print!("{}", summary);
    Ok(summary.is_success())
}
