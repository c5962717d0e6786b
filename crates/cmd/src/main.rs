// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod common;

#[derive(Parser)]
#[command(author, version, about = "Operate a deskfs filesystem", long_about = None)]
#[command(name = "desk")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Filesystem root directory (defaults to $DESKFS_ROOT)
    #[arg(long, global = true)]
    root: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a filesystem with the default top-level directories
    Init,
    /// Create a directory
    Mkdir {
        path: String,
        /// Create missing parent directories
        #[arg(short, long)]
        parents: bool,
    },
    /// List a directory
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Print a subtree
    Tree {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Print file contents
    Cat { path: String },
    /// Write a file from an argument or stdin
    Write {
        path: String,
        /// Literal content; omit to read stdin
        content: Option<String>,
        /// Content-type tag stored on the file
        #[arg(long)]
        content_type: Option<String>,
        /// Create missing parent directories
        #[arg(short, long)]
        parents: bool,
    },
    /// Remove an entry
    Rm {
        path: String,
        /// Remove directories and their contents
        #[arg(short, long)]
        recursive: bool,
    },
    /// Move an entry to a new location
    Mv {
        src: String,
        dest: String,
        /// Replace an existing destination
        #[arg(long)]
        overwrite: bool,
    },
    /// Copy an entry to a new location
    Cp {
        src: String,
        dest: String,
        /// Replace an existing destination
        #[arg(long)]
        overwrite: bool,
        /// Copy link targets instead of the links themselves
        #[arg(long)]
        follow_symlinks: bool,
    },
    /// Create a symbolic link
    Ln {
        link: String,
        target: String,
        /// Create missing parent directories
        #[arg(short, long)]
        parents: bool,
    },
    /// Print a link's stored target
    Readlink { path: String },
    /// Show entry metadata
    Stat {
        path: String,
        /// Inspect the entry itself instead of what it resolves to
        #[arg(long)]
        no_follow: bool,
    },
    /// Rewrite the journal as a single snapshot record
    Compact,
}

#[tokio::main]
async fn main() -> Result<()> {
    diagnostics::init_diagnostics();
    let cli = Cli::parse();
    let root = common::resolve_root(cli.root)?;

    match cli.command {
        Commands::Init => commands::init::init_command(&root).await,
        Commands::Compact => commands::compact::compact_command(&root).await,
        command => {
            let fs = common::open_fs(&root).await?;
            match command {
                Commands::Mkdir { path, parents } => {
                    commands::mkdir::mkdir_command(&fs, &path, parents).await
                }
                Commands::Ls { path } => commands::list::list_command(&fs, &path).await,
                Commands::Tree { path } => commands::tree::tree_command(&fs, &path).await,
                Commands::Cat { path } => commands::cat::cat_command(&fs, &path).await,
                Commands::Write {
                    path,
                    content,
                    content_type,
                    parents,
                } => {
                    commands::write::write_command(&fs, &path, content, content_type, parents)
                        .await
                }
                Commands::Rm { path, recursive } => {
                    commands::remove::remove_command(&fs, &path, recursive).await
                }
                Commands::Mv {
                    src,
                    dest,
                    overwrite,
                } => commands::mv::mv_command(&fs, &src, &dest, overwrite).await,
                Commands::Cp {
                    src,
                    dest,
                    overwrite,
                    follow_symlinks,
                } => {
                    commands::copy::copy_command(&fs, &src, &dest, overwrite, follow_symlinks)
                        .await
                }
                Commands::Ln {
                    link,
                    target,
                    parents,
                } => commands::link::link_command(&fs, &link, &target, parents).await,
                Commands::Readlink { path } => {
                    commands::link::readlink_command(&fs, &path).await
                }
                Commands::Stat { path, no_follow } => {
                    commands::stat::stat_command(&fs, &path, no_follow).await
                }
                Commands::Init | Commands::Compact => unreachable!(),
            }
        }
    }
}
