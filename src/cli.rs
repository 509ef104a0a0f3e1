use clap::{Parser, Subcommand};

/// Check and lock dependency versions across a pnpm monorepo
#[derive(Parser, Debug)]
#[command(name = "monodep")]
#[command(version)]
#[command(about = "Check and lock dependency versions across a pnpm monorepo", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Package manager providing the lockfile (defaults to the configured
    /// one, then pnpm)
    #[arg(short = 'p', long, global = true)]
    pub package_manager: Option<String>,

    /// Path to the workspace root (defaults to config discovery from the
    /// current directory)
    #[arg(long, global = true)]
    pub path: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report dependencies whose resolved versions diverge across packages
    Check {
        /// Restrict the check to these dependency names
        dependency_names: Vec<String>,

        /// Print only divergent dependencies (the default)
        #[arg(long, conflicts_with = "no_diff")]
        diff: bool,

        /// Print the full version tree of every dependency
        #[arg(long)]
        no_diff: bool,

        /// Rewrite manifests whose convergence target a manual lock
        /// already determines
        #[arg(long)]
        fix: bool,

        /// Only consider dependencies of these packages.
        /// Can be specified multiple times.
        #[arg(long = "include-package", value_name = "PACKAGE")]
        include_package: Vec<String>,

        /// Ignore dependencies of these packages.
        /// Can be specified multiple times.
        #[arg(long = "exclude-package", value_name = "PACKAGE")]
        exclude_package: Vec<String>,
    },

    /// Rewrite every declaring manifest to one explicit dependency version
    Lock {
        /// The dependency to lock
        dependency_name: String,

        /// The exact version to write into dependencies/devDependencies
        #[arg(short = 'v', long)]
        version: String,

        /// The version to write into peerDependencies (defaults to the
        /// configured peer version style applied to --version)
        #[arg(long = "peer-version", value_name = "VERSION")]
        peer_version: Option<String>,
    },

    /// Show or initialize the workspace configuration
    Config {
        /// Write a starter monodep.config.yml into the workspace root
        #[arg(long)]
        init: bool,
    },
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
