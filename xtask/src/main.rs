// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! - `cargo xtask ci`: clippy, docs, formatting, unused dependencies, build
//!   and test
//! - `cargo xtask check-backend`: confirm an evaluation backend serves the
//!   catalog and metrics routes
//! - `cargo xtask serve`: check the backend, then run `senti-dash-server`
//!   against it
//!
//! The test suites stub the backend in-process, so `ci` needs no services.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{fmt::Debug, io, process::Output};

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{eyre::Context, Result};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

/// Backend the server talks to unless told otherwise.
const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Backend routes the server reads, relative to the base URL. Both catalog
/// layouts serve the unfiltered lists here.
const BACKEND_ROUTES: [&str; 4] = [
    "catalog/departments",
    "catalog/professors",
    "catalog/courses",
    "api/dashboard/metrics",
];

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err:#}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, unused dependencies, build, test)
    CI,

    /// Build every target
    #[command(visible_alias = "b")]
    Build,

    /// Check that an evaluation backend answers the routes the server uses
    #[command(visible_alias = "cb")]
    CheckBackend {
        /// Base URL of the catalog and metrics backend
        #[arg(long, default_value = DEFAULT_BACKEND_URL)]
        backend_url: String,
    },

    /// Check for unused dependencies
    #[command(visible_alias = "m")]
    Machete,

    /// Lint clippy, docs and formatting
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy with warnings denied
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Build docs with warnings denied
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check formatting
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Apply formatting
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run every test, doc tests included
    #[command(visible_alias = "t")]
    Test,

    /// Run the dashboard server against an evaluation backend
    #[command(visible_alias = "s")]
    Serve {
        /// Base URL of the catalog and metrics backend
        #[arg(long, default_value = DEFAULT_BACKEND_URL)]
        backend_url: String,

        /// Port for the dashboard server
        #[arg(long, default_value_t = 3000)]
        port: u16,

        /// Start without checking the backend first
        #[arg(long)]
        skip_backend_check: bool,

        /// Extra server arguments
        #[arg(last = true)]
        server_args: Vec<String>,
    },
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => run_cargo(&["build", "--all-targets", "--all-features"]),
            Self::CheckBackend { backend_url } => check_backend(&backend_url),
            Self::Machete => machete(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => run_cargo_nightly(&["fmt", "--all", "--check"]),
            Self::FixFormatting => run_cargo_nightly(&["fmt", "--all"]),
            Self::Test => test(),
            Self::Serve {
                backend_url,
                port,
                skip_backend_check,
                server_args,
            } => {
                if !skip_backend_check {
                    check_backend(&backend_url)?;
                }
                serve(&backend_url, port, &server_args)
            }
        }
    }
}

fn ci() -> Result<()> {
    lint()?;
    machete()?;
    run_cargo(&["build", "--all-targets", "--all-features"])?;
    test()
}

fn machete() -> Result<()> {
    cmd!("cargo-machete").run_with_trace()?;
    Ok(())
}

fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    run_cargo_nightly(&["fmt", "--all", "--check"])
}

fn lint_clippy() -> Result<()> {
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

fn lint_docs() -> Result<()> {
    cmd!("cargo", "doc", "--no-deps", "--workspace", "--all-features")
        .env("RUSTDOCFLAGS", "-D warnings")
        .run_with_trace()?;
    Ok(())
}

fn test() -> Result<()> {
    run_cargo(&["test", "--workspace", "--all-targets", "--all-features"])?;
    // Doc tests are not part of --all-targets
    run_cargo(&["test", "--workspace", "--doc", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: &[&str]) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Run a cargo subcommand with the nightly toolchain
fn run_cargo_nightly(args: &[&str]) -> Result<()> {
    cmd("cargo", args)
        // CARGO env var is set because we're running in a cargo subcommand
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

/// Request every backend route the server reads and fail on the first one
/// that does not answer with a success status
fn check_backend(backend_url: &str) -> Result<()> {
    let base: &str = backend_url.trim_end_matches('/');
    for route in BACKEND_ROUTES {
        let url: String = format!("{base}/{route}");
        cmd!("curl", "--fail", "--silent", "--show-error", "--output", "/dev/null", &url)
            .run_with_trace()
            .wrap_err_with(|| format!("backend route {url} is not answering"))?;
    }
    tracing::info!("backend at {base} answers every route");
    Ok(())
}

/// Run the dashboard server against an evaluation backend
///
/// Extra arguments after `--` are passed to the server, e.g.
/// `cargo xtask serve --backend-url http://localhost:8000 -- --per-scope-metrics`.
fn serve(backend_url: &str, port: u16, server_args: &[String]) -> Result<()> {
    let port: String = port.to_string();
    let mut args: Vec<&str> = vec![
        "run",
        "--package",
        "senti-dash-server",
        "--",
        "--backend-url",
        backend_url,
        "--port",
        &port,
    ];
    args.extend(server_args.iter().map(String::as_str));
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
