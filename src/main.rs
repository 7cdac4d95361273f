mod commands;
mod core;
mod gateway;
mod ui;

use crate::core::config::{DEFAULT_HOSTNAME, PushConfig};
use crate::core::error::{CgwError, print_error};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Publish release artifact metadata to a content gateway
#[derive(Parser)]
#[command(name = "cgw-publish")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Generate the metadata document and publish it to the content gateway
  Push {
    /// Release data file containing the contentGateway block
    #[arg(long)]
    manifest: PathBuf,
    /// Directory of built artifact files
    #[arg(long)]
    content_dir: PathBuf,
    /// Content gateway admin endpoint
    #[arg(long, default_value = DEFAULT_HOSTNAME)]
    host: String,
    /// Metadata document path (default: metadata.yaml alongside the manifest)
    #[arg(long)]
    metadata_file: Option<PathBuf>,
    /// Result record path (default: push-result.json alongside the manifest)
    #[arg(long)]
    result_file: Option<PathBuf>,
    /// Write the result record path to this file (pipeline results channel)
    #[arg(long)]
    results_path: Option<PathBuf>,
    /// Output a JSON summary instead of status lines
    #[arg(long)]
    json: bool,
  },

  /// Preview the metadata document without publishing
  Plan {
    /// Release data file containing the contentGateway block
    #[arg(long)]
    manifest: PathBuf,
    /// Directory of built artifact files
    #[arg(long)]
    content_dir: PathBuf,
    /// Output records and skipped files as JSON
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  let result = match cli.command {
    Commands::Push {
      manifest,
      content_dir,
      host,
      metadata_file,
      result_file,
      results_path,
      json,
    } => {
      let config = PushConfig::new(manifest, content_dir, host, metadata_file, result_file);
      commands::run_push(config, results_path, json)
    }
    Commands::Plan {
      manifest,
      content_dir,
      json,
    } => commands::run_plan(&manifest, &content_dir, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: CgwError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
