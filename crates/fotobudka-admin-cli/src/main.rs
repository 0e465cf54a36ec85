//! Fotobudka Admin CLI
//!
//! Command-line tool for the fotobudka site: manage landing pages, uploaded
//! media and the sitemap against the configured database and public root.
//!
//! ## Usage
//!
//! ```bash
//! fotobudka-admin pages seed-main "Fotobudka Chojnice"
//! fotobudka-admin pages add "Gdańsk"
//! fotobudka-admin pages set /gdansk seo "Fotobudka Gdańsk" --key title
//! fotobudka-admin media upload hero.webm --type main --category videos
//! fotobudka-admin sitemap
//! ```
//!
//! Settings come from the environment (and `.env`), see
//! `fotobudka_conf::SiteSettings::from_env`.

mod media;
mod pages;
mod utils;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use fotobudka_cms::repository::PageRepository;
use fotobudka_cms::sitemap::Sitemap;
use fotobudka_conf::SiteSettings;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fotobudka-admin")]
#[command(about = "Fotobudka site administration utility", long_about = None)]
#[command(version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Verbosity level (can be repeated)
	#[arg(short, long, action = clap::ArgAction::Count)]
	verbosity: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Manage landing pages
	Pages {
		#[command(subcommand)]
		subcommand: pages::PageCommands,
	},

	/// Manage uploaded media under the public root
	Media {
		#[command(subcommand)]
		subcommand: media::MediaCommands,
	},

	/// Regenerate sitemap.xml from the stored pages
	Sitemap {
		/// Output file (defaults to sitemap.xml in the public root)
		#[arg(short, long, value_name = "PATH")]
		output: Option<PathBuf>,

		/// Print the document instead of writing it
		#[arg(long)]
		stdout: bool,
	},
}

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	init_tracing(cli.verbosity);

	if let Err(e) = run(cli).await {
		eprintln!("{} {:#}", "Error:".red().bold(), e);
		process::exit(1);
	}
}

fn init_tracing(verbosity: u8) {
	let level = match verbosity {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
	let settings = SiteSettings::from_env().context("Failed to load settings")?;
	settings.validate().context("Invalid settings")?;
	tracing::debug!(media_root = %settings.media_root.display(), "Settings loaded");

	match cli.command {
		Commands::Pages { subcommand } => {
			let repository = open_repository(&settings).await?;
			pages::run(subcommand, &repository).await
		}
		Commands::Media { subcommand } => media::run(subcommand, &settings).await,
		Commands::Sitemap { output, stdout } => {
			let repository = open_repository(&settings).await?;
			run_sitemap(&settings, &repository, output, stdout).await
		}
	}
}

async fn open_repository(settings: &SiteSettings) -> anyhow::Result<PageRepository> {
	PageRepository::from_settings(settings)
		.await
		.context("Failed to open page store")
}

async fn run_sitemap(
	settings: &SiteSettings,
	repository: &PageRepository,
	output: Option<PathBuf>,
	stdout: bool,
) -> anyhow::Result<()> {
	let pages = repository.load_all().await?;
	let sitemap = Sitemap::for_pages(&settings.site_base_url, &pages, chrono::Utc::now())?;
	let xml = sitemap.to_xml()?;

	if stdout {
		print!("{}", xml);
		return Ok(());
	}

	let path = output.unwrap_or_else(|| settings.media_root.join("sitemap.xml"));
	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		std::fs::create_dir_all(parent)
			.with_context(|| format!("Failed to create {}", parent.display()))?;
	}
	utils::atomic_write(&path, &xml)
		.with_context(|| format!("Failed to write {}", path.display()))?;

	utils::success(format!(
		"Sitemap with {} URLs written to {}",
		sitemap.items.len().to_string().bold(),
		path.display()
	));
	Ok(())
}
