//! `pages` subcommands.

use crate::utils::{parse_value, success};
use anyhow::{Context, bail};
use clap::Subcommand;
use colored::Colorize;
use fotobudka_cms::editor::{self, PageField};
use fotobudka_cms::pages::PageRecord;
use fotobudka_cms::repository::PageRepository;
use fotobudka_cms::slug::{normalize_slug, slug_from_name};
use std::path::PathBuf;

#[derive(Subcommand)]
pub(crate) enum PageCommands {
	/// List every page, main page first
	List,

	/// Print one page as JSON
	Show {
		/// Page slug (e.g. `/` or `/gdansk`)
		#[arg(value_name = "SLUG")]
		slug: String,
	},

	/// Create a city subpage from the main page's content
	Add {
		/// Page name shown in the admin list
		#[arg(value_name = "NAME")]
		name: String,

		/// Slug (derived from the name when omitted)
		#[arg(short, long)]
		slug: Option<String>,
	},

	/// Delete a subpage
	Remove {
		/// Page slug
		#[arg(value_name = "SLUG")]
		slug: String,
	},

	/// Set one field of a page
	Set {
		/// Page slug
		#[arg(value_name = "SLUG")]
		slug: String,

		/// Field (name, slug, seo, navigation, videos, welcomeSection, stats, gallery, locations, footer)
		#[arg(value_name = "FIELD")]
		field: PageField,

		/// New value; text fields take it verbatim, whole sections parse it as JSON
		#[arg(value_name = "VALUE")]
		value: String,

		/// Set only this key of the field (e.g. `title` for seo)
		#[arg(short, long)]
		key: Option<String>,
	},

	/// Create the main page
	SeedMain {
		/// Page name
		#[arg(value_name = "NAME")]
		name: String,

		/// JSON file with the full page content
		#[arg(long, value_name = "PATH")]
		from: Option<PathBuf>,
	},
}

pub(crate) async fn run(command: PageCommands, repository: &PageRepository) -> anyhow::Result<()> {
	match command {
		PageCommands::List => list(repository).await,
		PageCommands::Show { slug } => {
			let page = find(repository, &slug).await?;
			println!("{}", serde_json::to_string_pretty(&page)?);
			Ok(())
		}
		PageCommands::Add { name, slug } => {
			let slug = slug.unwrap_or_else(|| slug_from_name(&name));
			let page = repository.add_subpage(&name, &slug).await?;
			success(format!("Created {} at {}", page.name.bold(), page.slug));
			Ok(())
		}
		PageCommands::Remove { slug } => {
			let page = find(repository, &slug).await?;
			repository.remove_subpage(page.id).await?;
			success(format!("Removed {}", page.slug));
			Ok(())
		}
		PageCommands::Set {
			slug,
			field,
			value,
			key,
		} => {
			let page = find(repository, &slug).await?;
			let edited = set_from_arg(&page, field, &value, key.as_deref())?;
			if edited == page {
				println!("{} nothing changed", "·".dimmed());
				return Ok(());
			}
			repository.update(page.id, edited).await?;
			success(format!("Updated {} on {}", field, page.slug));
			Ok(())
		}
		PageCommands::SeedMain { name, from } => {
			let mut record = match from {
				Some(path) => {
					let raw = std::fs::read_to_string(&path)
						.with_context(|| format!("Failed to read {}", path.display()))?;
					serde_json::from_str::<PageRecord>(&raw)
						.with_context(|| format!("{} is not a page record", path.display()))?
				}
				None => PageRecord::main_page(&name),
			};
			record.name = name;
			let page = repository.create_main_page(record).await?;
			success(format!("Created main page {}", page.name.bold()));
			Ok(())
		}
	}
}

fn set_from_arg(
	page: &PageRecord,
	field: PageField,
	raw: &str,
	key: Option<&str>,
) -> fotobudka_cms::error::CmsResult<PageRecord> {
	let value = parse_value(raw, field.is_text(key));
	editor::set_field(page, field, value, key)
}

async fn list(repository: &PageRepository) -> anyhow::Result<()> {
	let pages = repository.load_all().await?;
	if pages.is_empty() {
		println!("No pages. Create the main page with `pages seed-main`.");
		return Ok(());
	}

	for page in &pages {
		let marker = if page.is_main() {
			"main".green().to_string()
		} else {
			String::new()
		};
		println!(
			"{:<24} {:<28} {} {}",
			page.slug.cyan(),
			page.name,
			page.id.to_string().dimmed(),
			marker
		);
	}
	println!();
	println!("{} page(s)", pages.len().to_string().bold());
	Ok(())
}

async fn find(repository: &PageRepository, slug: &str) -> anyhow::Result<PageRecord> {
	let slug = normalize_slug(slug);
	match repository.get_by_slug(&slug).await? {
		Some(page) => Ok(page),
		None => bail!("No page at {}", slug),
	}
}
