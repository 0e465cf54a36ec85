//! `media` subcommands.

use crate::utils::{format_size, success};
use anyhow::Context;
use clap::Subcommand;
use colored::Colorize;
use fotobudka_conf::SiteSettings;
use fotobudka_storages::{
	IncomingFile, MediaCategory, MediaLibrary, MediaType, StorageConfig, create_storage,
};
use std::path::PathBuf;

#[derive(Subcommand)]
pub(crate) enum MediaCommands {
	/// List files of one asset directory
	List {
		/// Media type (main or subpages)
		#[arg(short = 't', long = "type", default_value = "main")]
		media_type: MediaType,

		/// Category (images or videos)
		#[arg(short, long, default_value = "images")]
		category: MediaCategory,
	},

	/// Upload a .webp or .webm file
	Upload {
		/// Local file to upload
		#[arg(value_name = "FILE")]
		file: PathBuf,

		/// Media type (main or subpages)
		#[arg(short = 't', long = "type", default_value = "main")]
		media_type: MediaType,

		/// Category (images or videos)
		#[arg(short, long, default_value = "images")]
		category: MediaCategory,
	},

	/// Delete a file by its public path (e.g. /assets/main/images/a.webp)
	Delete {
		#[arg(value_name = "PATH")]
		path: String,
	},

	/// Create the asset directory tree
	Init,
}

pub(crate) async fn run(command: MediaCommands, settings: &SiteSettings) -> anyhow::Result<()> {
	let storage = create_storage(StorageConfig::from_settings(settings))
		.await
		.with_context(|| format!("Failed to open media root {}", settings.media_root.display()))?;
	let library = MediaLibrary::new(storage).with_max_upload_bytes(settings.max_upload_bytes);

	match command {
		MediaCommands::List {
			media_type,
			category,
		} => {
			let files = library.list(media_type, category).await?;
			if files.is_empty() {
				println!("No files in assets/{}/{}", media_type, category);
				return Ok(());
			}
			for file in &files {
				println!(
					"{:<48} {:>10}  {}",
					file.path.cyan(),
					format_size(file.size),
					file.modified.format("%Y-%m-%d %H:%M").to_string().dimmed()
				);
			}
			Ok(())
		}
		MediaCommands::Upload {
			file,
			media_type,
			category,
		} => {
			let name = file
				.file_name()
				.and_then(|n| n.to_str())
				.with_context(|| format!("{} has no usable file name", file.display()))?
				.to_string();
			let content = tokio::fs::read(&file)
				.await
				.with_context(|| format!("Failed to read {}", file.display()))?;

			let uploaded = library
				.upload(Some(IncomingFile::new(&name, &content)), media_type, category)
				.await?;
			success(format!(
				"Uploaded {} ({})",
				uploaded.path.bold(),
				format_size(uploaded.size)
			));
			Ok(())
		}
		MediaCommands::Delete { path } => {
			library.delete(&path).await?;
			success(format!("Deleted {}", path));
			Ok(())
		}
		MediaCommands::Init => {
			library.ensure_directories().await?;
			success(format!(
				"Asset directories ready under {}",
				settings.media_root.display()
			));
			Ok(())
		}
	}
}
