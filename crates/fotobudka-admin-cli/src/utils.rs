//! Small helpers shared by the commands.

use colored::Colorize;
use std::path::Path;

/// Write content to a file by writing a sibling temporary file and renaming
/// it over the target.
///
/// Original file permissions are preserved after the write.
pub(crate) fn atomic_write(path: &Path, content: &str) -> std::io::Result<()> {
	let original_perms = std::fs::metadata(path).ok().map(|m| m.permissions());

	// Same directory, so the rename stays on one filesystem
	let tmp_path = path.with_extension("tmp");
	std::fs::write(&tmp_path, content)?;

	if let Err(e) = std::fs::rename(&tmp_path, path) {
		let _ = std::fs::remove_file(&tmp_path);
		return Err(e);
	}

	if let Some(perms) = original_perms {
		std::fs::set_permissions(path, perms)?;
	}

	Ok(())
}

/// Turn a command-line value into JSON.
///
/// Text targets take the raw string as is, so `500` or `2024` stay strings.
/// Anything else is parsed as JSON, falling back to a plain string.
pub(crate) fn parse_value(raw: &str, as_text: bool) -> serde_json::Value {
	if as_text {
		return serde_json::Value::String(raw.to_string());
	}
	serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

/// Human-readable byte count.
pub(crate) fn format_size(bytes: u64) -> String {
	const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
	let mut size = bytes as f64;
	let mut unit = 0;
	while size >= 1024.0 && unit < UNITS.len() - 1 {
		size /= 1024.0;
		unit += 1;
	}
	if unit == 0 {
		format!("{} {}", bytes, UNITS[0])
	} else {
		format!("{:.1} {}", size, UNITS[unit])
	}
}

pub(crate) fn success(message: impl std::fmt::Display) {
	println!("{} {}", "✓".green().bold(), message);
}
