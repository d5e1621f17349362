use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Serialize, Deserialize};

use crate::resolution::Resolution;

/// User preferences for the ordering of otherwise unrelated packages.
///
/// Patterns match qualified package names, `*` matches any run of characters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdererConfig {
	/// Packages to order as early as their dependencies allow.
	#[serde(default)]
	pub early: Vec<String>,
	/// Packages to leave until nothing else is ready.
	#[serde(default)]
	pub late: Vec<String>,
}

impl OrdererConfig {
	/// `pkgorder/config.json` in the user's config directory.
	pub fn default_path() -> Option<PathBuf> {
		#[cfg(target_os = "windows")]
		let path = std::env::var_os("APPDATA").map(PathBuf::from);

		#[cfg(not(target_os = "windows"))]
		let path = if let Some(e) = std::env::var_os("XDG_CONFIG_HOME") {
			Some(PathBuf::from(e))
		} else {
			std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
		};

		path.map(|p| p.join("pkgorder").join("config.json"))
	}

	/// Loads from [`OrdererConfig::default_path()`], a missing file gives the default config.
	pub fn load_from_disk() -> crate::Result<Self> {
		match Self::default_path() {
			Some(path) if path.exists() => Self::load_from_path(path),
			_ => {
				log::debug!("No config file found, using defaults");
				Ok(Self::default())
			},
		}
	}

	pub fn load_from_path(path: impl AsRef<Path>) -> crate::Result<Self> {
		log::debug!("Loading config from {}", path.as_ref().display());
		let file = std::fs::File::open(path)?;
		Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
	}

	/// Writes the config, creating parent directories as needed.
	pub fn save_to_path(&self, path: impl AsRef<Path>) -> crate::Result<()> {
		let path = path.as_ref();
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		let file = std::fs::File::create(path)?;
		serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)?;
		Ok(())
	}

	/// # Errors
	/// [`crate::Error::Pattern`] if a pattern cannot be compiled.
	pub fn matcher(&self) -> crate::Result<OrderEarlyMatcher> {
		Ok(OrderEarlyMatcher {
			early: self.early.iter().map(|p| pattern_to_regex(p)).collect::<crate::Result<_>>()?,
			late: self.late.iter().map(|p| pattern_to_regex(p)).collect::<crate::Result<_>>()?,
		})
	}
}

fn pattern_to_regex(pattern: &str) -> crate::Result<Regex> {
	let parts: Vec<_> = pattern.split('*').map(regex::escape).collect();
	Ok(Regex::new(&format!("^{}$", parts.join(".*")))?)
}

/// Compiled form of an [`OrdererConfig`], usable as the orderer's `order_early` hint.
#[derive(Debug, Clone)]
pub struct OrderEarlyMatcher {
	early: Vec<Regex>,
	late: Vec<Regex>,
}

impl OrderEarlyMatcher {
	/// `Some(true)` for early packages, `Some(false)` for late ones, early takes precedence.
	pub fn order_early(&self, resolution: &Resolution) -> Option<bool> {
		let name = resolution.resolvent.package.as_str();
		if self.early.iter().any(|r| r.is_match(name)) {
			Some(true)
		} else if self.late.iter().any(|r| r.is_match(name)) {
			Some(false)
		} else {
			None
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::resolution::*;
	use crate::resolvent::*;

	fn resolution(name: &str) -> Resolution {
		Resolution {
			resolvent: Resolvent::new(name, None, DestinationType::InstallToSlash),
			constraints: vec![],
			decision: Decision::NothingNoChange(NothingNoChangeDecision { taken: true }),
		}
	}

	#[test]
	fn patterns() {
		let config = OrdererConfig {
			early: vec!["sys-apps/*".to_owned(), "dev-lang/rust".to_owned()],
			late: vec!["*-doc/*".to_owned(), "sys-apps/man-pages".to_owned()],
		};
		let matcher = config.matcher().unwrap();

		assert_eq!(matcher.order_early(&resolution("sys-apps/paludis")), Some(true));
		assert_eq!(matcher.order_early(&resolution("dev-lang/rust")), Some(true));
		assert_eq!(matcher.order_early(&resolution("dev-lang/rust-bin")), None);
		assert_eq!(matcher.order_early(&resolution("app-doc/manual")), Some(false));
		assert_eq!(matcher.order_early(&resolution("sys-apps/man-pages")), Some(true));
		assert_eq!(matcher.order_early(&resolution("app-misc/thing")), None);
	}

	#[test]
	fn patterns_are_literal() {
		let config = OrdererConfig { early: vec!["dev-cpp/c++".to_owned()], late: vec![] };
		let matcher = config.matcher().unwrap();
		assert_eq!(matcher.order_early(&resolution("dev-cpp/c++")), Some(true));
		assert_eq!(matcher.order_early(&resolution("dev-cpp/cc")), None);
	}

	#[test]
	fn save_and_load() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nested").join("config.json");
		let config = OrdererConfig { early: vec!["a/*".to_owned()], late: vec!["b/*".to_owned()] };
		config.save_to_path(&path).unwrap();
		assert_eq!(OrdererConfig::load_from_path(&path).unwrap(), config);
	}

	#[test]
	fn missing_fields_default() {
		let config: OrdererConfig = serde_json::from_str(r#"{"late": ["x/*"]}"#).unwrap();
		assert!(config.early.is_empty());
		assert_eq!(config.late, ["x/*"]);
	}
}
