use crate::error::{Result, VitrineError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use wildmatch::WildMatch;

pub const CONFIG_FILE: &str = "Vitrine.toml";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Catalog {
    #[serde(default = "default_document")]
    pub document: String,
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
    /// Patterns for top-level entries that are never categories.
    #[serde(default = "default_excluded")]
    pub excluded: Vec<String>,
    /// Folder names pruned anywhere inside a category.
    #[serde(default = "default_excluded_subdirs")]
    pub excluded_subdirs: Vec<String>,
    #[serde(default = "default_thumbnail_dir")]
    pub thumbnail_dir: String,
}

impl Catalog {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.image_extensions.is_empty() {
            return Err("[catalog] 'image_extensions' must list at least one extension".to_string());
        }
        if self.document.trim().is_empty() {
            return Err("[catalog] 'document' cannot be empty".to_string());
        }
        if self.thumbnail_dir.trim().is_empty() || self.thumbnail_dir.contains(['/', '\\']) {
            return Err(
                "[catalog] 'thumbnail_dir' must be a single folder name inside the root".to_string(),
            );
        }
        Ok(())
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.iter().any(|p| WildMatch::new(p).matches(name))
    }

    pub fn is_excluded_subdir(&self, name: &str) -> bool {
        self.excluded_subdirs.iter().any(|d| d == name)
    }

    pub fn is_image(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map_or(false, |ext| {
                self.image_extensions
                    .iter()
                    .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog {
            document: default_document(),
            image_extensions: default_image_extensions(),
            excluded: default_excluded(),
            excluded_subdirs: default_excluded_subdirs(),
            thumbnail_dir: default_thumbnail_dir(),
        }
    }
}

fn default_document() -> String {
    "index.html".to_string()
}

fn default_image_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "gif", "webp"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_excluded() -> Vec<String> {
    [
        "node_modules",
        "thumbmails",
        "*.html",
        "*.js",
        "*.json",
        "*.py",
        "*.sh",
        "*.md",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_excluded_subdirs() -> Vec<String> {
    vec!["node_modules".to_string(), "thumbmails".to_string()]
}

fn default_thumbnail_dir() -> String {
    ".thumbnails".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Rename {
    /// Directories the renamer neither renames nor enters.
    #[serde(default = "default_ignored_dirs")]
    pub ignored_dirs: Vec<String>,
}

impl Default for Rename {
    fn default() -> Self {
        Rename {
            ignored_dirs: default_ignored_dirs(),
        }
    }
}

fn default_ignored_dirs() -> Vec<String> {
    [".git", "node_modules", "thumbmails"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Thumbnails {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_quality")]
    pub quality: u8,
}

impl Thumbnails {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.width == 0 {
            return Err("[thumbnails] 'width' must be greater than zero".to_string());
        }
        if self.quality == 0 || self.quality > 100 {
            return Err("[thumbnails] 'quality' must be between 1 and 100".to_string());
        }
        Ok(())
    }
}

impl Default for Thumbnails {
    fn default() -> Self {
        Thumbnails {
            width: default_width(),
            quality: default_quality(),
        }
    }
}

fn default_width() -> u32 {
    400
}

fn default_quality() -> u8 {
    80
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Server {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Server {
            port: default_port(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: Catalog,
    #[serde(default)]
    pub rename: Rename,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    #[serde(default)]
    pub server: Server,
}

impl Config {
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.catalog.validate()?;
        self.thumbnails.validate()?;
        Ok(())
    }

    /// Reads `Vitrine.toml` from `root`; a missing file yields the defaults.
    pub fn load(root: &Path) -> Result<Config> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Config::default());
        }
        let config_str = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&config_str)
            .map_err(|e| VitrineError::Config(format!("Failed to parse {}: {}", CONFIG_FILE, e)))?;
        config.validate().map_err(VitrineError::Config)?;
        Ok(config)
    }
}
