use serde::{Deserialize, Serialize};
use typewriter_core::{
    DEFAULT_INDENT_WIDTH, FileImageResolver, FontCatalog, FontEntry, HeadingPresets,
};

use std::future::Future;
use std::path::Path;
use std::path::PathBuf;

use crate::error::TypewriterError;

const CONFIG_DIR: &str = "typewriter";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// First-line indent, in inches, applied to every paragraph.
    pub indent_width: f32,
    /// Directory that image references in stored HTML are resolved against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_root: Option<PathBuf>,
    /// Fonts offered to the editor.
    pub fonts: FontCatalog,
    /// Relative sizes for the heading actions.
    pub headings: HeadingPresets,
}

impl Config {
    /// Load through `loader` and validate. Nothing stored yet means the
    /// defaults.
    pub async fn load(loader: &impl Loader) -> Result<Self, TypewriterError> {
        let Some(config) = loader.load().await? else {
            tracing::debug!("no stored configuration, using defaults");
            return Ok(Self::default());
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate, then write through `saver`.
    pub async fn save(&self, saver: &impl Saver) -> Result<(), TypewriterError> {
        self.validate()?;
        saver.save(self).await
    }

    /// Reject values the editor cannot work with.
    pub fn validate(&self) -> Result<(), TypewriterError> {
        if !self.indent_width.is_finite() || self.indent_width < 0.0 {
            return Err(TypewriterError::Config(format!(
                "indent_width must be a non-negative number, got {}",
                self.indent_width
            )));
        }
        for font in self.fonts.entries() {
            if font.id.is_empty() || !font.id.bytes().all(|b| b.is_ascii_digit()) {
                return Err(TypewriterError::Config(format!(
                    "font id {:?} ({}) must be decimal digits",
                    font.id, font.name
                )));
            }
            if font.id.bytes().all(|b| b == b'0') {
                return Err(TypewriterError::Config(format!(
                    "font id {} is reserved for the system font ({})",
                    font.id, font.name
                )));
            }
        }
        Ok(())
    }

    /// The location used when no path is given: `<config dir>/typewriter/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    pub fn font_catalog(&self) -> &FontCatalog {
        &self.fonts
    }

    pub fn image_resolver(&self) -> Option<FileImageResolver> {
        self.image_root.as_ref().map(FileImageResolver::new)
    }
}

impl Default for Config {
    /// Creates a new default configuration.
    ///
    /// Ships with the two bundled fonts.
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
            image_root: None,
            fonts: FontCatalog::new([
                FontEntry::from_resource("1", "courier_prime"),
                FontEntry::from_resource("2", "open_sans_bold"),
            ]),
            headings: HeadingPresets::default(),
        }
    }
}

/// Source of a stored configuration.
pub trait Loader {
    /// The stored configuration, or `None` if nothing has been saved.
    fn load(&self) -> impl Future<Output = Result<Option<Config>, TypewriterError>> + Send;
}

/// Destination for a configuration.
pub trait Saver {
    fn save(&self, config: &Config) -> impl Future<Output = Result<(), TypewriterError>> + Send;
}

/// Serialization picked from a config file's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    fn of(path: &Path) -> Result<Self, TypewriterError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(TypewriterError::Config(format!(
                "unsupported configuration format: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }
}

/// A config file on disk, read and written with `tokio::fs`.
///
/// `.json` and `.toml` are supported. A missing file loads as `None`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Loader for FileStore {
    #[tracing::instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Option<Config>, TypewriterError> {
        let format = FileFormat::of(&self.path)?;
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let config = match format {
            FileFormat::Json => serde_json::from_str(&contents)?,
            FileFormat::Toml => toml::from_str(&contents)?,
        };
        Ok(Some(config))
    }
}

impl Saver for FileStore {
    async fn save(&self, config: &Config) -> Result<(), TypewriterError> {
        let contents = match FileFormat::of(&self.path)? {
            FileFormat::Json => serde_json::to_string_pretty(config)?,
            FileFormat::Toml => toml::to_string_pretty(config)?,
        };
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, contents).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom() -> Config {
        Config {
            indent_width: 0.5,
            image_root: Some(PathBuf::from("/srv/images")),
            fonts: FontCatalog::new([FontEntry::new("9", "Lora")]),
            headings: HeadingPresets {
                title: 3.0,
                ..HeadingPresets::default()
            },
        }
    }

    #[tokio::test]
    async fn test_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("config.toml"));
        let config = custom();
        config.save(&store).await.unwrap();
        assert_eq!(Config::load(&store).await.unwrap(), config);
    }

    #[tokio::test]
    async fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("config.json"));
        let config = custom();
        config.save(&store).await.unwrap();
        assert_eq!(Config::load(&store).await.unwrap(), config);
    }

    #[tokio::test]
    async fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("config.yaml"));
        assert!(Config::default().save(&store).await.is_err());
        assert!(Config::load(&store).await.is_err());
    }

    #[tokio::test]
    async fn test_partial_toml_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "indent_width = 0.75\n\n[headings]\ntitle = 2.5\n").unwrap();

        let config = Config::load(&FileStore::new(&path)).await.unwrap();
        assert_eq!(config.indent_width, 0.75);
        assert_eq!(config.headings.title, 2.5);
        assert_eq!(config.headings.subtitle, 1.5);
        assert_eq!(config.fonts, Config::default().fonts);
        assert!(config.image_resolver().is_none());
    }

    #[tokio::test]
    async fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent.toml"));
        assert!(store.load().await.unwrap().is_none());

        let config = Config::load(&store).await.unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.font_catalog().len(), 2);
    }

    #[tokio::test]
    async fn test_reserved_font_id_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"fonts": [{"id": "00", "name": "System"}]}"#).unwrap();
        assert!(matches!(
            Config::load(&FileStore::new(&path)).await,
            Err(TypewriterError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_non_numeric_font_id_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("config.toml"));
        let config = Config {
            fonts: FontCatalog::new([FontEntry::new("serif", "Lora")]),
            ..Config::default()
        };
        assert!(matches!(
            config.save(&store).await,
            Err(TypewriterError::Config(_))
        ));
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Config::load(&FileStore::new(&path)).await,
            Err(TypewriterError::Serde(_))
        ));
    }

    #[test]
    fn test_negative_indent_rejected() {
        let config = Config {
            indent_width: -1.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
