//! TOML configuration file with `[source]` and `[database]` groups.
//!
//! ```toml
//! [source]
//! endpoint = "https://tcat.example.org/api/querybin.php"
//! realm = "TCAT"
//! user = "analyst"
//! passwd = "secret"
//!
//! [database]
//! engine = "postgresql"
//! server = "db.example.org:5432"
//! user = "loader"
//! passwd = "secret"
//! db = "tweets"
//! charset = "utf8mb4"
//! ```

use std::fmt;
use std::io::Read;
use std::path::Path;

use cap_std::{ambient_authority, fs::Dir};
use toml::{Table, Value};
use url::Url;
use zeroize::Zeroizing;

use super::ConfigurationError;
use crate::domain::TextEncoding;

const SOURCE_SECTION: &str = "source";
const DATABASE_SECTION: &str = "database";
const REDACTED: &str = "<redacted>";

/// Connection details for the query-bin API.
#[derive(Clone)]
pub struct SourceConfig {
    /// Base URL of the query-bin API.
    pub endpoint: Url,
    /// Authentication realm advertised by the API.
    pub realm: String,
    /// Basic-auth user.
    pub user: String,
    /// Basic-auth password.
    pub passwd: Zeroizing<String>,
}

impl fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("realm", &self.realm)
            .field("user", &self.user)
            .field("passwd", &REDACTED)
            .finish()
    }
}

/// Connection details for the destination database.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Engine name, used as the connection URL scheme.
    pub engine: String,
    /// Host, optionally with `:port`.
    pub server: String,
    /// Database user.
    pub user: String,
    /// Database password.
    pub passwd: Zeroizing<String>,
    /// Database name.
    pub db: String,
    /// Text encoding override; the server's encoding is used when unset.
    pub charset: Option<TextEncoding>,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("engine", &self.engine)
            .field("server", &self.server)
            .field("user", &self.user)
            .field("passwd", &REDACTED)
            .field("db", &self.db)
            .field("charset", &self.charset)
            .finish()
    }
}

/// Loader configuration: the source API and the destination database.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// `[source]` group.
    pub source: SourceConfig,
    /// `[database]` group.
    pub database: DatabaseConfig,
}

impl LoaderConfig {
    /// Read and validate the configuration file at `path`.
    pub fn from_path(path: &Path) -> Result<Self, ConfigurationError> {
        let text = read_text(path)?;
        Self::from_toml_str(&text).map_err(|error| match error {
            ConfigurationError::Parse { message, .. } => ConfigurationError::Parse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    /// Parse configuration text.
    ///
    /// # Examples
    /// ```
    /// use querybin_loader::config::{ConfigurationError, LoaderConfig};
    ///
    /// let text = "[source]\nendpoint = \"https://x.test\"\n[database]\n";
    /// let error = LoaderConfig::from_toml_str(text).expect_err("keys are missing");
    /// assert_eq!(
    ///     error,
    ///     ConfigurationError::MissingKey {
    ///         section: "source".to_owned(),
    ///         key: "realm".to_owned(),
    ///     }
    /// );
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigurationError> {
        let table = toml::from_str::<Table>(text).map_err(|error| ConfigurationError::Parse {
            path: Path::new("<inline>").to_path_buf(),
            message: error.to_string(),
        })?;
        let source = Section::find(&table, SOURCE_SECTION)?;
        let database = Section::find(&table, DATABASE_SECTION)?;
        Ok(Self {
            source: SourceConfig::from_section(&source)?,
            database: DatabaseConfig::from_section(&database)?,
        })
    }
}

impl SourceConfig {
    fn from_section(section: &Section<'_>) -> Result<Self, ConfigurationError> {
        let raw_endpoint = section.required("endpoint")?;
        let endpoint = Url::parse(&raw_endpoint)
            .map_err(|error| section.invalid("endpoint", error.to_string()))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(section.invalid("endpoint", "scheme must be http or https"));
        }
        if endpoint.query().is_some() || endpoint.fragment().is_some() {
            return Err(section.invalid("endpoint", "must not carry a query or fragment"));
        }
        Ok(Self {
            endpoint,
            realm: section.required("realm")?,
            user: section.required("user")?,
            passwd: Zeroizing::new(section.required("passwd")?),
        })
    }
}

impl DatabaseConfig {
    fn from_section(section: &Section<'_>) -> Result<Self, ConfigurationError> {
        let charset = section
            .optional("charset")?
            .map(|label| {
                TextEncoding::from_charset(&label)
                    .ok_or_else(|| section.invalid("charset", format!("unknown charset '{label}'")))
            })
            .transpose()?;
        Ok(Self {
            engine: section.required("engine")?,
            server: section.required("server")?,
            user: section.required("user")?,
            passwd: Zeroizing::new(section.required("passwd")?),
            db: section.required("db")?,
            charset,
        })
    }
}

struct Section<'a> {
    name: &'static str,
    table: &'a Table,
}

impl<'a> Section<'a> {
    fn find(root: &'a Table, name: &'static str) -> Result<Self, ConfigurationError> {
        match root.get(name) {
            Some(Value::Table(table)) => Ok(Self { name, table }),
            Some(_) => Err(ConfigurationError::invalid_value(
                name,
                name,
                "expected a [group] of keys",
            )),
            None => Err(ConfigurationError::MissingSection {
                section: name.to_owned(),
            }),
        }
    }

    fn required(&self, key: &str) -> Result<String, ConfigurationError> {
        self.optional(key)?
            .ok_or_else(|| ConfigurationError::missing_key(self.name, key))
    }

    fn optional(&self, key: &str) -> Result<Option<String>, ConfigurationError> {
        match self.table.get(key) {
            None => Ok(None),
            Some(Value::String(value)) if value.trim().is_empty() => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.trim().to_owned())),
            Some(other) => Err(self.invalid(
                key,
                format!("expected a string, found {}", other.type_str()),
            )),
        }
    }

    fn invalid(&self, key: &str, message: impl Into<String>) -> ConfigurationError {
        ConfigurationError::invalid_value(self.name, key, message)
    }
}

fn read_text(path: &Path) -> Result<String, ConfigurationError> {
    let io_error = |message: String| ConfigurationError::Io {
        path: path.to_path_buf(),
        message,
    };
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io_error("path does not name a file".to_owned()))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|error| io_error(format!("open parent directory: {error}")))?;
    let mut file = directory
        .open(Path::new(file_name))
        .map_err(|error| io_error(error.to_string()))?;
    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|error| io_error(error.to_string()))?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::fs;

    const VALID: &str = r#"
[source]
endpoint = "https://tcat.example.org/api/querybin.php"
realm = "TCAT"
user = "analyst"
passwd = "s3cret"

[database]
engine = "postgresql"
server = "db.example.org:5432"
user = "loader"
passwd = "hunter2"
db = "tweets"
"#;

    #[fixture]
    fn valid() -> LoaderConfig {
        LoaderConfig::from_toml_str(VALID).expect("valid configuration")
    }

    #[rstest]
    fn reads_both_groups(valid: LoaderConfig) {
        assert_eq!(
            valid.source.endpoint.as_str(),
            "https://tcat.example.org/api/querybin.php"
        );
        assert_eq!(valid.source.realm, "TCAT");
        assert_eq!(valid.source.passwd.as_str(), "s3cret");
        assert_eq!(valid.database.server, "db.example.org:5432");
        assert_eq!(valid.database.db, "tweets");
        assert_eq!(valid.database.charset, None);
    }

    #[rstest]
    fn debug_output_hides_passwords(valid: LoaderConfig) {
        let rendered = format!("{valid:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains(REDACTED));
    }

    #[rstest]
    #[case("source")]
    #[case("database")]
    fn missing_group_is_reported(#[case] section: &str) {
        let text = VALID.replace(&format!("[{section}]"), "[unused]");
        let error = LoaderConfig::from_toml_str(&text).expect_err("group is missing");
        assert_eq!(
            error,
            ConfigurationError::MissingSection {
                section: section.to_owned()
            }
        );
    }

    #[rstest]
    #[case("realm = \"TCAT\"\n", "source", "realm")]
    #[case("passwd = \"hunter2\"\n", "database", "passwd")]
    #[case("db = \"tweets\"\n", "database", "db")]
    fn missing_key_is_reported(#[case] line: &str, #[case] section: &str, #[case] key: &str) {
        let text = VALID.replace(line, "");
        let error = LoaderConfig::from_toml_str(&text).expect_err("key is missing");
        assert_eq!(error, ConfigurationError::missing_key(section, key));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let text = VALID.replace("user = \"analyst\"", "user = \"  \"");
        let error = LoaderConfig::from_toml_str(&text).expect_err("user is blank");
        assert_eq!(error, ConfigurationError::missing_key("source", "user"));
    }

    #[rstest]
    #[case("endpoint = \"not a url\"")]
    #[case("endpoint = \"ftp://tcat.example.org\"")]
    #[case("endpoint = 42")]
    #[case("endpoint = \"https://tcat.example.org/api?bin=climate\"")]
    #[case("endpoint = \"https://tcat.example.org/api#export\"")]
    fn bad_endpoints_are_rejected(#[case] line: &str) {
        let text = VALID.replace(
            "endpoint = \"https://tcat.example.org/api/querybin.php\"",
            line,
        );
        let error = LoaderConfig::from_toml_str(&text).expect_err("endpoint is invalid");
        assert!(matches!(
            error,
            ConfigurationError::InvalidValue { ref key, .. } if key == "endpoint"
        ));
    }

    #[rstest]
    #[case("utf8mb3", Some(TextEncoding::BasicMultilingualPlane))]
    #[case("latin1", Some(TextEncoding::Latin1))]
    fn charset_selects_the_text_encoding(
        #[case] label: &str,
        #[case] expected: Option<TextEncoding>,
    ) {
        let text = format!("{VALID}charset = \"{label}\"\n");
        let config = LoaderConfig::from_toml_str(&text).expect("valid configuration");
        assert_eq!(config.database.charset, expected);
    }

    #[test]
    fn unknown_charset_is_rejected() {
        let text = format!("{VALID}charset = \"ebcdic\"\n");
        let error = LoaderConfig::from_toml_str(&text).expect_err("charset is unknown");
        assert_eq!(
            error,
            ConfigurationError::invalid_value("database", "charset", "unknown charset 'ebcdic'")
        );
    }

    #[test]
    fn reads_configuration_from_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("querybin-loader.toml");
        fs::write(&path, VALID).expect("write config");

        let config = LoaderConfig::from_path(&path).expect("configuration should load");
        assert_eq!(config.database.user, "loader");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.toml");
        let error = LoaderConfig::from_path(&path).expect_err("file is absent");
        assert!(matches!(error, ConfigurationError::Io { .. }));
    }

    #[test]
    fn parse_errors_name_the_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[source\nendpoint = ").expect("write config");

        let error = LoaderConfig::from_path(&path).expect_err("file is not TOML");
        assert!(matches!(error, ConfigurationError::Parse { path: ref reported, .. } if *reported == path));
    }
}
