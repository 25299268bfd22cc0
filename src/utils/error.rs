use std::fmt::Write as _;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum YamodoolError {
    #[error("Cannot parse yamodool file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Malformed yamodool document: {message}")]
    MalformedDocument { message: String },

    #[error("Unknown field type '{kind}' for field '{field}'")]
    UnknownFieldKind { field: String, kind: String },

    #[error("Unknown special field '{special}' for field '{field}'. Possible values: Counter")]
    UnknownSpecial { field: String, special: String },

    #[error("Missing required attribute '{attribute}' in '{owner}'")]
    MissingAttribute { owner: String, attribute: String },

    #[error("Invalid attribute '{attribute}' in '{owner}': {message}")]
    InvalidAttribute {
        owner: String,
        attribute: String,
        message: String,
    },

    #[error("Model attribute '{name}' is defined more than once")]
    DuplicateAttribute { name: String },

    #[error("Unsupported constraint type {kind} (constraint '{constraint}')")]
    UnsupportedConstraintType { constraint: String, kind: String },

    #[error("Unknown model type '{kind}'. Possible values: model, abstract, transient.")]
    UnsupportedModelKind { kind: String },

    #[error("Cannot parse yamodool data {}: {source}", .path.display())]
    Translation {
        path: PathBuf,
        #[source]
        source: Box<YamodoolError>,
    },

    #[error(
        "Cannot determine model module: '{module}' does not start with '{expected_prefix}', \
         perhaps models were loaded from outside an addon"
    )]
    DiscoveryMisuse {
        module: String,
        expected_prefix: String,
    },

    #[error("Cannot load yamodools from path: {}", .path.display())]
    InvalidPath { path: PathBuf },

    #[error("Failed to load {} yamodool file(s):{}", .failures.len(), format_failures(.failures))]
    Discovery { failures: Vec<FileFailure> },

    #[error("Compute method '{method}' failed: {message}")]
    Compute { method: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// 目錄載入時單一檔案的失敗紀錄
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: YamodoolError,
}

fn format_failures(failures: &[FileFailure]) -> String {
    let mut out = String::new();
    for failure in failures {
        let _ = write!(out, "\n  - {}: {}", failure.path.display(), failure.error);
    }
    out
}

impl YamodoolError {
    pub fn missing(owner: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            owner: owner.into(),
            attribute: attribute.into(),
        }
    }

    pub fn invalid(
        owner: impl Into<String>,
        attribute: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            owner: owner.into(),
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    /// 取出包裝在 Translation 之下的原始錯誤
    pub fn root_cause(&self) -> &YamodoolError {
        match self {
            Self::Translation { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// 給 CLI 使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Parse { path, .. } => format!("Could not read model file {}", path.display()),
            Self::Translation { path, source } => {
                format!("Model file {} is invalid: {}", path.display(), source.root_cause())
            }
            Self::Discovery { failures } => {
                format!("{} model file(s) could not be loaded", failures.len())
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.root_cause() {
            Self::Parse { .. } | Self::IoError(_) => {
                "Check that the file exists, is readable and contains valid YAML"
            }
            Self::MalformedDocument { .. } => "The document root must be a YAML mapping",
            Self::UnknownFieldKind { .. } => {
                "Use one of the known field types (Char, Integer, Many2one, ...)"
            }
            Self::UnknownSpecial { .. } => "The only supported special field is 'Counter'",
            Self::MissingAttribute { .. } | Self::InvalidAttribute { .. } => {
                "Fix the attribute in the model file"
            }
            Self::DuplicateAttribute { .. } => "Rename the field or compute method",
            Self::UnsupportedConstraintType { .. } => "Constraint type must be 'unique' or 'check'",
            Self::UnsupportedModelKind { .. } => {
                "Model type must be 'model', 'transient' or 'abstract'"
            }
            Self::DiscoveryMisuse { .. } => "Pass the addon module name, e.g. odoo.addons.my_addon",
            Self::InvalidPath { .. } => "Point to a model file or a directory of model files",
            Self::Discovery { .. } => "Fix the listed files and load again",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => "Check the loader configuration file",
            Self::Compute { .. } => "Check the records passed to the compute method",
            Self::Translation { .. } | Self::SerializationError(_) | Self::YamlError(_) => {
                "Run again with --verbose"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, YamodoolError>;
