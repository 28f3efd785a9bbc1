use thiserror::Error;

#[derive(Error, Debug)]
pub enum CffError {
    #[error("IO error reading '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error at {path}{}: {message}", location_suffix(.line, .column))]
    ParseError {
        path: String,
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },

    #[error("Validation error at {field}: {reason}")]
    ValidationError {
        field: String,
        value: Option<String>,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigError { field: String, message: String },

    #[error("YAML serialization error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

fn location_suffix(line: &Option<usize>, column: &Option<usize>) -> String {
    match (line, column) {
        (Some(line), Some(column)) => format!(" (line {}, column {})", line, column),
        (Some(line), None) => format!(" (line {})", line),
        _ => String::new(),
    }
}

impl CffError {
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        CffError::ParseError {
            path: path.into(),
            message: message.into(),
            line: None,
            column: None,
        }
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CffError::ValidationError {
            field: field.into(),
            value: None,
            reason: reason.into(),
        }
    }

    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CffError::ValidationError {
            field: field.into(),
            value: Some(value.into()),
            reason: reason.into(),
        }
    }

    /// Dotted CFF path of the offending field, for parse and validation failures.
    pub fn field_path(&self) -> Option<&str> {
        match self {
            CffError::ParseError { path, .. } => Some(path),
            CffError::ValidationError { field, .. } => Some(field),
            CffError::ConfigError { field, .. } => Some(field),
            _ => None,
        }
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self, CffError::ParseError { .. })
    }

    pub fn is_validation_error(&self) -> bool {
        matches!(self, CffError::ValidationError { .. })
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CffError::IoError { path, .. } => format!("Could not read '{}'", path),
            CffError::ParseError { path, message, .. } => {
                format!("The citation file is not well-formed ({}): {}", path, message)
            }
            CffError::ValidationError {
                field,
                value: Some(value),
                reason,
            } => format!("Invalid value {:?} for '{}': {}", value, field, reason),
            CffError::ValidationError { field, reason, .. } => {
                format!("Invalid citation metadata at '{}': {}", field, reason)
            }
            CffError::ConfigError { field, message } => {
                format!("Invalid configuration '{}': {}", field, message)
            }
            CffError::YamlError(e) => format!("YAML error: {}", e),
            CffError::JsonError(e) => format!("JSON error: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CffError::IoError { .. } => "Check that the file exists and is readable, or pass --file",
            CffError::ParseError { .. } => {
                "Fix the YAML structure; check indentation, quoting and value types"
            }
            CffError::ValidationError { .. } => {
                "Edit the citation file so the field matches the CFF 1.2.0 schema"
            }
            CffError::ConfigError { .. } => "Check cffcite.toml or the command line flags",
            CffError::YamlError(_) | CffError::JsonError(_) => {
                "This is likely a bug, please report it with the input file"
            }
        }
    }

    /// 1 when the citation file itself is bad, 2 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            CffError::ParseError { .. } | CffError::ValidationError { .. } => 1,
            _ => 2,
        }
    }
}

pub type Result<T> = std::result::Result<T, CffError>;
