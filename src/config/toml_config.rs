use crate::core::loader::LoadOptions;
use crate::core::normalize::WhitespacePolicy;
use crate::core::render::OutputFormat;
use crate::utils::error::{CffError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "cffcite.toml";
pub const DEFAULT_CITATION_FILE: &str = "CITATION.cff";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoaderConfig {
    pub path: Option<String>,
    pub whitespace: Option<WhitespacePolicy>,
    pub require_preferred_citation: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    pub format: Option<String>,
    pub output_path: Option<String>,
}

impl ProjectConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(&path).map_err(|source| CffError::IoError {
                path: path.as_ref().display().to_string(),
                source,
            })?;
        Self::from_toml_str(&content)
    }

    /// 讀取 `cffcite.toml`（若存在於工作目錄），否則使用預設值
    pub fn discover() -> Result<Self> {
        if Path::new(DEFAULT_CONFIG_FILE).is_file() {
            tracing::debug!("Using {}", DEFAULT_CONFIG_FILE);
            Self::from_file(DEFAULT_CONFIG_FILE)
        } else {
            Ok(Self::default())
        }
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CffError::ConfigError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CITATION_PATH})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(path) = &self.loader.path {
            crate::utils::validation::validate_path("loader.path", path)?;
        }

        if let Some(output_path) = &self.render.output_path {
            crate::utils::validation::validate_path("render.output_path", output_path)?;
        }

        self.output_format()?;
        Ok(())
    }

    /// 取得引用檔案路徑
    pub fn citation_path(&self) -> &str {
        self.loader.path.as_deref().unwrap_or(DEFAULT_CITATION_FILE)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            whitespace: self.loader.whitespace.unwrap_or_default(),
            require_preferred_citation: self.loader.require_preferred_citation.unwrap_or(false),
        }
    }

    /// 取得輸出格式 (預設 APA)
    pub fn output_format(&self) -> Result<OutputFormat> {
        match &self.render.format {
            Some(format) => format.parse(),
            None => Ok(OutputFormat::default()),
        }
    }
}

impl Validate for ProjectConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[loader]
path = "docs/CITATION.cff"
whitespace = "reject"
require_preferred_citation = true

[render]
format = "bibtex"
output_path = "citation.bib"
"#;

        let config = ProjectConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.citation_path(), "docs/CITATION.cff");
        assert_eq!(
            config.load_options(),
            LoadOptions {
                whitespace: WhitespacePolicy::Reject,
                require_preferred_citation: true,
            }
        );
        assert_eq!(config.output_format().unwrap(), OutputFormat::Bibtex);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ProjectConfig::from_toml_str("").unwrap();
        assert_eq!(config.citation_path(), DEFAULT_CITATION_FILE);
        assert_eq!(config.load_options(), LoadOptions::default());
        assert_eq!(config.output_format().unwrap(), OutputFormat::Apa);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CFFCITE_TEST_CITATION_PATH", "meta/CITATION.cff");

        let toml_content = r#"
[loader]
path = "${CFFCITE_TEST_CITATION_PATH}"
"#;

        let config = ProjectConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.citation_path(), "meta/CITATION.cff");

        std::env::remove_var("CFFCITE_TEST_CITATION_PATH");
    }

    #[test]
    fn test_config_validation() {
        let config = ProjectConfig::from_toml_str("[render]\nformat = \"ris\"\n").unwrap();
        assert!(config.validate().is_err());

        let config = ProjectConfig::from_toml_str("[loader]\npath = \"\"\n").unwrap();
        let err = config.validate().unwrap_err();
        assert_eq!(err.field_path(), Some("loader.path"));
    }

    #[test]
    fn test_unknown_whitespace_policy_fails_to_parse() {
        let err = ProjectConfig::from_toml_str("[loader]\nwhitespace = \"strip\"\n").unwrap_err();
        assert_eq!(err.field_path(), Some("toml_parsing"));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[render]\nformat = \"json\"\n")
            .unwrap();

        let config = ProjectConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output_format().unwrap(), OutputFormat::Json);
    }
}
