use crate::utils::error::{Result, YamodoolError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do when one file of a directory fails to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// 全部檔案都嘗試，最後彙整回報
    #[default]
    Collect,
    FailFast,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// 模組名稱必須以此開頭；空字串表示不檢查
    pub module_prefix: String,
    /// 未指定路徑時在套件目錄下搜尋的子目錄
    pub models_dir: String,
    pub extensions: Vec<String>,
    pub on_failure: FailurePolicy,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            module_prefix: "odoo.addons".to_string(),
            models_dir: "yamodools".to_string(),
            extensions: vec!["yml".to_string()],
            on_failure: FailurePolicy::default(),
        }
    }
}

impl LoaderConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| YamodoolError::ConfigError {
            message: format!("Cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| YamodoolError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ADDON_PREFIX})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| YamodoolError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("models_dir", &self.models_dir)?;
        validation::validate_extensions("extensions", &self.extensions)?;
        Ok(())
    }
}

impl Validate for LoaderConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
