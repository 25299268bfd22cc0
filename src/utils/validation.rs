use crate::utils::error::{Result, YamodoolError};
use std::collections::HashSet;
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(YamodoolError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    validate_non_empty_string(field_name, path)?;

    if path.contains('\0') {
        return Err(YamodoolError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 副檔名必須不含前導點且不可重複
pub fn validate_extensions(field_name: &str, extensions: &[String]) -> Result<()> {
    if extensions.is_empty() {
        return Err(YamodoolError::ConfigValidationError {
            field: field_name.to_string(),
            message: "At least one extension is required".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for extension in extensions {
        validate_non_empty_string(field_name, extension)?;

        if extension.starts_with('.') {
            return Err(YamodoolError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: extension.clone(),
                reason: "Extension must not start with '.'".to_string(),
            });
        }

        if !seen.insert(extension.to_ascii_lowercase()) {
            return Err(YamodoolError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: extension.clone(),
                reason: "Duplicate extension".to_string(),
            });
        }
    }

    Ok(())
}

pub fn has_recognized_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// 模型只能從 addon 模組內載入；空前綴表示不檢查
pub fn validate_module_identity(module: &str, expected_prefix: &str) -> Result<()> {
    if module.trim().is_empty() || !module.starts_with(expected_prefix) {
        return Err(YamodoolError::DiscoveryMisuse {
            module: module.to_string(),
            expected_prefix: expected_prefix.to_string(),
        });
    }
    Ok(())
}
