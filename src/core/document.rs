use crate::utils::error::{Result, YamodoolError};
use serde_yaml::{Mapping, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// A parsed yamodool file, kept as a generic YAML tree.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlDocument {
    path: PathBuf,
    data: Value,
}

impl YamlDocument {
    /// 從檔案載入 YAML 文件
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut data: Value = {
            let file = File::open(&path).map_err(|e| YamodoolError::Parse {
                path: path.clone(),
                message: e.to_string(),
            })?;
            serde_yaml::from_reader(BufReader::new(file)).map_err(|e| YamodoolError::Parse {
                path: path.clone(),
                message: e.to_string(),
            })?
        };
        resolve_merge_keys(&path, &mut data)?;

        tracing::debug!("Loaded yamodool document: {}", path.display());
        Ok(Self { path, data })
    }

    /// 從字串解析，`path` 只用於推導模型名稱與錯誤訊息
    pub fn from_yaml_str<P: AsRef<Path>>(path: P, content: &str) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut data: Value = serde_yaml::from_str(content).map_err(|e| YamodoolError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        resolve_merge_keys(&path, &mut data)?;
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn root(&self) -> Result<&Mapping> {
        self.data
            .as_mapping()
            .ok_or_else(|| YamodoolError::MalformedDocument {
                message: format!(
                    "{}: top level must be a mapping, found {}",
                    self.path.display(),
                    value_type_name(&self.data)
                ),
            })
    }

    /// 取得頂層鍵值；null 視為未設定
    pub fn get(&self, key: &str) -> Result<Option<&Value>> {
        Ok(self.root()?.get(key).filter(|value| !value.is_null()))
    }
}

/// 展開 `<<: *anchor` 合併鍵
fn resolve_merge_keys(path: &Path, data: &mut Value) -> Result<()> {
    data.apply_merge().map_err(|e| YamodoolError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
