use crate::config::loader_config::{FailurePolicy, LoaderConfig};
use crate::core::generator::ModelGenerator;
use crate::domain::ports::ModelRegistry;
use crate::utils::error::{FileFailure, Result, YamodoolError};
use crate::utils::validation::{has_recognized_extension, validate_module_identity};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Finds yamodool files for an addon module and registers their models.
pub struct ModelLoader<R: ModelRegistry> {
    registry: R,
    config: LoaderConfig,
}

impl<R: ModelRegistry> ModelLoader<R> {
    pub fn new(registry: R, config: LoaderConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn into_registry(self) -> R {
        self.registry
    }

    /// Load models for `module`.
    ///
    /// Without `path`, the `models_dir` sub-directory of the first package path
    /// is used; when it does not exist there is nothing to load. Returns the
    /// number of registered models.
    pub fn load(
        &mut self,
        module: &str,
        path: Option<&Path>,
        package_paths: &[PathBuf],
    ) -> Result<usize> {
        validate_module_identity(module, &self.config.module_prefix)?;

        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match self.default_models_dir(package_paths) {
                Some(dir) => dir,
                None => {
                    tracing::debug!("No {} directory for module {}", self.config.models_dir, module);
                    return Ok(0);
                }
            },
        };

        tracing::info!("Loading yamodools from {} for module {}", path.display(), module);

        if path.is_file() {
            self.load_file(module, &path)?;
            Ok(1)
        } else if path.is_dir() {
            self.load_dir(module, &path)
        } else {
            Err(YamodoolError::InvalidPath { path })
        }
    }

    fn default_models_dir(&self, package_paths: &[PathBuf]) -> Option<PathBuf> {
        package_paths
            .first()
            .map(|package| package.join(&self.config.models_dir))
            .filter(|dir| dir.is_dir())
    }

    fn load_file(&mut self, module: &str, path: &Path) -> Result<()> {
        let model = ModelGenerator::open(path)?.generate_model(module)?;
        self.registry.register(model)
    }

    fn load_dir(&mut self, module: &str, dir: &Path) -> Result<usize> {
        let mut failures = Vec::new();
        let files = self.discover_files(dir, &mut failures)?;
        let mut loaded = 0;

        for file in files {
            tracing::debug!("Found yamodool file: {}", file.display());
            match self.load_file(module, &file) {
                Ok(()) => loaded += 1,
                Err(e) => match self.config.on_failure {
                    FailurePolicy::FailFast => return Err(e),
                    FailurePolicy::Collect => {
                        tracing::error!("Failed to load {}: {}", file.display(), e);
                        failures.push(FileFailure { path: file, error: e });
                    }
                },
            }
        }

        tracing::info!(
            "Loaded {} model(s) from {} ({} failed)",
            loaded,
            dir.display(),
            failures.len()
        );

        if failures.is_empty() {
            Ok(loaded)
        } else {
            Err(YamodoolError::Discovery { failures })
        }
    }

    /// 遞迴搜尋，依檔名排序以確保載入順序固定
    ///
    /// 走訪錯誤（失效連結、無法讀取的目錄）依失敗策略處理，collect 時記錄後繼續
    fn discover_files(
        &self,
        dir: &Path,
        failures: &mut Vec<FileFailure>,
    ) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(dir).to_path_buf();
                    let error = YamodoolError::IoError(std::io::Error::from(e));
                    match self.config.on_failure {
                        FailurePolicy::FailFast => return Err(error),
                        FailurePolicy::Collect => {
                            tracing::error!("Cannot walk {}: {}", path.display(), error);
                            failures.push(FileFailure { path, error });
                            continue;
                        }
                    }
                }
            };
            if entry.file_type().is_file()
                && has_recognized_extension(entry.path(), &self.config.extensions)
            {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }
}
