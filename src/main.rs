use clap::Parser;
use yamodool::utils::{logger, validation::Validate};
use yamodool::{CliConfig, InMemoryRegistry, ModelLoader, OutputFormat, YamlDocument, YamodoolError};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting yamodool CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        fail(&e);
    }

    let output = match &config.module {
        None => print_document(&config),
        Some(module) => generate_models(&config, module),
    };

    match output {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(e) => fail(&e),
    }
}

/// 只解析並輸出原始文件內容
fn print_document(config: &CliConfig) -> yamodool::Result<String> {
    let document = YamlDocument::load(&config.path)?;
    render(config.format, document.data())
}

fn generate_models(config: &CliConfig, module: &str) -> yamodool::Result<String> {
    let loader_config = config.loader_config()?;
    let mut loader = ModelLoader::new(InMemoryRegistry::new(), loader_config);

    let count = loader.load(module, Some(config.path.as_path()), &[])?;
    tracing::info!("✅ Generated {} model(s)", count);

    render(config.format, loader.registry().models())
}

fn render<T: serde::Serialize + ?Sized>(format: OutputFormat, value: &T) -> yamodool::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
    }
}

fn fail(e: &YamodoolError) -> ! {
    tracing::error!("❌ {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(1);
}
