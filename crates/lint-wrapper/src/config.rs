use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Upper bound for concurrent work requests in a persistent worker.
pub(crate) const MAX_CONCURRENCY: usize = 1024;

#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) tool: ToolConfig,
    #[serde(default)]
    pub(crate) worker: WorkerConfig,
    #[serde(default)]
    pub(crate) limits: LimitsConfig,
}

impl Config {
    pub(crate) fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.tool.program.trim().is_empty() {
            anyhow::bail!("tool.program must not be empty");
        }
        if self.worker.concurrency == Some(0) {
            anyhow::bail!("worker.concurrency must be at least 1");
        }
        if let Some(concurrency) = self.worker.concurrency.filter(|n| *n > MAX_CONCURRENCY) {
            anyhow::bail!("worker.concurrency {concurrency} exceeds {MAX_CONCURRENCY}");
        }
        Ok(())
    }
}

/// How the analysis tool is launched.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ToolConfig {
    #[serde(default = "default_program")]
    pub(crate) program: String,
    /// Arguments placed before the forwarded ones, e.g. `["-jar", "detekt-cli.jar"]`.
    #[serde(default)]
    pub(crate) args: Vec<String>,
    #[serde(default)]
    pub(crate) env: BTreeMap<String, String>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: Vec::new(),
            env: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct WorkerConfig {
    #[serde(default)]
    pub(crate) concurrency: Option<usize>,
}

impl WorkerConfig {
    pub(crate) fn concurrency(&self) -> usize {
        self.concurrency.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|count| count.get())
                .unwrap_or(1)
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LimitsConfig {
    #[serde(default = "default_max_output_bytes")]
    pub(crate) max_output_bytes: u64,
}

impl LimitsConfig {
    pub(crate) fn max_output_bytes(&self) -> usize {
        usize::try_from(self.max_output_bytes).unwrap_or(usize::MAX)
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_output_bytes: default_max_output_bytes(),
        }
    }
}

fn default_max_output_bytes() -> u64 {
    1024 * 1024
}

fn default_program() -> String {
    "detekt".to_string()
}
