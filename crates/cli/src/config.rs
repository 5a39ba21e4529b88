//! Shell configuration

use std::str::FromStr;

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Display form, e.g. `#00050000`
    #[default]
    Text,
    /// One JSON record per line
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Shell configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Prompt printed before each line when attached to a terminal
    pub prompt: String,

    /// Input that ends the session (case-insensitive)
    pub exit_keyword: String,

    /// Result format
    pub output: OutputFormat,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "q16>".to_string(),
            exit_keyword: "exit".to_string(),
            output: OutputFormat::Text,
        }
    }
}

impl ShellConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(prompt) = lookup("Q16_PROMPT") {
            config.prompt = prompt;
        }

        if let Some(keyword) = lookup("Q16_EXIT_KEYWORD") {
            let keyword = keyword.trim();
            if !keyword.is_empty() {
                config.exit_keyword = keyword.to_string();
            }
        }

        if let Some(output) = lookup("Q16_OUTPUT") {
            match output.parse() {
                Ok(format) => config.output = format,
                Err(e) => tracing::warn!("Ignoring Q16_OUTPUT: {}", e),
            }
        }

        config
    }

    /// Whether a line of input ends the session
    pub fn is_exit(&self, line: &str) -> bool {
        line.trim().eq_ignore_ascii_case(&self.exit_keyword)
    }
}
