use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use engine::{Language, LanguageSet};

/// Language definitions loaded from a TOML config file:
///
/// ```toml
/// [languages.python]
/// extension = ".py"
/// run = "python3 {file}"
/// interactive = "python3 -i -q"
/// prompt = ">>> "
/// ```
#[derive(Debug, Deserialize)]
pub struct WeaveConfig {
    #[serde(default)]
    pub languages: BTreeMap<String, LanguageConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageConfig {
    /// File extension including the dot (".py").
    pub extension: String,

    /// Command template to execute a source; `{file}` is replaced by the
    /// tangled file's path.
    #[serde(default)]
    pub run: Option<String>,

    /// Command template for finalize/compile (`done`).
    #[serde(default)]
    pub compile: Option<String>,

    /// Command template for an interactive session reading stdin.
    #[serde(default)]
    pub interactive: Option<String>,

    /// Prompt shown before each interactive input line.
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Whether rendered source gets line numbers.
    #[serde(default)]
    pub number_lines: bool,
}

fn default_prompt() -> String {
    ">>> ".to_string()
}

impl WeaveConfig {
    pub fn load(path: &Path) -> Result<WeaveConfig, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;
        toml::from_str(&text).map_err(|e| format!("invalid config '{}': {}", path.display(), e))
    }

    /// Built-in defaults used when no config file is given.
    pub fn builtin() -> WeaveConfig {
        let mut languages = BTreeMap::new();
        languages.insert(
            "python".to_string(),
            LanguageConfig {
                extension: ".py".to_string(),
                run: Some("python3 {file}".to_string()),
                compile: None,
                interactive: Some("python3 -i -q".to_string()),
                prompt: ">>> ".to_string(),
                number_lines: false,
            },
        );
        languages.insert(
            "sh".to_string(),
            LanguageConfig {
                extension: ".sh".to_string(),
                run: Some("sh {file}".to_string()),
                compile: None,
                interactive: Some("sh".to_string()),
                prompt: "$ ".to_string(),
                number_lines: false,
            },
        );
        WeaveConfig { languages }
    }

    /// The configured languages as the engine's lookup set.
    pub fn language_set(&self) -> LanguageSet {
        let mut set = LanguageSet::new();
        for (name, entry) in &self.languages {
            set.insert(Box::new(ConfiguredLanguage {
                name: name.clone(),
                extension: entry.extension.clone(),
                prompt: entry.prompt.clone(),
                number_lines: entry.number_lines,
            }));
        }
        set
    }
}

/// A configured language, implementing the engine's presentation policy.
struct ConfiguredLanguage {
    name: String,
    extension: String,
    prompt: String,
    number_lines: bool,
}

impl Language for ConfiguredLanguage {
    fn name(&self) -> &str {
        &self.name
    }

    fn extension(&self) -> &str {
        &self.extension
    }

    fn number_lines(&self) -> bool {
        self.number_lines
    }

    fn interactive_prompt(&self) -> &str {
        &self.prompt
    }
}
