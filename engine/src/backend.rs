use weave::display::RunResult;

use crate::error::ExecError;

/// Per-language presentation policy, opaque to the engine.
pub trait Language {
    fn name(&self) -> &str;
    /// File extension including the dot, e.g. ".py".
    fn extension(&self) -> &str;
    fn number_lines(&self) -> bool;
    fn interactive_prompt(&self) -> &str;
}

/// The process-execution seam: compiles and runs accumulated sources.
/// Calls may be slow and may fail; the cache guarantees each distinct
/// directive reaches the backend at most once per render.
pub trait Backend {
    /// Finalize/compile the named source.
    fn compile(
        &mut self,
        name: &str,
        text: &str,
        language: &dyn Language,
    ) -> Result<RunResult, ExecError>;

    /// Execute the named source and capture its text output.
    fn run(&mut self, name: &str, text: &str, language: &dyn Language)
    -> Result<String, ExecError>;

    /// Run a sequence of input lines against an interactive session. The
    /// returned lines are aligned with the inputs by the caller.
    fn run_interactive(
        &mut self,
        args: &[String],
        input: &[String],
        language: &dyn Language,
    ) -> Result<Vec<String>, ExecError>;
}

/// Languages available to a render, looked up by directive language name.
#[derive(Default)]
pub struct LanguageSet {
    languages: Vec<Box<dyn Language>>,
}

impl LanguageSet {
    pub fn new() -> Self {
        LanguageSet::default()
    }

    pub fn insert(&mut self, language: Box<dyn Language>) {
        self.languages.push(language);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Language> {
        self.languages
            .iter()
            .find(|l| l.name() == name)
            .map(Box::as_ref)
    }
}
