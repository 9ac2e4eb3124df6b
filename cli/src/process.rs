use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use engine::{Backend, ExecError, Language};
use weave::display::RunResult;

use crate::config::{LanguageConfig, WeaveConfig};

/// Executes accumulated sources as real processes, driven by the command
/// templates from the TOML config. Sources are written to a scratch
/// directory before each compile/run.
pub struct ProcessBackend {
    work_dir: PathBuf,
    commands: BTreeMap<String, LanguageConfig>,
}

impl ProcessBackend {
    pub fn new(work_dir: impl Into<PathBuf>, config: &WeaveConfig) -> Self {
        ProcessBackend {
            work_dir: work_dir.into(),
            commands: config.languages.clone(),
        }
    }

    fn write_source(&self, name: &str, text: &str) -> Result<PathBuf, ExecError> {
        std::fs::create_dir_all(&self.work_dir)?;
        let path = self.work_dir.join(name);
        std::fs::write(&path, text)?;
        Ok(path)
    }

    fn template(&self, language: &str, operation: &'static str) -> Result<String, ExecError> {
        let missing = || ExecError::Unsupported {
            language: language.to_string(),
            operation,
        };
        let entry = self.commands.get(language).ok_or_else(missing)?;
        let template = match operation {
            "compile" => entry.compile.as_ref(),
            "run" => entry.run.as_ref(),
            "interactive" => entry.interactive.as_ref(),
            _ => None,
        };
        template.cloned().ok_or_else(missing)
    }

    fn shell(command_line: &str) -> Command {
        let mut command = Command::new("sh");
        command.arg("-c").arg(command_line);
        command
    }
}

impl Backend for ProcessBackend {
    fn compile(
        &mut self,
        name: &str,
        text: &str,
        language: &dyn Language,
    ) -> Result<RunResult, ExecError> {
        let path = self.write_source(name, text)?;
        let command_line = self
            .template(language.name(), "compile")?
            .replace("{file}", &path.to_string_lossy());
        let output = Self::shell(&command_line).output()?;
        if !output.status.success() {
            return Err(ExecError::Compile {
                source: name.to_string(),
                detail: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        let mut captured = String::from_utf8_lossy(&output.stdout).into_owned();
        captured.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(RunResult::RawText(captured))
    }

    fn run(
        &mut self,
        name: &str,
        text: &str,
        language: &dyn Language,
    ) -> Result<String, ExecError> {
        let path = self.write_source(name, text)?;
        let command_line = self
            .template(language.name(), "run")?
            .replace("{file}", &path.to_string_lossy());
        let output = Self::shell(&command_line).output()?;
        if !output.status.success() {
            return Err(ExecError::Run {
                source: name.to_string(),
                detail: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        let mut captured = String::from_utf8_lossy(&output.stdout).into_owned();
        captured.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(captured)
    }

    fn run_interactive(
        &mut self,
        args: &[String],
        input: &[String],
        language: &dyn Language,
    ) -> Result<Vec<String>, ExecError> {
        let mut command_line = self.template(language.name(), "interactive")?;
        for arg in args {
            command_line.push(' ');
            command_line.push_str(arg);
        }

        let mut child = Self::shell(&command_line)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        // stdin is fed from its own thread while this one drains stdout;
        // writing it all up front deadlocks once a pipe buffer fills
        let stdin = child.stdin.take();
        let input = input.to_vec();
        let writer = std::thread::spawn(move || {
            if let Some(mut stdin) = stdin {
                for line in &input {
                    // a closed pipe means the session stopped reading early
                    if writeln!(stdin, "{}", line).is_err() {
                        break;
                    }
                }
            }
        });
        let output = child.wait_with_output();
        let _ = writer.join();
        let output = output?;
        if !output.status.success() {
            return Err(ExecError::Interactive {
                detail: format!("session exited with {}", output.status),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::Backend;

    struct CatLang;

    impl Language for CatLang {
        fn name(&self) -> &str {
            "cat"
        }
        fn extension(&self) -> &str {
            ".txt"
        }
        fn number_lines(&self) -> bool {
            false
        }
        fn interactive_prompt(&self) -> &str {
            "> "
        }
    }

    #[test]
    fn interactive_sessions_survive_bulk_output() {
        let mut languages = BTreeMap::new();
        languages.insert(
            "cat".to_string(),
            LanguageConfig {
                extension: ".txt".to_string(),
                run: None,
                compile: None,
                interactive: Some("cat".to_string()),
                prompt: "> ".to_string(),
                number_lines: false,
            },
        );
        let config = WeaveConfig { languages };
        let mut backend = ProcessBackend::new(std::env::temp_dir(), &config);

        // enough lines to overflow a pipe buffer in both directions
        let input: Vec<String> = (0..20_000).map(|k| format!("line {:05}", k)).collect();
        let output = backend.run_interactive(&[], &input, &CatLang).unwrap();
        assert_eq!(output.len(), input.len());
        assert_eq!(output[0], "line 00000");
        assert_eq!(output[19_999], "line 19999");
    }
}
