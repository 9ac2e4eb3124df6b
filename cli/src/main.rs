mod config;
mod process;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use engine::Weaver;

use crate::config::WeaveConfig;
use crate::process::ProcessBackend;

#[derive(Parser)]
#[command(name = "mdweave", version, about = "Literate-programming weave/tangle tool")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a document, executing its directives
    Render(RenderArgs),

    /// Execute a document with display suppressed, then write all
    /// accumulated sources to the output directory
    Tangle(RenderArgs),

    /// Parse a document without executing anything (exit 0 if valid)
    Check {
        /// Markdown document to check
        file: String,
    },
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Markdown document to process
    file: String,

    /// Language config file (TOML); built-in defaults when absent
    #[arg(short, long)]
    config: Option<String>,

    /// Directory for tangled sources and scratch files
    #[arg(short, long, default_value = "weave-out")]
    out_dir: String,
}

#[derive(PartialEq, Clone, Copy)]
enum Mode {
    Render,
    Tangle,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Render(args) => do_render(args, cli.no_color, Mode::Render),
        Command::Tangle(args) => do_render(args, cli.no_color, Mode::Tangle),
        Command::Check { file } => do_check(&file, cli.no_color),
    }
}

fn do_check(file: &str, no_color: bool) {
    let (_files, _file_id, document) = parse_document(file, no_color);
    eprintln!(
        "ok: {} parsed successfully ({} directives)",
        file,
        document.directives.len()
    );
}

fn do_render(args: RenderArgs, no_color: bool, mode: Mode) {
    let color_choice = color_choice(no_color);
    let (files, file_id, document) = parse_document(&args.file, no_color);

    let config = match &args.config {
        Some(path) => match WeaveConfig::load(Path::new(path)) {
            Ok(config) => config,
            Err(message) => {
                eprintln!("error: {}", message);
                std::process::exit(1);
            }
        },
        None => WeaveConfig::builtin(),
    };

    let out_dir = PathBuf::from(&args.out_dir);
    let backend = ProcessBackend::new(out_dir.join("work"), &config);
    let mut weaver = Weaver::new(out_dir.clone(), backend, config.language_set());

    let writer = StandardStream::stderr(color_choice);
    let term_config = term::Config::default();
    let mut failed = false;

    for directive in &document.directives {
        match weaver.render_directive(directive) {
            Ok(blocks) => {
                if mode == Mode::Render {
                    for block in blocks.iter() {
                        print!("{}", block);
                        println!();
                    }
                }
            }
            Err(error) => {
                // fatal to this directive only; later directives still run
                failed = true;
                let diagnostic = Diagnostic::error()
                    .with_message(error.to_string())
                    .with_labels(vec![Label::primary(file_id, directive.span.clone())]);
                let _ =
                    term::emit_to_write_style(&mut writer.lock(), &term_config, &files, &diagnostic);
            }
        }
    }

    if mode == Mode::Tangle {
        match weaver.write_all() {
            Ok(()) => {
                for name in weaver.context().source_names() {
                    println!("wrote {}", out_dir.join(name).display());
                }
            }
            Err(error) => {
                eprintln!("error: cannot write sources: {}", error);
                std::process::exit(1);
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}

/// Read and parse the document, exiting with diagnostics on failure.
fn parse_document(
    file: &str,
    no_color: bool,
) -> (
    SimpleFiles<String, String>,
    usize,
    weave::document::WeaveDocument,
) {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", file, e);
            std::process::exit(1);
        }
    };

    let mut files = SimpleFiles::new();
    let file_id = files.add(file.to_string(), source.clone());

    let parser = weave::document::Parser::new(source, file_id);
    match parser.parse() {
        Ok(document) => (files, file_id, document),
        Err(errors) => {
            let writer = StandardStream::stderr(color_choice(no_color));
            let term_config = term::Config::default();
            for error in &errors {
                let diagnostic = error.to_diagnostic();
                let _ =
                    term::emit_to_write_style(&mut writer.lock(), &term_config, &files, &diagnostic);
            }
            std::process::exit(1);
        }
    }
}

fn color_choice(no_color: bool) -> ColorChoice {
    if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    }
}
