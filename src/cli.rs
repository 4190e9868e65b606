//! Minimal CLI: typed AST JSON in → GraphQL SDL out
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use crate::ast::Ast;
use crate::emit::{self, GeneratorOptions};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// translate compiled JSON-Schema ASTs into GraphQL schema definitions
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// translate each input AST and emit GraphQL SDL
    Schema(SchemaOut),
    /// translate each input AST and report failures without emitting
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug)]
struct SchemaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// banner comment prepended to the emitted schema
    #[arg(long)]
    banner_comment: Option<String>,

    /// emit no banner comment at all
    #[arg(long, default_value_t = false)]
    no_banner: bool,

    /// output .graphql file (stdout if omitted); with multiple inputs this is
    /// treated as a directory and each schema lands in `<stem>.graphql`
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[command(flatten)]
    input_settings: InputSettings,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Schema(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let options = target.generator_options();
                let source_paths = resolve_file_path_patterns(&target.input_settings.input)?;
                let multiple = source_paths.len() > 1;
                for source_path in &source_paths {
                    let ast = load_ast(source_path)?;
                    let schema_src = emit::generate(&ast, &options).with_context(|| {
                        format!("failed to translate {}", source_path.display())
                    })?;
                    match target.out.as_ref() {
                        None => println!("{schema_src}"),
                        Some(out) => {
                            let out_path = if multiple {
                                out.join(output_file_name(source_path))
                            } else {
                                out.clone()
                            };
                            if let Some(parent) = out_path.parent() {
                                std::fs::create_dir_all(parent).with_context(|| {
                                    format!("failed to create {}", parent.display())
                                })?;
                            }
                            std::fs::write(&out_path, &schema_src).with_context(|| {
                                format!("failed to write {}", out_path.display())
                            })?;
                            eprintln!(
                                "{} wrote GraphQL schema to {}",
                                "✅".green(),
                                out_path.display()
                            );
                        }
                    }
                }
                Ok(())
            }
            Command::Check(target) => {
                let source_paths = resolve_file_path_patterns(&target.input_settings.input)?;
                let mut failures = 0usize;
                for source_path in &source_paths {
                    let outcome = load_ast(source_path)
                        .and_then(|ast| {
                            emit::generate_schema(&ast).map_err(anyhow::Error::from)
                        });
                    match outcome {
                        Ok(_) => {
                            eprintln!("{} {}", "ok".green(), source_path.display());
                        }
                        Err(error) => {
                            failures += 1;
                            eprintln!("{} {}: {error:#}", "failed".red(), source_path.display());
                        }
                    }
                }
                if failures > 0 {
                    bail!("{failures} of {} inputs failed", source_paths.len());
                }
                Ok(())
            }
        }
    }
}

impl SchemaOut {
    fn generator_options(&self) -> GeneratorOptions {
        if self.no_banner {
            return GeneratorOptions { banner_comment: String::new() };
        }
        match &self.banner_comment {
            Some(banner) => GeneratorOptions { banner_comment: banner.clone() },
            None => GeneratorOptions::default(),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn load_ast(source_path: &Path) -> anyhow::Result<Ast> {
    let source = std::fs::read_to_string(source_path)
        .with_context(|| format!("failed to read {}", source_path.display()))?;
    Ast::from_json_str(&source)
        .map_err(|error| anyhow::anyhow!(error))
        .with_context(|| format!("failed to parse AST from {}", source_path.display()))
}

fn output_file_name(source_path: &Path) -> PathBuf {
    let stem = source_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "schema".to_string());
    PathBuf::from(format!("{stem}.graphql"))
}

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();
    for raw in patterns {
        let pattern = raw.as_ref();
        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }
    Ok(out)
}
