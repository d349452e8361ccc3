pub mod config;
pub mod emitter;
pub mod error;
pub mod generator;
pub mod palette;
pub mod pipeline;
pub mod scanner;
pub mod variant;
pub mod watch;

pub use error::{Error, Result};

use config::Config;
use pipeline::ProjectOptions;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAX_LISTED_UNKNOWN: usize = 20;

/// Flags shared by `scan` and `generate`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectArgs {
    pub directory: String,
    pub patterns: Option<Vec<String>>,
    pub prefix: Option<String>,
    pub allow_unprefixed: bool,
    pub config: Option<String>,
    pub ignore: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scan {
        project: ProjectArgs,
    },
    Generate {
        project: ProjectArgs,
        output: Option<String>,
        with_base: Option<bool>,
        minify: bool,
        watch: bool,
    },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    pub message: String,
}

impl From<Error> for CliError {
    fn from(err: Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

pub fn run(command: Command) -> std::result::Result<(), CliError> {
    match command {
        Command::Scan { project } => run_scan(&project),
        Command::Generate {
            project,
            output,
            with_base,
            minify,
            watch,
        } => run_generate(&project, output, with_base, minify, watch),
        Command::Help => {
            print_help();
            Ok(())
        }
    }
}

pub fn run_from_env() -> std::result::Result<(), CliError> {
    let command = parse_args(env::args().skip(1))?;
    run(command)
}

pub fn parse_args<I>(args: I) -> std::result::Result<Command, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut iter = args.into_iter();
    let Some(cmd) = iter.next() else {
        return Ok(Command::Help);
    };

    match cmd.as_str() {
        "scan" => parse_scan_args(iter.collect()),
        "generate" => parse_generate_args(iter.collect()),
        "-h" | "--help" | "help" => Ok(Command::Help),
        _ => Err(CliError {
            message: format!("unknown command: {}", cmd),
        }),
    }
}

fn parse_scan_args(args: Vec<String>) -> std::result::Result<Command, CliError> {
    let mut project = ProjectArgs::default();
    let mut directory = None;
    let mut idx = 0;

    while idx < args.len() {
        if !parse_project_flag(&args, &mut idx, &mut project, "scan")? {
            take_directory(&args[idx], &mut directory, "scan")?;
        }
        idx += 1;
    }

    project.directory = directory.ok_or_else(|| CliError {
        message: "scan requires a directory".to_string(),
    })?;
    Ok(Command::Scan { project })
}

fn parse_generate_args(args: Vec<String>) -> std::result::Result<Command, CliError> {
    let mut project = ProjectArgs::default();
    let mut directory = None;
    let mut output = None;
    let mut with_base = None;
    let mut minify = false;
    let mut watch = false;
    let mut idx = 0;

    while idx < args.len() {
        if parse_project_flag(&args, &mut idx, &mut project, "generate")? {
            idx += 1;
            continue;
        }
        match args[idx].as_str() {
            "--output" | "--out" | "-o" => {
                output = Some(take_value(&args, &mut idx, "generate", "--output")?);
            }
            "--with-base" => {
                let value = take_value(&args, &mut idx, "generate", "--with-base")?;
                with_base = Some(parse_bool_arg(&value, "--with-base")?);
            }
            "--minify" => {
                minify = true;
            }
            "--watch" | "-w" => {
                watch = true;
            }
            value => take_directory(value, &mut directory, "generate")?,
        }
        idx += 1;
    }

    project.directory = directory.ok_or_else(|| CliError {
        message: "generate requires a directory".to_string(),
    })?;
    Ok(Command::Generate {
        project,
        output,
        with_base,
        minify,
        watch,
    })
}

/// Consumes one flag shared by both commands. Returns `false` when the
/// argument at `idx` is not one of them.
fn parse_project_flag(
    args: &[String],
    idx: &mut usize,
    project: &mut ProjectArgs,
    command: &str,
) -> std::result::Result<bool, CliError> {
    match args[*idx].as_str() {
        "--patterns" | "-p" => {
            let value = take_value(args, idx, command, "--patterns")?;
            let patterns = split_list(&value);
            if patterns.is_empty() {
                return Err(CliError {
                    message: format!("{} requires at least one pattern for --patterns", command),
                });
            }
            project.patterns = Some(patterns);
        }
        "--prefix" => {
            project.prefix = Some(take_value(args, idx, command, "--prefix")?);
        }
        "--allow-unprefixed" => {
            project.allow_unprefixed = true;
        }
        "--config" | "-c" => {
            project.config = Some(take_value(args, idx, command, "--config")?);
        }
        "--ignore" | "-I" => {
            let value = take_value(args, idx, command, "--ignore")?;
            project.ignore.extend(split_list(&value));
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn take_value(
    args: &[String],
    idx: &mut usize,
    command: &str,
    flag: &str,
) -> std::result::Result<String, CliError> {
    *idx += 1;
    args.get(*idx).cloned().ok_or_else(|| CliError {
        message: format!("{} requires a value for {}", command, flag),
    })
}

fn take_directory(
    value: &str,
    directory: &mut Option<String>,
    command: &str,
) -> std::result::Result<(), CliError> {
    if value.starts_with('-') && value.len() > 1 {
        return Err(CliError {
            message: format!("unknown option for {}: {}", command, value),
        });
    }
    if directory.is_some() {
        return Err(CliError {
            message: format!("{} accepts a single directory, got extra '{}'", command, value),
        });
    }
    *directory = Some(value.to_string());
    Ok(())
}

fn parse_bool_arg(value: &str, flag: &str) -> std::result::Result<bool, CliError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(CliError {
            message: format!("{} expects true or false, got '{}'", flag, value),
        }),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Project config with command-line flags applied on top.
fn resolve_config(project: &ProjectArgs) -> std::result::Result<Config, CliError> {
    let directory = Path::new(&project.directory);
    let mut config = config::discover(directory, project.config.as_deref().map(Path::new))?;

    if let Some(prefix) = &project.prefix {
        config.prefix = prefix.clone();
    }
    if let Some(patterns) = &project.patterns {
        config.patterns = patterns.clone();
    }
    if project.allow_unprefixed {
        config.allow_unprefixed = true;
    }
    config.ignore.extend(project.ignore.iter().cloned());
    Ok(config)
}

fn run_scan(project: &ProjectArgs) -> std::result::Result<(), CliError> {
    let config = resolve_config(project)?;
    let options = ProjectOptions::from_config(&config);
    let report = pipeline::scan_project(Path::new(&project.directory), &options)?;

    println!("Total classes: {}", report.total);
    println!("Recognized: {}", report.recognized);
    println!("Unknown: {}", report.unknown.len());
    if !report.unknown.is_empty() {
        println!();
        println!("Unknown classes:");
        for class in report.unknown.iter().take(MAX_LISTED_UNKNOWN) {
            println!("  {}", class);
        }
        if report.unknown.len() > MAX_LISTED_UNKNOWN {
            println!("  ... and {} more", report.unknown.len() - MAX_LISTED_UNKNOWN);
        }
    }
    eprintln!("scanned {} files", report.files);
    Ok(())
}

fn run_generate(
    project: &ProjectArgs,
    output: Option<String>,
    with_base: Option<bool>,
    minify: bool,
    watch: bool,
) -> std::result::Result<(), CliError> {
    let mut config = resolve_config(project)?;
    if let Some(with_base) = with_base {
        config.include_base = with_base;
    }
    if minify {
        config.minify = true;
    }

    let directory = Path::new(&project.directory);
    let output = output_path(directory, output.as_deref(), &config);
    let options = ProjectOptions::from_config(&config);

    if watch {
        let debounce = Duration::from_millis(config.debounce_ms);
        return crate::watch::watch(directory, options, &output, debounce).map_err(CliError::from);
    }

    let result = pipeline::generate_project(directory, &options, &output)?;
    println!(
        "Generated {} classes ({} bytes) -> {}",
        result.rule_count,
        result.bytes(),
        output.display()
    );
    if !result.unknown.is_empty() {
        eprintln!("{} unknown classes skipped", result.unknown.len());
    }
    Ok(())
}

/// `-o` is taken as given; the configured output is relative to the project.
fn output_path(directory: &Path, flag: Option<&str>, config: &Config) -> PathBuf {
    match flag {
        Some(path) => PathBuf::from(path),
        None => directory.join(&config.output),
    }
}

fn print_help() {
    println!("vibe");
    println!();
    println!("USAGE:");
    println!(
        "  vibe scan <directory> [--patterns <p1,p2,...>] [--prefix <name>] [--allow-unprefixed] [--config <path>] [--ignore <class,...>]"
    );
    println!(
        "  vibe generate <directory> [--output <file>] [--prefix <name>] [--with-base true|false] [--patterns <p1,p2,...>] [--minify] [--watch] [--config <path>] [--ignore <class,...>]"
    );
    println!();
    println!("EXAMPLES:");
    println!("  vibe scan ./src");
    println!("  vibe scan ./src --patterns \"*.razor,*.html\"");
    println!("  vibe generate ./src -o wwwroot/css/vibe.css");
    println!("  vibe generate ./src --prefix ui --with-base false --minify");
    println!("  vibe generate ./src --watch");
    println!();
    println!("Set VIBE_LOG=debug for diagnostic output.");
}

#[cfg(test)]
mod tests {
    use super::{Command, ProjectArgs, output_path, parse_args, resolve_config};
    use crate::config::Config;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn no_arguments_prints_help() {
        assert_eq!(parse_args(Vec::new()).expect("help"), Command::Help);
        assert_eq!(parse_args(args(&["--help"])).expect("help"), Command::Help);
    }

    #[test]
    fn parse_scan_supports_patterns_and_prefix() {
        let command = parse_args(args(&[
            "scan",
            "./src",
            "--patterns",
            "*.razor, *.html",
            "--prefix",
            "ui",
        ]))
        .expect("scan args should parse");

        assert_eq!(
            command,
            Command::Scan {
                project: ProjectArgs {
                    directory: "./src".to_string(),
                    patterns: Some(vec!["*.razor".to_string(), "*.html".to_string()]),
                    prefix: Some("ui".to_string()),
                    ..ProjectArgs::default()
                },
            }
        );
    }

    #[test]
    fn parse_generate_supports_all_flags() {
        let command = parse_args(args(&[
            "generate",
            "-o",
            "dist/app.css",
            "--with-base",
            "false",
            "--minify",
            "--watch",
            "--ignore",
            "vibe-debug,vibe-x",
            "site",
        ]))
        .expect("generate args should parse");

        assert_eq!(
            command,
            Command::Generate {
                project: ProjectArgs {
                    directory: "site".to_string(),
                    ignore: vec!["vibe-debug".to_string(), "vibe-x".to_string()],
                    ..ProjectArgs::default()
                },
                output: Some("dist/app.css".to_string()),
                with_base: Some(false),
                minify: true,
                watch: true,
            }
        );
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse_args(args(&["build", "src"])).is_err());
        assert!(parse_args(args(&["scan"])).is_err());
        assert!(parse_args(args(&["scan", "a", "b"])).is_err());
        assert!(parse_args(args(&["scan", "a", "--bogus"])).is_err());
        assert!(parse_args(args(&["generate", "a", "--output"])).is_err());
        let err = parse_args(args(&["generate", "a", "--with-base", "yes"]))
            .expect_err("should reject");
        assert!(err.message.contains("--with-base"));
    }

    #[test]
    fn flags_override_project_config() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(
            dir.path().join("vibe.toml"),
            "prefix = \"app\"\nignore = [\"app-debug\"]\n",
        )
        .expect("write config");

        let project = ProjectArgs {
            directory: dir.path().display().to_string(),
            prefix: Some("ui".to_string()),
            ignore: vec!["ui-x".to_string()],
            ..ProjectArgs::default()
        };
        let config = resolve_config(&project).expect("config");
        assert_eq!(config.prefix, "ui");
        assert_eq!(config.ignore, vec!["app-debug".to_string(), "ui-x".to_string()]);
    }

    #[test]
    fn output_defaults_inside_project() {
        let config = Config::default();
        assert_eq!(
            output_path(Path::new("site"), None, &config),
            PathBuf::from("site/vibe.css")
        );
        assert_eq!(
            output_path(Path::new("site"), Some("out.css"), &config),
            PathBuf::from("out.css")
        );
    }
}
