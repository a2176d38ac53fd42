use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::{Cli, Command, CommonArgs, ScanMethod};
use crate::config;
use crate::discover;
use crate::engine::{Base64Engine, Engine, EntropyEngine, PatternEngine};
use crate::error::Error;
use crate::patterns::PatternSet;
use crate::refdata;
use crate::report;
use crate::scanner;
use crate::throttle::ThrottleGate;

/// Runs the scanner with the given arguments, writing to stdout.
///
/// # Errors
///
/// Returns an error only when writing to the output fails; every scan-level
/// failure is reflected in the returned exit code instead.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    run_with_args_to(args, &mut std::io::stdout())
}

/// Testable variant of [`run_with_args`] that captures output in `writer`.
///
/// Exit codes: 0 on success, 1 on fatal initialization errors, 2 on usage
/// errors.
///
/// # Errors
///
/// Returns an error only when writing to `writer` fails.
pub fn run_with_args_to<W: Write>(args: Vec<String>, writer: &mut W) -> Result<i32> {
    let mut program_args = vec!["secrethunter".to_owned()];
    program_args.extend(args);
    let cli = match Cli::try_parse_from(program_args) {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                write!(writer, "{e}")?;
                writer.flush()?;
                return Ok(0);
            }
            _ => {
                eprint!("{e}");
                return Ok(2);
            }
        },
    };

    let Command::Scan(method) = cli.command;
    match execute(method, writer) {
        Ok(()) => Ok(0),
        Err(Error::Io(e)) => Err(e.into()),
        Err(e) => {
            eprintln!("{}", format!("[!!] {e}").red());
            Ok(1)
        }
    }
}

enum Selected {
    Pattern(Option<PathBuf>),
    Base64(usize),
    Entropy,
}

fn execute<W: Write>(method: ScanMethod, writer: &mut W) -> Result<(), Error> {
    let (selected, mut paths, common) = match method {
        ScanMethod::Pattern { patterns, paths, common } => {
            (Selected::Pattern(patterns), paths, common)
        }
        ScanMethod::Base64 { length, paths, common } => (Selected::Base64(length), paths, common),
        ScanMethod::Entropy { paths, common } => (Selected::Entropy, paths, common),
    };

    let throttling = config::validate_throttling(common.throttling);
    let workers = config::validate_cpu(common.cpu);

    if paths.is_empty() {
        eprintln!(
            "{}",
            "[+] No search paths provided, defaulting the search path to /".cyan()
        );
        paths.push("/".to_owned());
    }

    let gate = Arc::new(ThrottleGate::new(throttling, common.force));
    gate.start();

    let engine = build_engine(&selected, &gate)?;

    let exclusion_patterns = config::exclusion_patterns(&common.exclusions);
    if common.exclusions.trim().is_empty() {
        eprintln!(
            "{}",
            format!(
                "[+] No regular expressions provided for excluding file paths, using default ones:\n\t{}",
                exclusion_patterns.join("\n\t")
            )
            .cyan()
        );
    }
    let exclusions = config::compile_exclusions(&exclusion_patterns);

    let (directories, mut files) = config::resolve_paths(&paths);
    let mut excluded_paths = Vec::new();
    for directory in &directories {
        eprintln!(
            "{}",
            format!("[*] Processing directory {}", directory.display()).cyan()
        );
        let found = discover::find_text_files(directory, &exclusions, workers);
        eprintln!(
            "{}",
            format!("[+] Found {} files in {}", found.files.len(), directory.display()).cyan()
        );
        if !found.excluded.is_empty() {
            eprintln!(
                "{}",
                format!(
                    "[+] {} paths were excluded based on provided patterns",
                    found.excluded.len()
                )
                .cyan()
            );
        }
        files.extend(found.files);
        excluded_paths.extend(found.excluded);
    }

    eprintln!("{}", format!("[*] Started scanning {} files.", files.len()).cyan());
    let (reports, secrets_found) = scanner::scan_files(&files, &engine, workers);
    gate.stop();

    write_report(writer, &common, &reports, secrets_found, &excluded_paths)?;
    Ok(())
}

fn build_engine(selected: &Selected, gate: &Arc<ThrottleGate>) -> Result<Engine, Error> {
    match selected {
        Selected::Pattern(patterns_file) => {
            let set = match patterns_file {
                Some(path) => {
                    let set = PatternSet::from_file(path)?;
                    eprintln!(
                        "{}",
                        format!(
                            "[*] Loaded {} secret patterns from {} file",
                            set.len(),
                            path.display()
                        )
                        .cyan()
                    );
                    set
                }
                None => {
                    let set = PatternSet::builtin()?;
                    eprintln!(
                        "{}",
                        format!(
                            "[*] No file with secret patterns provided, using default {} secret patterns",
                            set.len()
                        )
                        .cyan()
                    );
                    set
                }
            };
            Ok(Engine::Pattern(PatternEngine::new(set, Arc::clone(gate))))
        }
        Selected::Base64(length) => Ok(Engine::Base64(Base64Engine::new(*length))),
        Selected::Entropy => {
            let data = refdata::load()?;
            eprintln!(
                "{}",
                format!("[+] Loaded {} words of English dictionary", data.english.len()).cyan()
            );
            eprintln!(
                "{}",
                format!("[+] Loaded {} breached passwords", data.passwords.len()).cyan()
            );
            eprintln!(
                "{}",
                format!("[+] Loaded {} Linux system words", data.linux_words.len()).cyan()
            );
            eprintln!(
                "{}",
                format!(
                    "[+] Entropy sets carry {}/{}/{} entries (words/breaches/generated)",
                    data.words.len(),
                    data.breaches.len(),
                    data.generated.len()
                )
                .cyan()
            );
            Ok(Engine::Entropy(EntropyEngine::new(data)))
        }
    }
}

fn write_report<W: Write>(
    writer: &mut W,
    common: &CommonArgs,
    reports: &[scanner::ScanReport],
    secrets_found: usize,
    excluded_paths: &[String],
) -> Result<(), Error> {
    if common.out == "Stdout" {
        report::render(writer, reports, secrets_found, excluded_paths)?;
        return Ok(());
    }

    match File::create(&common.out) {
        Ok(mut sink) => {
            eprintln!(
                "{}",
                format!("[*] Scan results will be saved to {} file", common.out).cyan()
            );
            report::render(&mut sink, reports, secrets_found, excluded_paths)?;
            if reports.is_empty() {
                writeln!(writer, "[-] No secrets found")?;
            } else {
                writeln!(
                    writer,
                    "[+] Found {secrets_found} secrets in {} files",
                    reports.len()
                )?;
            }
        }
        Err(e) => {
            eprintln!(
                "{}",
                format!(
                    "[!!] Cannot create report file {} due to the error {e}. Scan results will be printed to Stdout.",
                    common.out
                )
                .yellow()
            );
            report::render(writer, reports, secrets_found, excluded_paths)?;
        }
    }
    Ok(())
}
