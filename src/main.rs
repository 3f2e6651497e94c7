use pocketcalc::config::{Config, Mode, USAGE};
use pocketcalc::{evaluate_line, format_result, logging, Error};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as ReplResult};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::process::ExitCode;
use unicode_width::UnicodeWidthChar;

const PROMPT: &str = "Enter expression: ";
const EXIT_COMMAND: &str = "exit";

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };
    if let Err(err) = logging::init(config.log_level) {
        eprintln!("Could not install logger: {err}");
    }
    log::debug!("starting with {:?}", config);

    match &config.mode {
        Mode::Help => {
            println!("{USAGE}");
            ExitCode::SUCCESS
        }
        Mode::Eval(expr) => match run_line(expr.trim(), &config, &mut io::stdout()) {
            Ok(success) => exit_code(success),
            Err(err) => {
                eprintln!("Error: {err}");
                ExitCode::FAILURE
            }
        },
        Mode::Script(path) => run_script(path, &config),
        Mode::Repl => match run_repl(&config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("Error: {err}");
                ExitCode::FAILURE
            }
        },
    }
}

#[derive(Debug, PartialEq)]
enum Line<'a> {
    Exit,
    Blank,
    Expression(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    match line.trim() {
        EXIT_COMMAND => Line::Exit,
        "" => Line::Blank,
        expr => Line::Expression(expr),
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Evaluates one expression and writes its result or the error. A failed
/// line never ends the session.
fn run_line(input: &str, config: &Config, out: &mut impl Write) -> io::Result<bool> {
    match evaluate_line(input, &config.options) {
        Ok(evaluation) => {
            if config.show_tree {
                writeln!(out, "Tree: {}", evaluation.tree)?;
            }
            writeln!(out, "{}", format_result(evaluation.value))?;
            Ok(true)
        }
        Err(err) => {
            writeln!(out, "{}", render_error(input, &err))?;
            Ok(false)
        }
    }
}

/// The message, the offending line and a caret line underneath the span.
/// Tabs are copied into the caret line so both lines expand them alike.
fn render_error(input: &str, err: &Error) -> String {
    let span = err.span();
    let indent: String = input
        .chars()
        .take(span.start())
        .map(|chr| match chr {
            '\t' => "\t".to_string(),
            _ => " ".repeat(chr.width().unwrap_or(0)),
        })
        .collect();
    let width: usize = input
        .chars()
        .skip(span.start())
        .take(span.end().saturating_sub(span.start()))
        .map(|chr| chr.width().unwrap_or(0))
        .sum();
    format!("Error: {err}\n  {input}\n  {indent}{}", "^".repeat(width.max(1)))
}

/// Evaluates every line of `source` until `exit`. Returns whether all lines
/// succeeded.
fn run_lines(source: impl BufRead, config: &Config, out: &mut impl Write) -> io::Result<bool> {
    let mut success = true;
    for (lineno, line) in source.lines().enumerate() {
        let line = line?;
        match classify(&line) {
            Line::Exit => break,
            Line::Blank => continue,
            Line::Expression(expr) => {
                log::debug!("line {}: {}", lineno + 1, expr);
                success &= run_line(expr, config, out)?;
            }
        }
    }
    Ok(success)
}

fn run_script(path: &Path, config: &Config) -> ExitCode {
    let source = match File::open(path) {
        Ok(file) => BufReader::new(file),
        Err(err) => {
            eprintln!("{}: {err}", path.display());
            return ExitCode::FAILURE;
        }
    };
    match run_lines(source, config, &mut io::stdout().lock()) {
        Ok(success) => exit_code(success),
        Err(err) => {
            eprintln!("{}: {err}", path.display());
            ExitCode::FAILURE
        }
    }
}

fn run_repl(config: &Config) -> ReplResult<()> {
    let mut rl = DefaultEditor::new()?;
    if let Some(history) = &config.history {
        if rl.load_history(history).is_err() {
            log::info!("no previous history in {}", history.display());
        }
    }
    loop {
        let readline = rl.readline(PROMPT);
        match readline {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                match classify(&line) {
                    Line::Exit => break,
                    Line::Blank => continue,
                    Line::Expression(expr) => {
                        run_line(expr, config, &mut io::stdout())?;
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => return Err(err),
        }
    }
    if let Some(history) = &config.history {
        rl.save_history(history)?;
    }
    Ok(())
}
