use clap::{Arg, ArgAction, ArgMatches, Command};
use poly_core::lexer;
use poly_core::parser::Parser;
use poly_core::reports::Report;
use poly_core::script::Script;
use poly_core::session::{Outcome, Session, SessionOptions};
use poly_core::{PolyErrorExt, compile_source_to_ir};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

mod logger;
mod output;
mod repl;

use output::{DiagnosticFormat, OutputHandler, token_table};

fn main() -> ExitCode {
    let cli = Command::new("poly")
        .version("0.1.0")
        .about("Compiler front end and interpreter for the poly expression language");

    let cli = setup_cli(cli);
    let matches = cli.get_matches();
    logger::init(matches.get_count("verbose"));

    match dispatch_commands(&matches) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("poly: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn file_arg(help: &'static str) -> Arg {
    Arg::new("file").help(help).required(true).index(1)
}

fn dump_arg() -> Arg {
    Arg::new("dump")
        .help("Print an intermediate stage")
        .short('d')
        .long("dump")
        .value_parser(["tokens", "ast", "ir"])
        .value_name("STAGE")
}

fn keep_going_arg() -> Arg {
    Arg::new("keep-going")
        .help("Report every failing statement instead of stopping at the first")
        .short('k')
        .long("keep-going")
        .action(ArgAction::SetTrue)
}

fn diagnostics_arg() -> Arg {
    Arg::new("diagnostics")
        .help("Format of error reports")
        .long("diagnostics")
        .value_parser(["text", "json"])
        .default_value("text")
        .value_name("FORMAT")
}

/// Sets up the CLI with subcommands and arguments.
fn setup_cli(cli: Command) -> Command {
    cli.arg(
        Arg::new("verbose")
            .help("Increase log output (-v info, -vv debug, -vvv trace)")
            .short('v')
            .long("verbose")
            .action(ArgAction::Count)
            .global(true),
    )
    .subcommand(
        Command::new("build")
            .about("Compile a script and print its IR module")
            .arg(file_arg("The script file to build"))
            .arg(dump_arg())
            .arg(diagnostics_arg())
            .arg(
                Arg::new("emit")
                    .help("Output format of the module")
                    .short('e')
                    .long("emit")
                    .value_parser(["ir", "json"])
                    .default_value("ir")
                    .value_name("FORMAT"),
            )
            .arg(
                Arg::new("output")
                    .help("Write the module to a file instead of stdout")
                    .short('o')
                    .long("output")
                    .value_parser(clap::value_parser!(PathBuf))
                    .value_name("FILE"),
            ),
    )
    .subcommand(
        Command::new("run")
            .about("Run a script file, printing the value of every top-level expression")
            .arg(file_arg("The script file to run"))
            .arg(dump_arg())
            .arg(keep_going_arg())
            .arg(diagnostics_arg())
            .arg(
                Arg::new("no-eval")
                    .help("Lower top-level expressions without evaluating them")
                    .long("no-eval")
                    .action(ArgAction::SetTrue),
            ),
    )
    .subcommand(
        Command::new("repl")
            .about("Start an interactive session (the default)")
            .arg(keep_going_arg()),
    )
}

fn diagnostics_format(matches: &ArgMatches) -> DiagnosticFormat {
    match matches.get_one::<String>("diagnostics").map(String::as_str) {
        Some("json") => DiagnosticFormat::Json,
        _ => DiagnosticFormat::Text,
    }
}

/// Dispatches the command based on the parsed arguments. `Ok(false)` means
/// the input had errors, which have already been reported.
fn dispatch_commands(matches: &ArgMatches) -> io::Result<bool> {
    match matches.subcommand() {
        Some(("build", sub_m)) => build(sub_m),
        Some(("run", sub_m)) => run(sub_m),
        Some(("repl", sub_m)) => start_repl(sub_m.get_flag("keep-going")),
        _ => start_repl(false),
    }
}

fn load_script(sub_m: &ArgMatches, err: &mut OutputHandler<io::Stderr>) -> io::Result<Option<Script>> {
    let file = match sub_m.get_one::<String>("file") {
        Some(file) => file,
        None => return Ok(None),
    };
    match Script::new(PathBuf::from(file)) {
        Ok(script) => Ok(Some(script)),
        Err(e) => {
            err.report(&Report::new(e.level(), &e.issuer(), &e.message()))?;
            Ok(None)
        }
    }
}

fn report_all(
    errors: &[Box<dyn PolyErrorExt>],
    script: &Script,
    err: &mut OutputHandler<io::Stderr>,
) -> io::Result<()> {
    for error in errors {
        err.report(&Report::from_error(error.as_ref(), script))?;
    }
    err.flush()
}

/// Prints the token or AST stage. Returns false when the stage could not be
/// produced; the errors are left for the main pipeline to report.
fn dump_front_end(stage: &str, script: &Script, out: &mut OutputHandler<io::Stdout>) -> io::Result<bool> {
    let scanned = lexer::scan(&script.content);
    match stage {
        "tokens" => {
            out.raw(&format!("{}\n", token_table(&scanned.tokens)))?;
            Ok(!scanned.has_errors())
        }
        "ast" => {
            if scanned.has_errors() {
                return Ok(false);
            }
            match Parser::new(scanned.tokens).parse() {
                Ok(stmts) => {
                    let json = serde_json::to_string_pretty(&stmts).map_err(io::Error::other)?;
                    out.raw(&format!("{}\n", json))?;
                    Ok(true)
                }
                Err(_) => Ok(false),
            }
        }
        _ => Ok(true),
    }
}

fn build(sub_m: &ArgMatches) -> io::Result<bool> {
    let mut out = OutputHandler::new(io::stdout());
    let mut err = OutputHandler::new(io::stderr()).with_diagnostics(diagnostics_format(sub_m));
    let Some(script) = load_script(sub_m, &mut err)? else {
        return Ok(false);
    };

    if let Some(stage) = sub_m.get_one::<String>("dump") {
        dump_front_end(stage, &script, &mut out)?;
    }

    let module = match compile_source_to_ir(&script) {
        Ok(module) => module,
        Err(e) => {
            err.report(&Report::from_error(e.as_ref(), &script))?;
            return Ok(false);
        }
    };
    log::info!("built module '{}' with {} function(s)", module.name, module.len());

    let rendered = match sub_m.get_one::<String>("emit").map(String::as_str) {
        Some("json") => module.to_json().map_err(io::Error::other)? + "\n",
        _ => module.to_string(),
    };

    match sub_m.get_one::<PathBuf>("output") {
        Some(path) => {
            fs::write(path, rendered)?;
            out.success(&format!("wrote {}", path.display()))?;
        }
        None => out.raw(&rendered)?,
    }
    out.flush()?;
    Ok(true)
}

fn run(sub_m: &ArgMatches) -> io::Result<bool> {
    let mut out = OutputHandler::new(io::stdout());
    let mut err = OutputHandler::new(io::stderr()).with_diagnostics(diagnostics_format(sub_m));
    let Some(script) = load_script(sub_m, &mut err)? else {
        return Ok(false);
    };

    let dump = sub_m.get_one::<String>("dump").map(String::as_str);
    if let Some(stage) = dump {
        dump_front_end(stage, &script, &mut out)?;
    }

    let options = SessionOptions {
        keep_going: sub_m.get_flag("keep-going"),
        evaluate: !sub_m.get_flag("no-eval"),
    };
    let mut session = Session::new(&script.name, options);
    let execution = session.execute(&script);

    for outcome in &execution.outcomes {
        match outcome {
            Outcome::Evaluated { value: Some(v), .. } => out.value(*v)?,
            Outcome::Evaluated { value: None, .. } => {}
            Outcome::Declared { name, .. } => log::info!("declared {}", name),
            Outcome::Defined { name, .. } => log::info!("defined {}", name),
        }
    }
    report_all(&execution.errors, &script, &mut err)?;

    if dump == Some("ir") {
        out.raw(&session.module().to_string())?;
    }
    out.flush()?;
    Ok(execution.is_ok())
}

fn start_repl(keep_going: bool) -> io::Result<bool> {
    let mut out = OutputHandler::new(io::stdout());
    let mut err = OutputHandler::new(io::stderr());
    let options = SessionOptions {
        keep_going,
        evaluate: true,
    };
    let stdin = io::stdin();
    repl::run(stdin.lock(), &mut out, &mut err, options)?;
    io::stdout().flush()?;
    Ok(true)
}
