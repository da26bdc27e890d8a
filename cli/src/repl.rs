/// cli/src/repl.rs
/// description: interactive read-eval-print loop.
///
/// Every line is its own chunk. Errors are reported and the loop goes on;
/// an empty line or end of input ends the session and prints the module.

use std::io::{self, BufRead, Write};

use poly_core::reports::Report;
use poly_core::script::Script;
use poly_core::session::{Outcome, Session, SessionOptions};

use crate::output::OutputHandler;

pub const PROMPT: &str = ">>> ";

pub fn run<R: BufRead, W: Write, E: Write>(
    input: R,
    out: &mut OutputHandler<W>,
    err: &mut OutputHandler<E>,
    options: SessionOptions,
) -> io::Result<()> {
    let mut session = Session::new("<stdin>", options);
    let mut lines = input.lines();

    loop {
        out.raw(PROMPT)?;
        out.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        if line.trim().is_empty() {
            break;
        }

        let script = Script::from_source("<stdin>", &line);
        let execution = session.execute(&script);
        for outcome in &execution.outcomes {
            out.raw(outcome.ir())?;
            if let Outcome::Evaluated { value: Some(v), .. } = outcome {
                out.value(*v)?;
            }
        }
        for error in &execution.errors {
            err.report(&Report::from_error(error.as_ref(), &script))?;
        }
        err.flush()?;
    }

    out.raw("\n")?;
    out.raw(&session.module().to_string())?;
    out.flush()
}
