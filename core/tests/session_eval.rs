use std::io::Write;

use poly_core::ir::FunctionState;
use poly_core::script::Script;
use poly_core::session::{Outcome, Session, SessionOptions};
use poly_core::{Report, compile_source_to_ir};

fn chunk(src: &str) -> Script {
    Script::from_source("<test>", src)
}

#[test]
fn evaluates_top_level_expressions_and_erases_them() {
    let mut session = Session::new("test", SessionOptions::default());
    let execution = session.execute(&chunk("def double(x) return x * 2 end double(21) 1 + 2"));
    assert!(execution.is_ok(), "errors: {:?}", execution.errors);
    assert_eq!(execution.values(), vec![42.0, 3.0]);
    assert!(matches!(&execution.outcomes[0], Outcome::Defined { name, .. } if name == "double"));

    assert!(session.module().get_function("__anon_expr").is_none());
    assert_eq!(session.module().len(), 1);
}

#[test]
fn definitions_persist_across_chunks() {
    let mut session = Session::new("repl", SessionOptions::default());
    assert!(session.execute(&chunk("extern sin(x)")).is_ok());
    assert!(session.execute(&chunk("def inc(x) return x + 1 end")).is_ok());
    let execution = session.execute(&chunk("inc(inc(1))"));
    assert_eq!(execution.values(), vec![3.0]);
    assert_eq!(session.module().state_of("sin"), Some(FunctionState::Declared));
    assert!(matches!(
        session.execute(&chunk("extern sin(x)")).outcomes.as_slice(),
        [Outcome::Declared { .. }]
    ));
}

#[test]
fn lexical_errors_are_all_reported_and_nothing_runs() {
    let mut session = Session::new("test", SessionOptions::default());
    let execution = session.execute(&chunk("def f(x) return x end $ @"));
    assert_eq!(execution.errors.len(), 2);
    assert!(execution.outcomes.is_empty());
    assert!(session.module().is_empty());
}

#[test]
fn parse_error_stops_whole_chunk() {
    let mut session = Session::new("test", SessionOptions::default());
    let execution = session.execute(&chunk("def f(x) return x end def g( end"));
    assert_eq!(execution.errors.len(), 1);
    assert!(session.module().get_function("f").is_none());
}

#[test]
fn lowering_error_stops_unless_keep_going() {
    let src = "nope(1) def f(x) return y end 2 * 4";

    let mut session = Session::new("test", SessionOptions::default());
    let execution = session.execute(&chunk(src));
    assert_eq!(execution.errors.len(), 1);
    assert!(execution.outcomes.is_empty());

    let options = SessionOptions {
        keep_going: true,
        ..SessionOptions::default()
    };
    let mut session = Session::new("test", options);
    let execution = session.execute(&chunk(src));
    assert_eq!(execution.errors.len(), 2);
    assert_eq!(execution.values(), vec![8.0]);
    assert!(session.module().is_empty());
}

#[test]
fn evaluation_can_be_switched_off() {
    let options = SessionOptions {
        evaluate: false,
        ..SessionOptions::default()
    };
    let mut session = Session::new("test", options);
    let execution = session.execute(&chunk("1 + 1"));
    assert!(execution.is_ok());
    match &execution.outcomes[0] {
        Outcome::Evaluated { value, ir } => {
            assert_eq!(*value, None);
            assert!(ir.contains("@__anon_expr"), "{}", ir);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert!(session.module().is_empty());
}

#[test]
fn defining_the_anonymous_function_is_rejected() {
    let mut session = Session::new("test", SessionOptions::default());
    let execution = session.execute(&chunk("def __anon_expr() return 1 end 2"));
    assert_eq!(execution.errors.len(), 1);
    assert!(session.module().is_empty());

    let execution = session.execute(&chunk("2"));
    assert!(execution.is_ok(), "errors: {:?}", execution.errors);
    assert_eq!(execution.values(), vec![2.0]);
}

#[test]
fn runtime_errors_are_reported() {
    let mut session = Session::new("test", SessionOptions::default());
    let execution = session.execute(&chunk("extern unknown_host(x) unknown_host(1)"));
    assert_eq!(execution.errors.len(), 1);
    assert_eq!(execution.errors[0].issuer(), "poly.vm");
    assert!(session.module().get_function("__anon_expr").is_none());
}

#[test]
fn reports_resolve_locations_against_the_script() {
    let script = chunk("def f(x)\n  return x + y\nend");
    let mut session = Session::new("test", SessionOptions::default());
    let execution = session.execute(&script);
    let report = Report::from_error(execution.errors[0].as_ref(), &script);
    assert_eq!(report.to_string(), "POLY | ERROR | <test>:2:14 | Unknown variable name 'y'");
    assert_eq!(report.source_line.as_deref(), Some("  return x + y"));

    let json: serde_json::Value = serde_json::from_str(&report.to_json().expect("json")).expect("valid json");
    assert_eq!(json["severity"], "Error");
    assert_eq!(json["location"]["line"], 2);
}

#[test]
fn scripts_load_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "def sq(x) return x * x end").expect("write");
    writeln!(file, "sq(12)").expect("write");

    let script = Script::new(file.path().to_path_buf()).expect("load script");
    let mut session = Session::new(&script.name, SessionOptions::default());
    assert_eq!(session.execute(&script).values(), vec![144.0]);

    let module = compile_source_to_ir(&script).expect("compile");
    assert_eq!(module.len(), 1);
    assert!(module.get_function("sq").is_some_and(|f| f.is_defined()));
}

#[test]
fn missing_script_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = Script::new(dir.path().join("absent.poly")).expect_err("missing file");
    assert_eq!(err.issuer(), "poly.script");
}
