//! file: core/src/vm/host.rs
//! description: host implementations for body-less `extern` functions.
//!
//! A function that was only declared (`extern sin(x)`) can still be called
//! when the host provides it. Lookup is by name and arity.
//!
pub(crate) fn host_arity(name: &str) -> Option<usize> {
    match name {
        "sin" | "cos" | "tan" | "sqrt" | "exp" | "log" | "fabs" | "floor" | "ceil" => Some(1),
        "pow" | "fmod" | "atan2" => Some(2),
        "printd" | "putchard" => Some(1),
        _ => None,
    }
}

/// Runs host function `name`. Returns `None` when the host does not provide
/// a function of that name and argument count.
pub(crate) fn run_host_fn(name: &str, args: &[f64]) -> Option<f64> {
    if host_arity(name) != Some(args.len()) {
        return None;
    }
    let value = match (name, args) {
        ("sin", [x]) => x.sin(),
        ("cos", [x]) => x.cos(),
        ("tan", [x]) => x.tan(),
        ("sqrt", [x]) => x.sqrt(),
        ("exp", [x]) => x.exp(),
        ("log", [x]) => x.ln(),
        ("fabs", [x]) => x.abs(),
        ("floor", [x]) => x.floor(),
        ("ceil", [x]) => x.ceil(),
        ("pow", [x, y]) => x.powf(*y),
        ("fmod", [x, y]) => x % y,
        ("atan2", [y, x]) => y.atan2(*x),
        ("printd", [x]) => {
            println!("{}", x);
            0.0
        }
        ("putchard", [x]) => {
            if let Some(c) = char::from_u32(*x as u32) {
                print!("{}", c);
            }
            0.0
        }
        _ => return None,
    };
    Some(value)
}
