use std::{
    env, fs,
    path::{Path, PathBuf},
    process,
};

use fallthrough::replay::{self, ContactCounter};
use fallthrough::{
    AlwaysValid, DragValidity, GestureEngine, GestureKind, PressGatedValidity, Thresholds,
    TouchCountValidity,
};

#[derive(Clone, Copy)]
enum ValidityMode {
    Touch,
    Press,
    Always,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let mut trace_path: Option<PathBuf> = None;
    let mut expect_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut validity = ValidityMode::Touch;
    let mut verbosity = 0u8;

    let mut idx = 1usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--expect" => {
                idx += 1;
                let Some(path) = args.get(idx) else {
                    return Err("missing path after --expect".into());
                };
                expect_path = Some(PathBuf::from(path));
            }
            "--config" => {
                idx += 1;
                let Some(path) = args.get(idx) else {
                    return Err("missing path after --config".into());
                };
                config_path = Some(PathBuf::from(path));
            }
            "--validity" => {
                idx += 1;
                validity = match args.get(idx).map(String::as_str) {
                    Some("touch") => ValidityMode::Touch,
                    Some("press") => ValidityMode::Press,
                    Some("always") => ValidityMode::Always,
                    Some(other) => return Err(format!("unknown validity mode: {other}")),
                    None => return Err("missing mode after --validity".into()),
                };
            }
            "-v" => verbosity = verbosity.saturating_add(1),
            "-vv" => verbosity = verbosity.saturating_add(2),
            "-h" | "--help" => {
                println!("{}", usage());
                return Ok(());
            }
            value if value.starts_with('-') => {
                return Err(format!("unknown argument: {value}"));
            }
            value => {
                if trace_path.is_some() {
                    return Err("multiple trace paths provided".into());
                }
                trace_path = Some(PathBuf::from(value));
            }
        }
        idx += 1;
    }

    let _ = env_logger::Builder::new()
        .filter_level(log_level(verbosity))
        .format_timestamp(None)
        .try_init();

    let trace_path = trace_path.ok_or_else(usage)?;
    let thresholds = match &config_path {
        Some(path) => Thresholds::from_toml_path(path).map_err(|e| e.to_string())?,
        None => Thresholds::default(),
    };

    let source = read(&trace_path)?;
    let lines = replay::parse_trace(&source)
        .map_err(|e| format!("{}: {e}", trace_path.display()))?;

    let contacts = ContactCounter::default();
    let policy: Box<dyn DragValidity> = match validity {
        ValidityMode::Touch => Box::new(TouchCountValidity::new(contacts.query())),
        ValidityMode::Press => Box::new(PressGatedValidity),
        ValidityMode::Always => Box::new(AlwaysValid),
    };
    let mut engine = GestureEngine::with_boxed_validity(thresholds, policy);
    let events = replay::replay(&mut engine, &lines, &contacts);

    println!("gesture,ms,kind,x,y,dx,dy,detail");
    for event in &events {
        println!("{}", replay::format_event(event));
    }

    if let Some(expect_path) = expect_path {
        let expected = replay::parse_expected_kinds(&read(&expect_path)?)
            .map_err(|e| format!("{}: {e}", expect_path.display()))?;
        let actual: Vec<GestureKind> = events.iter().map(|e| e.event.kind()).collect();
        if actual != expected {
            eprintln!("expected kinds: {}", join_labels(&expected));
            eprintln!("actual kinds:   {}", join_labels(&actual));
            return Err("gesture sequence mismatch".into());
        }
    }

    Ok(())
}

fn log_level(verbosity: u8) -> log::LevelFilter {
    match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn usage() -> String {
    "usage: gesture_replay <trace.csv> [--expect expected_kinds.txt] [--config gestures.toml] \
     [--validity touch|press|always] [-v|-vv]"
        .to_string()
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("failed to open {}: {e}", path.display()))
}

fn join_labels(kinds: &[GestureKind]) -> String {
    kinds
        .iter()
        .map(|kind| kind.label())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_flags_raise_log_level() {
        assert_eq!(log_level(0), log::LevelFilter::Warn);
        assert_eq!(log_level(1), log::LevelFilter::Debug);
        assert_eq!(log_level(2), log::LevelFilter::Trace);
        assert_eq!(log_level(3), log::LevelFilter::Trace);
    }
}
