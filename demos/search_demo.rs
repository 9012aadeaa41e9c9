// Demonstration: solve a small level with every search strategy.
//
// Run from the repo root:
//   RUST_LOG=info cargo run --example search_demo -- --solver astar --max-depth 60

use std::env;

use lavaqua::algorithms::{SearchConfig, SolverKind, SolverSettings};
use lavaqua::{GridState, LevelSpec};
use tracing_subscriber::EnvFilter;

const LEVEL: &str = "\
##########
#P..#...E#
#.B.#....#
#...1..K.#
#######.##
#L......A#
##########";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let max_depth: Option<u32> = arg_value(&args, "--max-depth").and_then(|s| s.parse().ok());
    let max_expansions: Option<usize> =
        arg_value(&args, "--max-expansions").and_then(|s| s.parse().ok());

    let kinds: Vec<SolverKind> = match arg_value(&args, "--solver") {
        Some(name) => match name.parse() {
            Ok(kind) => vec![kind],
            Err(err) => {
                eprintln!("{}", err);
                std::process::exit(2);
            }
        },
        None => SolverKind::all(),
    };

    let spec = match LevelSpec::from_ascii(LEVEL) {
        Ok(spec) => spec.named("demo"),
        Err(err) => {
            eprintln!("bad level: {}", err);
            std::process::exit(1);
        }
    };
    let initial = match GridState::new(&spec) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("bad level: {}", err);
            std::process::exit(1);
        }
    };
    println!("{}", initial);

    let settings = SolverSettings {
        search: SearchConfig {
            max_depth,
            max_expansions,
            record_trace: false,
        },
        ..SolverSettings::default()
    };

    for kind in kinds {
        let mut solver = match kind.build(&settings) {
            Ok(solver) => solver,
            Err(err) => {
                eprintln!("{}: {}", kind, err);
                continue;
            }
        };
        let report = solver.solve(&initial);
        println!("{}", report);
        if let Some(plan) = report.plan() {
            println!("  Verified:         {}\n", plan.verify(&initial));
        }
    }
}

fn arg_value<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
