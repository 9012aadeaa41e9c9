// Demonstration: train a Q-learning agent, evaluate it, save it and replay
// its greedy policy.
//
// Run from the repo root:
//   RUST_LOG=info cargo run --example qlearning_demo -- --episodes 3000 --seed 7 --save policy.json

#[cfg(all(feature = "rl", feature = "serde"))]
fn main() {
    use std::env;
    use std::sync::atomic::AtomicBool;

    use lavaqua::algorithms::rl::{
        EvaluationMetrics, Environment, QLearningAgent, QLearningConfig, QLearningSolver,
        SavedPolicy, Trainer,
    };
    use lavaqua::{GridState, LevelSpec, Solver};
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let episodes: usize = arg_value(&args, "--episodes")
        .and_then(|s| s.parse().ok())
        .unwrap_or(2000);
    let seed: u64 = arg_value(&args, "--seed")
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let save_path = arg_value(&args, "--save");
    let load_path = arg_value(&args, "--load");

    let level = "\
P....
.#L##
.###K
....E";
    let initial = match LevelSpec::from_ascii(level)
        .and_then(|spec| GridState::new(&spec.named("lava-key")))
    {
        Ok(state) => state,
        Err(err) => {
            eprintln!("bad level: {}", err);
            std::process::exit(1);
        }
    };
    println!("{}", initial);

    let config = QLearningConfig::default().with_seed(seed);
    let mut env = Environment::new(initial.clone(), config.rewards, config.max_steps_per_episode);

    let mut agent = match load_path {
        Some(path) => match SavedPolicy::load_from_file(path)
            .and_then(|saved| saved.to_agent_for(&initial))
        {
            Ok(agent) => agent,
            Err(err) => {
                eprintln!("cannot load {}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => {
            let mut agent = match QLearningAgent::new(config) {
                Ok(agent) => agent,
                Err(err) => {
                    eprintln!("{}", err);
                    std::process::exit(2);
                }
            };
            let report =
                Trainer::new(episodes).train(&mut agent, &mut env, &AtomicBool::new(false));
            println!(
                "Trained {} episodes: {:.1}% wins, final epsilon {:.3}, {} states",
                report.episodes(),
                report.success_rate() * 100.0,
                report.final_epsilon,
                report.states_seen
            );
            agent
        }
    };

    println!("{}", EvaluationMetrics::evaluate(&mut agent, &mut env, 20, 0.0));

    if let Some(path) = save_path {
        if let Err(err) =
            SavedPolicy::from_agent(&agent, initial.board().name()).save_to_file(path)
        {
            eprintln!("cannot save {}: {}", path, err);
        }
    }

    let mut solver = QLearningSolver::from_agent(agent);
    println!("{}", solver.solve(&initial));
}

#[cfg(not(all(feature = "rl", feature = "serde")))]
fn main() {
    eprintln!(
        "This example requires the 'rl' and 'serde' features.\n\
Run:\n\
  cargo run --features rl,serde --example qlearning_demo"
    );
}

#[cfg(all(feature = "rl", feature = "serde"))]
fn arg_value<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
