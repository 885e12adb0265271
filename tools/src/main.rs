//! wisdom-runner: headless host for the Money Wisdom engine.
//!
//! Usage:
//!   wisdom-runner --strategy balanced --name Sam --age 31 --income 62000
//!   wisdom-runner --seed 7 --data-dir ./data
//!   wisdom-runner --ipc-mode

use anyhow::Result;
use money_wisdom_core::{
    catalog::{Scenario, ScenarioCatalog},
    command::PlayerCommand,
    config::GameConfig,
    engine::{GameEngine, Progress},
    event::GameEvent,
    scoring::FinalSummary,
    session::PlayerProfile,
    types::RUNNING_TOTAL_HORIZON,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcRequest {
    GetState,
    Summary,
    Command { command: PlayerCommand },
    Quit,
}

#[derive(serde::Serialize)]
struct ScenarioView<'a> {
    id:       &'a str,
    category: &'static str,
    title:    &'a str,
    choices:  Vec<ChoiceView<'a>>,
}

#[derive(serde::Serialize)]
struct ChoiceView<'a> {
    index:       usize,
    id:          &'a str,
    label:       &'a str,
    cost:        f64,
    frequency:   &'static str,
    annual_cost: f64,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    progress:         Progress,
    current_scenario: Option<ScenarioView<'a>>,
    events:           Vec<GameEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error:            Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Strategy {
    Cheapest,
    Priciest,
    Balanced,
    First,
}

impl std::str::FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cheapest" => Ok(Self::Cheapest),
            "priciest" => Ok(Self::Priciest),
            "balanced" => Ok(Self::Balanced),
            "first" => Ok(Self::First),
            other => Err(anyhow::anyhow!("unknown strategy: {other}")),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let seed = find_arg(&args, "--seed").map(str::parse::<u64>).transpose()?;
    let data_dir = find_arg(&args, "--data-dir");
    let strategy: Strategy = find_arg(&args, "--strategy").unwrap_or("balanced").parse()?;

    let defaults = PlayerProfile::default();
    let player = PlayerProfile {
        name:          find_arg(&args, "--name").unwrap_or(defaults.name.as_str()).to_string(),
        age:           parse_arg(&args, "--age", defaults.age),
        annual_income: parse_arg(&args, "--income", defaults.annual_income),
    };

    let (config, catalog) = match data_dir {
        Some(dir) => (
            GameConfig::load(dir)?,
            ScenarioCatalog::load(&format!("{dir}/scenarios/scenarios.json"))?,
        ),
        None => (GameConfig::standard()?, ScenarioCatalog::standard()?),
    };
    let mut engine = GameEngine::new(Arc::new(config), Arc::new(catalog));

    if ipc_mode {
        return run_ipc_loop(&mut engine);
    }

    println!("Money Wisdom - wisdom-runner");
    println!("  player:    {} ({}, ${}/yr)", player.name, player.age, player.annual_income);
    println!("  strategy:  {strategy:?}");
    println!("  shuffle:   {seed:?}");
    println!("  data_dir:  {}", data_dir.unwrap_or("(bundled)"));
    println!();

    match seed {
        Some(seed) => engine.start_shuffled_session(player, seed),
        None => engine.start_session(player),
    }
    autoplay(&mut engine, strategy)?;
    print_summary(&engine.summary());
    Ok(())
}

fn autoplay(engine: &mut GameEngine, strategy: Strategy) -> Result<()> {
    let mut turn = 0usize;
    while let Some(scenario) = engine.current_scenario() {
        let index = pick(scenario, strategy, turn);
        let recorded = engine.choose(index)?;
        let impact = &recorded.impact;
        let horizon = impact.at(RUNNING_TOTAL_HORIZON);

        println!(
            "  {:<24} -> {:<32} ${:>10.2}/yr | {}y extra vs cheapest (invested): ${:.0}",
            impact.scenario_title,
            impact.chosen.choice.label,
            impact.chosen.annual_cost,
            RUNNING_TOTAL_HORIZON,
            horizon.map(|t| t.cost_vs_cheapest.invested).unwrap_or(0.0),
        );

        engine.next_scenario();
        for event in engine.drain_events() {
            log::debug!("event: {}", event.kind());
        }
        turn += 1;
    }
    log::debug!("autoplay finished after {turn} scenarios");
    Ok(())
}

/// Index of the option a strategy takes. Ties go to the earliest option.
fn pick(scenario: &Scenario, strategy: Strategy, turn: usize) -> usize {
    let annual: Vec<f64> = scenario.choices.iter().map(|c| c.annual_cost()).collect();
    let cheapest = || {
        (0..annual.len())
            .min_by(|&a, &b| annual[a].total_cmp(&annual[b]))
            .unwrap_or(0)
    };
    let priciest = || {
        (0..annual.len())
            .rev()
            .max_by(|&a, &b| annual[a].total_cmp(&annual[b]))
            .unwrap_or(0)
    };
    match strategy {
        Strategy::Cheapest => cheapest(),
        Strategy::Priciest => priciest(),
        Strategy::Balanced if turn % 2 == 0 => cheapest(),
        Strategy::Balanced => priciest(),
        Strategy::First => 0,
    }
}

fn run_ipc_loop(engine: &mut GameEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let request: IpcRequest = match serde_json::from_str(&buffer) {
            Ok(r) => r,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        match request {
            IpcRequest::Quit => break,
            IpcRequest::GetState => {
                let state = build_ui_state(engine, None);
                writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
            }
            IpcRequest::Summary => {
                writeln!(stdout, "{}", serde_json::to_string(&engine.summary())?)?;
            }
            IpcRequest::Command { command } => {
                let error = engine.submit_command(command).err().map(|e| e.to_string());
                let state = build_ui_state(engine, error);
                writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn build_ui_state(engine: &mut GameEngine, error: Option<String>) -> UiState<'_> {
    let events = engine.drain_events();
    let engine: &GameEngine = engine;
    let current_scenario = engine.current_scenario().map(|s| ScenarioView {
        id:       &s.id,
        category: s.category.label(),
        title:    &s.title,
        choices:  s
            .choices
            .iter()
            .enumerate()
            .map(|(index, c)| ChoiceView {
                index,
                id: &c.id,
                label: &c.label,
                cost: c.cost,
                frequency: c.frequency.label(),
                annual_cost: c.annual_cost(),
            })
            .collect(),
    });
    UiState {
        progress: engine.progress(),
        current_scenario,
        events,
        error,
    }
}

fn print_summary(summary: &FinalSummary) {
    println!();
    println!("=== SESSION SUMMARY ===");
    println!("  decisions:          {}", summary.total_decisions);
    println!("  saved vs priciest:  ${:.0} nominal / ${:.0} invested ({}y)",
        summary.total_nominal_savings, summary.total_invested_savings, RUNNING_TOTAL_HORIZON);
    println!("  monthly potential:  ${:.2}", summary.monthly_savings_potential);
    if let Some(big) = &summary.biggest_impact {
        println!("  biggest impact:     {} (${:.0})", big.scenario_title, big.amount);
    }
    println!("  wisdom score:       {} - {}", summary.wisdom_score, summary.wisdom_message);
    if let Some(ms) = summary.play_time_ms {
        println!("  play time:          {:.1}s", ms as f64 / 1000.0);
    }

    println!();
    println!("=== CUMULATIVE IMPACT ===");
    for t in summary.cumulative_impact.by_timeframe.values() {
        println!(
            "  {:>2}y | saved ${:>12.0} (invested ${:>12.0}) | extra ${:>12.0} (invested ${:>12.0})",
            t.years,
            t.total_savings_nominal,
            t.total_savings_invested,
            t.total_cost_nominal,
            t.total_cost_invested
        );
    }

    println!();
    println!("=== ACHIEVEMENTS ===");
    if summary.achievements.is_empty() {
        println!("  (none)");
    }
    for a in &summary.achievements {
        println!("  {} {} - {}", a.icon, a.title, a.description);
    }
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    find_arg(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
