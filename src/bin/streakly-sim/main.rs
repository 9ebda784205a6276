//! CLI tool to replay a timed script of user commands against the onboarding flow.
//!
//! Usage:
//!   streakly-sim --script script.json [--user-name Ada] [--config onboarding.json] [--json] [--verbose]

mod script;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use script::{Action, Script};
use streakly::onboarding::AnalyticsEvent;
use streakly::{Clock, FlowSnapshot, OnboardingConfig, OnboardingFlow, SequencerEvent, VirtualClock};

#[derive(Parser, Debug)]
#[command(
    name = "streakly-sim",
    about = "Replay a timed command script against the Streakly onboarding flow",
    version
)]
struct Args {
    /// Script JSON file path
    #[arg(short, long)]
    script: PathBuf,

    /// Display name for the greeting
    #[arg(short, long, env = "STREAKLY_USER_NAME")]
    user_name: Option<String>,

    /// Onboarding config JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a JSON report instead of a timeline
    #[arg(long, default_value = "false")]
    json: bool,

    /// Log sequencer internals to stderr
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

/// One line of the timeline.
#[derive(Debug, Serialize)]
#[serde(tag = "entry", rename_all = "snake_case")]
enum Entry {
    Event { event: SequencerEvent },
    Tick { remaining_ms: Option<u64> },
    Sound { enabled: bool },
    Navigate { route: String },
    Rejected { action: String, reason: String },
}

#[derive(Debug, Serialize)]
struct Record {
    at_ms: u64,
    #[serde(flatten)]
    entry: Entry,
}

#[derive(Debug, Serialize)]
struct Report {
    session_id: String,
    timeline: Vec<Record>,
    final_state: FlowSnapshot,
    analytics: Vec<AnalyticsEvent>,
}

impl Record {
    /// Timer-driven events carry their own deadline; everything else happens
    /// at `now_ms`.
    fn new(now_ms: u64, entry: Entry) -> Self {
        let at_ms = match &entry {
            Entry::Event { event } => event.at_ms(),
            _ => None,
        };
        Record {
            at_ms: at_ms.unwrap_or(now_ms),
            entry,
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<OnboardingConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            OnboardingConfig::from_json(&json).context("Invalid onboarding config")
        }
        None => Ok(OnboardingConfig::default()),
    }
}

fn describe(entry: &Entry) -> String {
    match entry {
        Entry::Event { event } => match event {
            SequencerEvent::StepExpired { index, .. } => format!("step {} expired", index),
            SequencerEvent::Advanced { from, to, reason, .. } => {
                format!("advanced {} -> {} ({:?})", from, to, reason)
            }
            SequencerEvent::Paused { remaining_ms } => format!("paused, {}ms left", remaining_ms),
            SequencerEvent::Resumed { remaining_ms } => format!("resumed, {}ms left", remaining_ms),
            SequencerEvent::Completed { outcome } => format!("completed: {}", outcome),
        },
        Entry::Tick { remaining_ms: Some(ms) } => format!("tick, {}ms left", ms),
        Entry::Tick { remaining_ms: None } => "tick (countdown hidden)".to_string(),
        Entry::Sound { enabled } => format!("sound {}", if *enabled { "on" } else { "off" }),
        Entry::Navigate { route } => format!("navigate to {}", route),
        Entry::Rejected { action, reason } => format!("{} rejected: {}", action, reason),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // 1. Load inputs
    let config = load_config(args.config.as_ref())?;
    let script_json = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read script {}", args.script.display()))?;
    let script: Script = serde_json::from_str(&script_json).context("Failed to parse script JSON")?;
    if let Some(index) = script.first_out_of_order() {
        anyhow::bail!(
            "Command {} at {}ms is earlier than the command before it",
            index,
            script.commands[index].at_ms
        );
    }

    // 2. Mount the flow on a virtual clock
    let clock = VirtualClock::new();
    let mut flow = OnboardingFlow::standard(&config, args.user_name.as_deref(), clock.clone());
    flow.start();

    let mut timeline = Vec::new();
    let push = |timeline: &mut Vec<Record>, entry: Entry| {
        timeline.push(Record::new(clock.now_ms(), entry))
    };

    // 3. Replay commands, letting timers fire in between
    for command in &script.commands {
        clock.set(command.at_ms);
        for event in flow.poll() {
            push(&mut timeline, Entry::Event { event });
        }

        let entry = match command.action {
            Action::Skip => flow.skip().map(|event| Entry::Event { event }).unwrap_or(Entry::Rejected {
                action: "skip".to_string(),
                reason: "terminal step or flow finished".to_string(),
            }),
            Action::TogglePlay => flow
                .toggle_play()
                .map(|event| Entry::Event { event })
                .unwrap_or(Entry::Rejected {
                    action: "toggle_play".to_string(),
                    reason: "flow not running".to_string(),
                }),
            Action::ToggleSound => Entry::Sound {
                enabled: flow.toggle_sound(),
            },
            Action::Tick => Entry::Tick {
                remaining_ms: flow.tick(),
            },
            Action::Complete => {
                let tag = command.outcome.as_deref().unwrap_or("start_solo");
                match flow.complete_tag(tag) {
                    Ok(route) => Entry::Navigate {
                        route: route.to_string(),
                    },
                    Err(e) => Entry::Rejected {
                        action: format!("complete({})", tag),
                        reason: e.to_string(),
                    },
                }
            }
        };
        push(&mut timeline, entry);
    }

    if let Some(until) = script.run_until_ms {
        clock.set(until);
        for event in flow.poll() {
            push(&mut timeline, Entry::Event { event });
        }
    }

    // 4. Report
    if args.json {
        let report = Report {
            session_id: flow.analytics().session_id().to_string(),
            timeline,
            final_state: flow.snapshot(),
            analytics: flow.analytics().events().to_vec(),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        for record in &timeline {
            println!("[{:>8}ms] {}", record.at_ms, describe(&record.entry));
        }
        let snap = flow.snapshot();
        println!();
        println!(
            "Final: step {}/{} '{}'{}",
            snap.step_index + 1,
            snap.step_count,
            snap.step_id,
            match snap.completed {
                Some(outcome) => format!(", completed with {}", outcome),
                None => String::new(),
            }
        );
    }

    flow.unmount();
    Ok(())
}
