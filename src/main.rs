use std::env;
use std::io::{self, BufRead};
use std::path::Path;
use std::process;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

use belfry::audio::{self, Belfry, PcmSink};
use belfry::config::{SampleSource, SimConfig};
use belfry::runner::{self, Input};
use belfry::{Call, Narrator, Simulator, Snapshot, StrikeJudgment};

const USAGE: &str = "Usage: belfry [--config <file.yaml>] [--bell <2-5>] [--tempo <ms>] [--samples <dir|url>] [--log-level <level>]";

/// Prints the conductor's calls to the terminal.
struct Conductor;

impl Narrator for Conductor {
    fn announce(&mut self, call: Call) {
        println!("\n    *** {}! ***\n", call);
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}

fn parse_args() -> SimConfig {
    let args: Vec<String> = env::args().skip(1).collect();

    // Config file first so flags override it
    let mut config = match args.iter().position(|a| a == "--config") {
        Some(i) => {
            let path = args.get(i + 1).unwrap_or_else(|| fail(USAGE));
            SimConfig::from_file(Path::new(path)).unwrap_or_else(|e| fail(e))
        }
        None => SimConfig::default(),
    };

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        if flag == "-h" || flag == "--help" {
            println!("{}", USAGE);
            process::exit(0);
        }
        let value = args.get(i + 1).unwrap_or_else(|| fail(USAGE));
        match flag {
            "--config" => {}
            "--bell" => {
                let bell = value.parse().unwrap_or_else(|_| fail(format!("Invalid bell: {}", value)));
                config.set_user_bell(bell).unwrap_or_else(|e| fail(e));
            }
            "--tempo" => {
                let tempo = value.parse().unwrap_or_else(|_| fail(format!("Invalid tempo: {}", value)));
                config.set_tempo(tempo).unwrap_or_else(|e| fail(e));
            }
            "--samples" => config.samples = SampleSource::parse(value),
            "--log-level" => {
                config.log_level = value.parse().unwrap_or_else(|e| fail(e));
            }
            _ => fail(USAGE),
        }
        i += 2;
    }
    config
}

/// Forward each line of stdin: `q` stands the bells, anything else strikes.
fn spawn_input() -> Receiver<Input> {
    let (sender, receiver) = channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let input = match line.trim() {
                "q" | "stand" => Input::Stop,
                _ => Input::Strike,
            };
            if sender.send(input).is_err() {
                break;
            }
        }
    });
    receiver
}

/// Show each new row and every judged strike.
fn render(user_bell: u8) -> impl FnMut(&Snapshot) {
    let mut attempts = 0;
    move |snapshot| {
        if snapshot.total_attempts > attempts {
            attempts = snapshot.total_attempts;
            let judgment = StrikeJudgment {
                tier: snapshot.last_strike_score,
                offset_ms: snapshot.last_timing_offset_ms,
            };
            println!(
                "        {} ({:+.0}ms)",
                judgment.label(),
                judgment.offset_ms
            );
        }
        if snapshot.is_running && snapshot.blow_index == 0 {
            let row: Vec<String> = snapshot
                .row
                .iter()
                .map(|&b| if b == user_bell { format!("[{}]", b) } else { format!(" {} ", b) })
                .collect();
            let stroke = if snapshot.is_handstroke { "H" } else { "B" };
            println!("{} {}", stroke, row.concat());
        }
    }
}

fn ring_course<S: PcmSink>(config: &SimConfig, belfry: Belfry<S>, inputs: &Receiver<Input>) {
    let mut sim = Simulator::new(config, belfry, Conductor);
    sim.subscribe(render(config.user_bell()));

    println!("Press Enter to look to. Press Enter to pull your bell; 'q' to stand.");
    if inputs.recv().is_err() {
        return;
    }
    println!("\n    *** Look to! Treble's going... she's gone! ***\n");

    let score = runner::run(&mut sim, inputs).unwrap_or_else(|e| fail(e));
    println!(
        "Score {} from {} strikes ({}% accuracy; {} quick, {} slow)",
        score.total_score,
        score.total_attempts,
        score.accuracy_percent(),
        score.early_strikes,
        score.late_strikes
    );
}

fn main() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .try_init();
    log::set_max_level(log::LevelFilter::Warn);

    let config = parse_args();
    log::set_max_level(config.log_level.as_level_filter());

    let inputs = spawn_input();
    println!("Tower preparation: press Enter to wake up the belfry.");
    if inputs.recv().is_err() {
        return;
    }
    println!("Entering belfry...");
    let outcome = audio::spawn_load(config.samples.clone()).wait();
    if let Some(ref warning) = outcome.warning {
        println!("Notice: {}", warning);
    }

    #[cfg(feature = "device-audio")]
    match audio::DeviceSink::open() {
        Ok(sink) => return ring_course(&config, Belfry::from_outcome(outcome, sink), &inputs),
        Err(e) => log::error!("{}; ringing silently", e),
    }

    ring_course(&config, Belfry::from_outcome(outcome, audio::NullSink::default()), &inputs);
}
