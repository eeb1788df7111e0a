// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Runs a fake host loop under the timings engine and prints what it collected.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use timings_core::{HistoryExport, TimingsConfig};
use timings_engine::{ReportBuilder, TimingsEngine};

#[derive(Parser, Debug)]
#[command(name = "timings-sandbox", about = "Simulated host loop for the timings engine")]
struct Args {
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 180)]
    ticks: u32,

    /// JSON configuration file; defaults are used when absent.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the full report instead of the last history record.
    #[arg(long)]
    report: bool,

    /// Indent the JSON output.
    #[arg(long)]
    pretty: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<TimingsConfig> {
    let Some(path) = path else {
        return Ok(TimingsConfig {
            history_interval_ticks: 60,
            minute_ticks: 20,
            ..TimingsConfig::default()
        });
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    TimingsConfig::from_json_str(&json)
        .with_context(|| format!("Invalid config file {}", path.display()))
}

fn spin(micros: u64) {
    thread::sleep(Duration::from_micros(micros));
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut engine = TimingsEngine::new(load_config(args.config.as_ref())?);
    let handle = engine.handle();

    let world = engine.acquire("World", "World Tick", None);
    let entities = engine.acquire("World", "Entity Tick", None);
    let pathfinding = engine.acquire("World", "## Pathfinding", None);
    let plugins = engine.of("Plugins");
    let plugin_timers: Vec<_> = ["Economy", "Chat"]
        .iter()
        .map(|name| engine.acquire("Plugins", name, Some(plugins)))
        .collect();

    // Another thread registers its own timer, then turns verbose collection
    // off once the loop signals the halfway tick. The engine applies both at
    // its next tick.
    let (halfway_tx, halfway_rx) = mpsc::channel::<()>();
    let worker = {
        let handle = handle.clone();
        thread::spawn(move || {
            let id = handle.acquire("Async", "Chunk Load", None);
            if halfway_rx.recv().is_ok() {
                handle.set_verbose_enabled(false);
            }
            id
        })
    };
    let halfway = args.ticks / 2;

    let mut chunk_load = None;
    for tick in 0..args.ticks {
        if tick == halfway && halfway_tx.send(()).is_err() {
            log::warn!("Worker thread exited early");
        }
        if chunk_load.is_none() && worker.is_finished() {
            chunk_load = Some(handle.acquire("Async", "Chunk Load", None));
        }
        engine.tick(|engine| {
            engine.timed(world, |engine| {
                spin(200);
                engine.timed(entities, |engine| {
                    engine.ticks_mut().add_entities(25);
                    spin(300);
                    engine.timed(pathfinding, |_| spin(100));
                });
            });
            for plugin in &plugin_timers {
                engine.timed(*plugin, |_| spin(50));
            }
            if let Some(id) = chunk_load {
                engine.timed(id, |_| spin(150));
            }
            // An occasional slow tick.
            if tick % 50 == 49 {
                engine.timed(world, |_| spin(55_000));
            }
        });
        spin(1_000);
    }
    drop(halfway_tx);
    if worker.join().is_err() {
        log::warn!("Worker thread panicked");
    }

    let json = if args.report {
        let report = ReportBuilder::new(&mut engine).build();
        if args.pretty {
            report.to_json_pretty()?
        } else {
            report.to_json()?
        }
    } else {
        let record = match engine.history().last() {
            Some(record) => record.clone(),
            None => engine.snapshot(),
        };
        let export = HistoryExport::from(&record);
        if args.pretty {
            export.to_json_pretty()?
        } else {
            export.to_json()?
        }
    };
    println!("{json}");

    log::info!(
        "Simulated {} ticks, {} history records retained",
        args.ticks,
        engine.history().len()
    );
    Ok(())
}
