use anyhow::{Result, anyhow};
use log::info;
use pico_args::Arguments;
use std::{env, path::PathBuf, time::Duration, time::Instant};

use posepick::catalog::{CatalogProvider, StaticCatalog};
use posepick::config::SelectorConfig;
use posepick::filter;
use posepick::flags::FingerFlags;
use posepick::sample::{TrackingSample, TrackingSource};
use posepick::session::{NOMINAL_TICK_SECONDS, PoseApplier, Session};

pub fn run() -> Result<()> {
    let mut pargs = Arguments::from_env();

    if env::args().len() == 1 || pargs.contains("-h") || pargs.contains("--help") {
        print_help();
        return Ok(());
    }

    let subcmd: Option<String> = pargs.free_from_str().ok();

    match subcmd.as_deref() {
        Some("help") => {
            print_help();
            Ok(())
        }

        Some("replay") => {
            let config_path: Option<PathBuf> = pargs.opt_value_from_str("--config")?;
            let path: PathBuf = pargs
                .free_from_str()
                .map_err(|_| anyhow!("usage: posepick replay <samples.json> [--config <profile.toml>]"))?;
            let config = match config_path {
                Some(p) => SelectorConfig::load(&p)?,
                None => SelectorConfig::default(),
            };
            replay(&path, config)
        }

        Some("filter") => {
            let flags_str: String = pargs
                .free_from_str()
                .map_err(|_| anyhow!("usage: posepick filter <flags, e.g. 0b00010 or 2>"))?;
            show_filtered(&flags_str)
        }

        Some("check") => {
            let path: Option<PathBuf> = pargs.free_from_str().ok();
            let config = match path {
                Some(p) => SelectorConfig::load(&p)?,
                None => SelectorConfig::load_or_install_default()?,
            };
            println!("profile ok: {config:#?}");
            Ok(())
        }

        Some(other) => {
            eprintln!("unknown subcommand: {other}\n");
            print_help();
            Ok(())
        }

        None => {
            print_help();
            Ok(())
        }
    }
}

/// Feeds a recorded sample stream back, one sample per tick.
struct RecordedSource {
    samples: std::vec::IntoIter<TrackingSample>,
}

impl TrackingSource for RecordedSource {
    fn sample(&mut self) -> TrackingSample {
        self.samples.next().unwrap_or_default()
    }
}

/// Prints pose applications instead of driving a skeleton.
struct TraceApplier;

impl PoseApplier for TraceApplier {
    type Snapshot = ();

    fn apply(&mut self, pose_library: &str, pose_name: &str) {
        info!("apply {pose_library}/{pose_name}");
    }

    fn restore(&mut self, _snapshot: &()) {
        info!("restore pre-session pose");
    }
}

fn replay(path: &std::path::Path, config: SelectorConfig) -> Result<()> {
    let txt = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read {}: {e}", path.display()))?;
    let samples: Vec<TrackingSample> = serde_json::from_str(&txt)
        .map_err(|e| anyhow!("failed to parse {}: {e}", path.display()))?;
    let n_samples = samples.len();

    let mut source = RecordedSource {
        samples: samples.into_iter(),
    };
    let catalog = StaticCatalog::fingerspelling();
    let mut session = Session::start(config, catalog, TraceApplier, ());

    // Synthetic clock at the nominal cadence, so replays are deterministic.
    let start = Instant::now();
    let step = Duration::from_secs_f32(NOMINAL_TICK_SECONDS);

    for tick in 0..n_samples {
        let sample = source.sample();
        let report = session.tick(&sample, start + step * tick as u32)?;
        let hovered = report
            .hovered_index
            .map(|i| session.effective_catalog()[i].name.clone());
        println!(
            "{}",
            serde_json::json!({
                "tick": tick,
                "status": format!("{:?}", report.status),
                "hovered": hovered,
                "window_start": report.window_start,
                "no_selectable_items": report.no_selectable_items,
            })
        );
    }

    match session.commit() {
        Ok(name) => println!("{}", serde_json::json!({"committed": name})),
        Err(e) => {
            println!("{}", serde_json::json!({"committed": null, "error": e.to_string()}));
        }
    }
    Ok(())
}

fn show_filtered(flags_str: &str) -> Result<()> {
    let bits = if let Some(bin) = flags_str.strip_prefix("0b") {
        u8::from_str_radix(bin, 2)?
    } else {
        flags_str.parse::<u8>()?
    };
    if bits > FingerFlags::ALL.0 {
        return Err(anyhow!("flags must fit in 6 bits, got {bits:#b}"));
    }
    let flags = FingerFlags(bits);

    let catalog = StaticCatalog::fingerspelling();
    let full = catalog.items();
    let effective = filter::recompute(&catalog, &full, flags);
    println!(
        "{}",
        serde_json::json!({
            "flags": format!("{:#08b}", flags.0),
            "selectable": effective.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(),
            "dropped": full.len() - effective.len(),
        })
    );
    Ok(())
}

fn print_help() {
    println!(
        r#"posepick — hand-tracking pose selection engine

USAGE:
  posepick help                        Show this help
  posepick replay <samples.json>       Drive a session from a recorded
           [--config <profile.toml>]   sample stream; prints one JSON line
                                       per tick and the committed item
  posepick filter <flags>              Show which fingerspelling shapes stay
                                       selectable for a hand bit flag
                                       (e.g. 0b00010 = index extended)
  posepick check [profile.toml]        Validate a profile (installs the
                                       bundled default when run bare)

TIPS:
  - Profiles: ~/.config/posepick/default.toml
  - RUST_LOG=debug posepick replay ... shows per-tick engine logs
"#
    );
}
