//! Despertador: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  BackendClient      StateFileSource   HardwareAdapter          │
//! │  (Signal+Dismiss)   (Signal)          (Light+Button)           │
//! │  FrameFeed          SnapshotStore     LogEventSink             │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │     ButtonChannel          GestureChannel              │    │
//! │  │  Monitor · Debounce · FSM  Monitor · Classifier · Gate │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  runtime::{button_host, gesture_host} · HostQueue · signals    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `despertador <button|gesture|print-config|init-config> [--config PATH]`

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use log::info;

use despertador::adapters::config_file::FileConfigStore;
use despertador::adapters::{console_log, signals};
use despertador::app::ports::ConfigPort;
use despertador::events::HOST_QUEUE;
use despertador::{diagnostics, runtime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Button,
    Gesture,
    PrintConfig,
    InitConfig,
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    role: Role,
    config: Option<PathBuf>,
}

fn print_usage() {
    eprintln!(
        "Usage: despertador <button|gesture|print-config|init-config> [--config PATH]\n\
         \n\
         Roles:\n\
         \x20 button        light output, dismiss button, backend polling\n\
         \x20 gesture       open-hand dismissal from the landmark feed\n\
         \x20 print-config  print the effective configuration as JSON\n\
         \x20 init-config   write the default configuration to the config path\n\
         \n\
         Environment: DESPERTADOR_CONFIG, BACKEND_URL, LOG_LEVEL"
    );
}

fn parse_args(raw: &[String]) -> Result<Args, String> {
    let mut role = None;
    let mut config = None;
    let mut i = 0;
    while i < raw.len() {
        match raw[i].as_str() {
            "-c" | "--config" => {
                i += 1;
                let path = raw.get(i).ok_or("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Err(String::new()),
            name if role.is_none() && !name.starts_with('-') => {
                role = Some(match name {
                    "button" => Role::Button,
                    "gesture" => Role::Gesture,
                    "print-config" => Role::PrintConfig,
                    "init-config" => Role::InitConfig,
                    other => return Err(format!("unknown role: {other}")),
                });
            }
            other => return Err(format!("unexpected argument: {other}")),
        }
        i += 1;
    }
    Ok(Args {
        role: role.ok_or("missing role")?,
        config,
    })
}

fn main() -> Result<()> {
    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(msg) => {
            if !msg.is_empty() {
                eprintln!("Error: {msg}");
            }
            print_usage();
            process::exit(if msg.is_empty() { 0 } else { 2 });
        }
    };

    let store = FileConfigStore::resolve(args.config);

    if args.role == Role::InitConfig {
        console_log::init(log::LevelFilter::Info);
        let defaults = despertador::config::SystemConfig::default();
        store
            .save(&defaults)
            .with_context(|| format!("writing {}", store.path().display()))?;
        return Ok(());
    }

    let config = store
        .load()
        .with_context(|| format!("loading {}", store.path().display()))?;
    console_log::init(config.log_filter());

    if args.role == Role::PrintConfig {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    diagnostics::install_panic_handler();
    info!("despertador v{} ({:?} host)", env!("CARGO_PKG_VERSION"), args.role);

    signals::spawn_listener(&HOST_QUEUE).context("signal listener")?;

    match args.role {
        Role::Button => runtime::button_host::run(&config, &HOST_QUEUE),
        Role::Gesture => runtime::gesture_host::run(&config, &HOST_QUEUE),
        Role::PrintConfig | Role::InitConfig => Ok(()),
    }
}
