use anyhow::Context;
use clap::Parser;
use mem_monitor::engine::Monitor;
use mem_monitor::engine::critical::{CriticalActionExecutor, SignalExecutor};
use mem_monitor::engine::scheduler::{run, spawn_signal_listener};
use mem_monitor::logging;
use mem_monitor::notify::{Dispatcher, build_notifier};
use mem_monitor::sampler::ProcSampler;
use mem_monitor::shared::config::{config_path, load_settings, render_settings};
use mem_monitor::shared::time::{Clock, SystemClock};
use tracing::info;

#[derive(Parser)]
#[command(name = "mem_monitor")]
#[command(about = "Warns when a group of processes holds too much memory", long_about = None)]
struct Args {
    /// Config file path, with or without extension.
    /// Can also be set via MEM_MONITOR_CONFIG environment variable
    #[arg(short, long)]
    config: Option<String>,

    /// Run a single tick and exit
    #[arg(long)]
    once: bool,

    /// Print the configuration summary and exit
    #[arg(long)]
    print_config: bool,

    /// Print the effective settings as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let path = config_path(args.config.as_deref());
    let settings =
        load_settings(&path).with_context(|| format!("loading configuration from {path}"))?;
    let config = settings.validate().context("invalid configuration")?;

    if args.dump_config {
        print!("{}", render_settings(&settings)?);
        return Ok(());
    }

    let mut sampler = ProcSampler::new(
        config.selection.clone(),
        config.idle,
        config.total_memory_override,
    );
    if args.print_config {
        println!("{}", config.summary(sampler.total_memory()));
        return Ok(());
    }

    logging::init(&settings.logging)?;
    info!("Starting mem_monitor with {}", path);
    info!("\n{}", config.summary(sampler.total_memory()));

    let host = sysinfo::System::host_name().unwrap_or_else(|| "localhost".to_string());
    let notifier = build_notifier(&settings.notify)?;
    let dispatcher = Dispatcher::new(
        notifier,
        config.recipients.clone(),
        settings.notify.subject_prefix.clone(),
        host,
    );
    let executor: Option<Box<dyn CriticalActionExecutor>> = if settings.memory.terminate.active {
        Some(Box::new(SignalExecutor::new()))
    } else {
        None
    };

    let mut monitor = Monitor::new(&config, Box::new(sampler), dispatcher, executor)?;
    let clock = SystemClock;

    if args.once {
        monitor.tick(clock.now()).await;
        return Ok(());
    }

    let shutdown = spawn_signal_listener();
    run(&mut monitor, &clock, config.poll_interval, shutdown).await;
    info!("mem_monitor stopped");
    Ok(())
}
