use anyhow::Context;
use app::{App, Flow};
use chrono::Utc;
use clap::Parser;
use commands::{parse_command, View, HELP};
use log::{info, warn};
use parkcore::gateway::HttpGateway;
use parkcore::model::Basement;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;

mod app;
mod commands;
mod config;
mod render;

#[derive(Parser)]
#[command(author, version, about = "Terminal monitor for live parking occupancy")]
struct Args {
    /// Load client settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Backend address, overriding the config file and PARKING_BASE_URL
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long, value_enum, default_value_t = View::Home)]
    view: View,
    #[arg(long, default_value = "1")]
    basement: Basement,
    /// Sections to expand on the map view
    #[arg(long, value_delimiter = ',')]
    expand: Vec<usize>,
    /// Fetch once, print the view and exit
    #[arg(long, default_value_t = false)]
    once: bool,
    /// Redraw period in milliseconds
    #[arg(long, default_value_t = 1000)]
    render_ms: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = config::resolve(args.config.as_ref(), args.base_url.clone())?;
    info!("using backend {}", config.gateway.base_url);

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating monitor runtime")?;
    runtime.block_on(run(args, config))
}

async fn run(args: Args, config: parkcore::config::ClientConfig) -> anyhow::Result<()> {
    let gateway = Arc::new(HttpGateway::new(&config.gateway).context("building HTTP gateway")?);
    let mut app = App::new(gateway, &config, args.view, args.basement);
    for index in &args.expand {
        app.apply(commands::Command::Toggle(*index));
    }

    if args.once {
        app.refresh_mounted().await;
        print_frame(&app.render(Utc::now()));
        return Ok(());
    }

    println!("{HELP}");
    let mut ticker = tokio::time::interval(Duration::from_millis(args.render_ms.max(50)));
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => print_frame(&app.render(Utc::now())),
            line = stdin.next_line(), if stdin_open => {
                let Some(line) = line.context("reading stdin")? else {
                    stdin_open = false;
                    continue;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Ok(command) => match app.apply(command) {
                        Flow::Continue => print_frame(&app.render(Utc::now())),
                        Flow::Help => println!("{HELP}"),
                        Flow::Quit => break,
                    },
                    Err(err) => warn!("{err}; type `help` for commands"),
                }
            }
            result = signal::ctrl_c() => {
                if let Err(err) = result {
                    warn!("ctrl-c handler failed: {err}");
                }
                break;
            }
        }
    }

    info!("monitor stopped");
    Ok(())
}

fn print_frame(lines: &[String]) {
    println!();
    for line in lines {
        println!("{line}");
    }
}
