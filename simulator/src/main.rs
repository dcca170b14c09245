use anyhow::Context;
use bridge::{routes, spawn_churn, LotState};
use clap::Parser;
use config::SimulatorConfig;
use generator::lot::build_lot;
use log::info;
use parkcore::layout::{partition, SectionNames};
use parkcore::model::{Basement, Heading};
use parkcore::sync::basement_tally;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use warp::Filter;

mod bridge;
mod config;
mod generator;

#[derive(Parser)]
#[command(author, version, about = "Stand-in parking backend for local development")]
struct Args {
    /// Print the generated lot and exit instead of serving it
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load simulator settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,
    #[arg(long, default_value = "firstParkingBackEnd")]
    prefix: String,
    #[arg(long, default_value_t = 60)]
    spots_per_basement: usize,
    #[arg(long, default_value_t = 7)]
    seed: u64,
    #[arg(long, default_value_t = 0.5)]
    occupancy: f64,
    /// Flip a random reservation this often (milliseconds)
    #[arg(long)]
    churn_ms: Option<u64>,
    /// Skew the occupied-count endpoint away from the reservation flags
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    occupied_bias: i64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.config {
        SimulatorConfig::load(path)?
    } else {
        SimulatorConfig {
            churn_ms: args.churn_ms,
            occupied_bias: args.occupied_bias,
            ..SimulatorConfig::from_args(
                args.bind,
                args.prefix,
                args.spots_per_basement,
                args.seed,
                args.occupancy,
            )
        }
    };

    let spots = build_lot(config.spots_per_basement, config.occupancy, config.seed);
    let state = Arc::new(LotState::new(spots, config.occupied_bias));

    if args.offline {
        print_lot(&state);
        return Ok(());
    }

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating simulator runtime")?;
    runtime.block_on(serve(state, config))
}

async fn serve(state: Arc<LotState>, config: SimulatorConfig) -> anyhow::Result<()> {
    let churn = config.churn_ms.map(|period| {
        spawn_churn(
            state.clone(),
            Duration::from_millis(period.max(1)),
            config.seed.wrapping_add(1),
        )
    });

    let api = routes(state.clone(), &config.prefix).with(warp::log("simulator"));
    let (addr, server) = warp::serve(api)
        .try_bind_with_graceful_shutdown(config.bind, async {
            if let Err(err) = signal::ctrl_c().await {
                log::warn!("ctrl-c handler failed: {err}");
            }
        })
        .with_context(|| format!("binding simulator to {}", config.bind))?;

    info!(
        "serving {} spots at http://{}/{} (Ctrl+C to stop)",
        state.len(),
        addr,
        config.prefix.trim_matches('/')
    );
    server.await;

    if let Some(handle) = churn {
        handle.abort();
    }
    info!("simulator stopped");
    Ok(())
}

fn print_lot(state: &LotState) {
    let spots = state.spots();
    let names = SectionNames::default();
    println!(
        "Generated {} spots, occupied-count endpoint reports {}",
        spots.len(),
        state.occupied_count()
    );
    for basement in Basement::ALL {
        let tally = basement_tally(&spots, basement);
        println!(
            "{basement}: {}/{} free across {} section(s)",
            tally.available,
            tally.total,
            partition(&spots, basement, &names).len()
        );
        for heading in Heading::ALL {
            println!(
                "  {} {heading}: {} free",
                heading.arrow(),
                state.free_in_direction(heading, basement.zone_token())
            );
        }
    }
}
