//! basic — smallest runnable example of the dt traffic micro-simulation
//! engine: 8 agents commuting between two neighborhoods and two
//! workplaces on a synthetic 5-node road network, for a few simulated
//! days.

mod network;
mod population;
mod role_factory;

use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

use dt_agent::RoleFactory;
use dt_behavior::NoopBehavior;
use dt_core::SimConfig;
use dt_output::{CsvWriter, SimOutputObserver};
use dt_sim::SimBuilder;
use dt_spatial::DijkstraRouter;

use network::build_network;
use population::{assign_homes_and_works, build_population};
use role_factory::BasicRoleFactory;

const SEED: u64 = 42;
const TICK_DURATION_SECS: u32 = 3_600; // 1 tick = 1 hour
const SIM_DAYS: u64 = 3;
const WORKER_COUNT: usize = 2;
const OUTPUT_INTERVAL_TICKS: u64 = 1;

fn main() -> Result<()> {
    println!("=== basic — dt traffic micro-simulation demo ===");
    println!(
        "Agents: {}  |  Days: {SIM_DAYS}  |  Seed: {SEED}",
        population::AGENT_COUNT
    );
    println!();

    let (network, [north_residential, south_residential, downtown, commerce_park, _connector]) =
        build_network();
    println!(
        "Road network: {} nodes, {} segments",
        network.node_count(),
        network.segment_count()
    );

    let (homes, works) =
        assign_homes_and_works(north_residential, south_residential, downtown, commerce_park);
    let homes = Arc::new(homes);
    let works = Arc::new(works);

    let total_ticks = SIM_DAYS * 24;
    let population = build_population(&network, &homes, SIM_DAYS, total_ticks);

    let config = SimConfig {
        start_unix_secs: 1_700_000_000, // a fixed reference Monday 00:00 UTC
        tick_duration_secs: TICK_DURATION_SECS,
        total_ticks,
        seed: SEED,
        num_threads: None,
        output_interval_ticks: OUTPUT_INTERVAL_TICKS,
        worker_count: WORKER_COUNT,
        tick_step: 1,
        signal_voting_window: 5,
    };
    println!(
        "Sim: {} ticks ({SIM_DAYS} days x 24 h) across {WORKER_COUNT} workers",
        config.total_ticks
    );
    println!();

    let role_factory = {
        let homes = homes.clone();
        let works = works.clone();
        move || -> Box<dyn RoleFactory> {
            // Each Worker thread calls this once and builds its own network
            // and router handles, per dt-sim's architecture: a RoleFactory
            // closure never has to be Send because it only ever runs on the
            // Worker thread that owns it.
            let (network, _) = build_network();
            Box::new(BasicRoleFactory {
                network: Arc::new(network),
                router: DijkstraRouter,
                behavior: Rc::new(NoopBehavior) as Rc<dyn dt_behavior::BehaviorModel>,
                homes: homes.clone(),
                works: works.clone(),
            })
        }
    };

    let sim = SimBuilder::new()
        .config(config.clone())
        .network(network)
        .role_factory(role_factory)
        .agents(population)
        .build()?;

    std::fs::create_dir_all("output/basic")?;
    let writer = CsvWriter::new(Path::new("output/basic"))?;
    let mut obs = SimOutputObserver::new(writer, &config);

    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  output/basic/agent_snapshots.csv");
    println!("  output/basic/tick_summaries.csv");

    Ok(())
}
