/*!
 * Scheduling Test Program - Main Entry Point
 *
 * Runs nine worker pools (CFS, FIFO and RR crossed with the priority
 * schemes) on a single core and prints how long each took.
 * Real-time policies require root or CAP_SYS_NICE:
 *
 *   sudo ./sched_test [num_threads]
 */

use sched_probe::driver::{Driver, DriverConfig};
use sched_probe::pool::{self, Console};
use sched_probe::init_tracing;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = DriverConfig::from_env()?;
    init_tracing(config.trace_json);

    info!(workers = config.worker_count, "sched_test starting");

    let driver = Driver::new(config, Console::stdout());
    driver.print_banner();
    let summary = driver.run_with(|run| pool::run(run.policy, run.scheme, run.worker_count));
    driver.print_summary(&summary);

    Ok(())
}
