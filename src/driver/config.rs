/*!
 * Driver Configuration
 * Worker count from the command line, output switches from the environment
 */

use crate::core::limits::DEFAULT_WORKER_COUNT;
use anyhow::{bail, Context, Result};

/// Environment switch for the JSON run summary
pub const SUMMARY_JSON_ENV: &str = "SCHED_PROBE_SUMMARY_JSON";
/// Environment switch for JSON diagnostics on stderr
pub const TRACE_JSON_ENV: &str = "SCHED_PROBE_TRACE_JSON";

/// Settings for one invocation of the test matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Workers per sub test (default: 8)
    pub worker_count: usize,
    /// Print the summary as JSON after the text summary (default: false)
    pub summary_json: bool,
    /// Emit diagnostics as JSON (default: false)
    pub trace_json: bool,
}

impl DriverConfig {
    /// Build from program arguments (without the program name) and an
    /// environment lookup
    pub fn from_args<I, S, E>(args: I, env: E) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        E: Fn(&str) -> Option<String>,
    {
        let worker_count = match args.into_iter().next() {
            Some(raw) => parse_worker_count(raw.as_ref())?,
            None => DEFAULT_WORKER_COUNT,
        };

        Ok(Self {
            worker_count,
            summary_json: flag(env(SUMMARY_JSON_ENV)),
            trace_json: flag(env(TRACE_JSON_ENV)),
        })
    }

    /// Build from the real process arguments and environment
    pub fn from_env() -> Result<Self> {
        Self::from_args(std::env::args().skip(1), |key| std::env::var(key).ok())
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            summary_json: false,
            trace_json: false,
        }
    }
}

fn parse_worker_count(raw: &str) -> Result<usize> {
    let count: usize = raw
        .trim()
        .parse()
        .with_context(|| format!("invalid worker count '{}'", raw))?;
    if count == 0 {
        bail!("worker count must be at least 1");
    }
    Ok(count)
}

fn flag(value: Option<String>) -> bool {
    value.map(|v| v == "1" || v == "true").unwrap_or(false)
}
