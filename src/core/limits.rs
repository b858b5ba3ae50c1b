/*!
 * System Limits and Constants
 *
 * Fixed values shared by the launcher and the driver.
 */

// =============================================================================
// WORKLOAD
// =============================================================================

/// Busy-loop iterations per worker
/// Long enough for several round-robin slices on one core
pub const DUMMY_WORK_ITERATIONS: u64 = 0x3FFF_FFFF;

// =============================================================================
// DRIVER
// =============================================================================

/// Worker count when none is given on the command line
pub const DEFAULT_WORKER_COUNT: usize = 8;

/// Number of policy/scheme combinations exercised by the driver
pub const TEST_CASE_COUNT: usize = 9;

/// Separator printed between driver sections
pub const SEPARATOR_LINE: &str = "--------------------------------------------------------------------------------------------------------";
