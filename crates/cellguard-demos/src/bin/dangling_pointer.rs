//! Releases a cell through one alias and then reads it through another.
//!
//! Run with:
//!   cargo run --bin dangling-pointer

use std::io;
use std::process::ExitCode;

use cellguard_core::DemoConfig;
use cellguard_demos::dangling;
use tracing::{error, info, warn};

fn main() -> ExitCode {
    cellguard_demos::init_tracing();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match dangling::run(&DemoConfig::default(), &mut out) {
        Ok(report) => {
            info!(%report, "memory check");
            if report.invalid_accesses > 0 {
                warn!(
                    invalid_accesses = report.invalid_accesses,
                    "use after release detected (expected for this demo)"
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "dangling-pointer demo failed");
            ExitCode::FAILURE
        }
    }
}
