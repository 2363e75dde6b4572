//! Moves a cell between owning handles and lets scope exit release it.
//!
//! Run with:
//!   cargo run --bin unique-pointer

use std::io;
use std::process::ExitCode;

use cellguard_core::DemoConfig;
use cellguard_demos::scoped;
use tracing::{error, info};

fn main() -> ExitCode {
    cellguard_demos::init_tracing();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match scoped::run(&DemoConfig::default(), &mut out) {
        Ok(report) => {
            info!(%report, clean = report.is_clean(), "memory check");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "unique-pointer demo failed");
            ExitCode::FAILURE
        }
    }
}
