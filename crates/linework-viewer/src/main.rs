mod app;
mod controls;

use anyhow::Result;

use linework_engine::device::GpuInit;
use linework_engine::logging::{init_logging, LoggingConfig};
use linework_engine::window::Runtime;

use crate::app::{window_configs, LineViewerApp};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    // Startup banner, printed before the windows open.
    println!();
    println!("  ╔════════════════════════════════════════╗");
    println!("  ║             LINEWORK v0.1              ║");
    println!("  ║     wgpu line pipeline  ·  2 views     ║");
    println!("  ╠════════════════════════════════════════╣");
    println!("  ║  Space   pause / resume rotation       ║");
    println!("  ║  Up/Dn   speed  (1.0 - 10.0, 0.5 step) ║");
    println!("  ║  Esc     quit                          ║");
    println!("  ╚════════════════════════════════════════╝");
    println!();

    Runtime::run(window_configs(), GpuInit::default(), LineViewerApp::new())
}
