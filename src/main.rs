use std::any::Any;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::Parser;

use codecount::{build_options, render_banner, render_report, run_in_current_dir, Args, ScanConfig};

fn run<W: Write>(out: &mut W) -> Result<()> {
    let config = ScanConfig::default();
    render_banner(out)?;
    let report = run_in_current_dir(&config, out)?;
    render_report(&report, out)?;
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Runs `f`, turning a panic into an ordinary fatal error.
fn guarded<F: FnOnce() -> Result<()>>(f: F) -> Result<()> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        Err(anyhow!("internal error: {}", panic_message(payload.as_ref())))
    })
}

fn wait_for_enter<W: Write>(out: &mut W, prompt: &str) {
    let _ = write!(out, "\n{prompt}");
    let _ = out.flush();
    let mut line = String::new();
    let _ = io::stdin().read_line(&mut line);
}

fn main() -> ExitCode {
    let args = Args::parse();
    let opts = build_options(&args);

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(opts.log_level)
        .init();

    let mut stdout = io::stdout().lock();
    let (code, prompt) = match guarded(|| run(&mut stdout)) {
        Ok(()) => (ExitCode::SUCCESS, "🎉 Done. Press Enter to exit..."),
        Err(err) => {
            let _ = writeln!(stdout, "\n❌ Fatal error: {err:#}");
            (ExitCode::FAILURE, "⚠ Press Enter to exit...")
        }
    };

    if opts.pause {
        wait_for_enter(&mut stdout, prompt);
    }
    code
}
