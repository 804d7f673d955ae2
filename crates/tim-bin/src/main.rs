//! tim entrypoint.
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use core_config::Config;
use core_input::{InputDecoder, TtySource};
use core_terminal::{CrosstermBackend, SignalFlags, TerminalBackend, restore_terminal, signals};
use tim::clipboard::SystemClipboard;
use tim::runtime::seed_model;
use tim::{Args, Runtime, Shutdown, loader, logging};
use tracing::{error, info, warn};

const FALLBACK_SIZE: (u16, u16) = (80, 24);

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    let _log_guard = logging::init();
    logging::install_panic_hook();
    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            restore_terminal();
            error!(target: "runtime", error = %format!("{e:#}"), "fatal");
            eprintln!("tim: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let source = args.source()?;
    let doc = loader::load(&source)?;
    let config = Config::from_env();
    info!(target: "runtime", ?source, lines = doc.lines.len(), "startup");

    let flags = SignalFlags::install()?;
    let input = TtySource::open()?;
    let mut backend = CrosstermBackend::new();
    let title = doc
        .path
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| format!("tim: {}", n.to_string_lossy()))
        .unwrap_or_else(|| "tim".to_string());
    if let Err(e) = backend.set_title(&title) {
        warn!(target: "terminal", error = %e, "set_title_failed");
    }
    backend.enter().context("entering editor screen")?;
    let (cols, rows) = backend.size().unwrap_or_else(|e| {
        warn!(target: "terminal", error = %e, "size_query_failed");
        FALLBACK_SIZE
    });

    let model = seed_model(doc, &config, cols, rows);
    let mut runtime = Runtime::new(
        model,
        config,
        InputDecoder::new(input),
        Box::new(SystemClipboard::new()),
        flags,
    );
    let outcome = runtime.run(&mut backend);
    backend.leave()?;
    match outcome? {
        Shutdown::Quit => Ok(ExitCode::SUCCESS),
        Shutdown::Signal(sig) => {
            info!(target: "runtime", sig, "terminated_by_signal");
            signals::reraise(sig).context("re-raising termination signal")?;
            Ok(ExitCode::from((128 + sig).clamp(0, 255) as u8))
        }
    }
}
