//! Application entry point

use std::io;
use std::path::{Path, PathBuf};

mod charts;
mod config;
mod demo;
mod layout;
mod snapshot;
mod summary;
mod theme;
mod timeseries;
mod ui;
mod view_mode;

/// Leave the alternate screen and raw mode. `clear` wipes the dashboard
/// first so nothing lingers in scrollback.
fn restore_terminal(clear: bool) {
    use std::io::Write;
    let mut stdout = std::io::stdout();
    if clear {
        let _ = crossterm::execute!(
            stdout,
            crossterm::terminal::Clear(crossterm::terminal::ClearType::All),
            crossterm::cursor::MoveTo(0, 0)
        );
    }
    let _ = crossterm::execute!(
        stdout,
        crossterm::event::DisableBracketedPaste,
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    );
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}

/// Install panic hook to restore terminal before printing error.
fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal(false);
        let message = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "no panic message".to_string());
        match panic_info.location() {
            Some(location) => log::error!("panicked at {}: {}", location, message),
            None => log::error!("panicked: {}", message),
        }
        original_hook(panic_info);
    }));
}

/// Swallow keys still queued from the session until input goes quiet.
fn drain_input_events_until_silence(silence_duration: std::time::Duration) {
    use crossterm::event::{poll, read};

    for _ in 0..3 {
        let mut events_drained = 0;
        while poll(silence_duration).unwrap_or(false) {
            let _ = read();
            events_drained += 1;
        }
        if events_drained == 0 {
            break;
        }
    }
}

/// Flush OS-level terminal input buffer.
#[cfg(unix)]
fn flush_stdin_buffer() {
    use std::os::unix::io::AsRawFd;
    unsafe {
        libc::tcflush(std::io::stdin().as_raw_fd(), libc::TCIFLUSH);
    }
}

#[cfg(not(unix))]
fn flush_stdin_buffer() {}

/// Send log output to a file so it cannot scribble over the alternate screen.
fn init_logging() {
    let path = std::env::var_os("USAGE_DASH_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("usage-dash.log"));
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match std::fs::File::create(&path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => {
            eprintln!("Cannot open log file {}: {}", path.display(), e);
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    let _ = builder.try_init();
}

/// Snapshots from the first argument, demo data when absent or unreadable.
fn load_snapshots(arg: Option<&Path>) -> Vec<snapshot::UsageSnapshot> {
    match arg.map(snapshot::load_snapshots) {
        Some(Ok(snapshots)) => snapshots,
        Some(Err(e)) => {
            eprintln!("{}; showing demo data", e);
            log::warn!("{}", e);
            demo::demo_snapshots()
        }
        None => demo::demo_snapshots(),
    }
}

fn load_config(arg: Option<&Path>) -> config::DashboardConfig {
    match arg.map(config::DashboardConfig::load) {
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            eprintln!("{}; using default config", e);
            log::warn!("{}", e);
            config::DashboardConfig::default()
        }
        None => config::DashboardConfig::default(),
    }
}

fn main() -> io::Result<()> {
    init_logging();
    setup_panic_hook();

    let args: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    let snapshots = load_snapshots(args.first().map(PathBuf::as_path));
    let config = load_config(args.get(1).map(PathBuf::as_path));

    // Enable terminal settings
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableBracketedPaste
    )?;
    crossterm::terminal::enable_raw_mode()?;

    let backend = ratatui::backend::CrosstermBackend::new(std::io::stdout());
    let mut terminal = ratatui::Terminal::new(backend)?;

    // Run application
    let result = ui::App::new(snapshots, config).run(&mut terminal);

    // Terminal cleanup sequence
    drain_input_events_until_silence(std::time::Duration::from_millis(100));
    flush_stdin_buffer();
    restore_terminal(true);

    if let Err(e) = &result {
        log::error!("dashboard exited with error: {}", e);
    }
    result
}
