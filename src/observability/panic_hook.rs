//! Panic hook that prints a crash report naming the data being processed.

use std::cell::RefCell;
use std::panic::PanicHookInfo;
use std::path::{Path, PathBuf};
use tracing::Span;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const WIDTH: usize = 76;

thread_local! {
    static DATA_SOURCE: RefCell<Option<PathBuf>> = const { RefCell::new(None) };
}

/// Clears the recorded data source when dropped.
pub struct DataSourceGuard {
    previous: Option<PathBuf>,
}

impl Drop for DataSourceGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        DATA_SOURCE.with(|source| *source.borrow_mut() = previous);
    }
}

/// Record the snapshot path being reported on, for crash reports.
pub fn set_data_source(path: &Path) -> DataSourceGuard {
    let previous = DATA_SOURCE.with(|source| source.borrow_mut().replace(path.to_path_buf()));
    DataSourceGuard { previous }
}

fn current_data_source() -> Option<PathBuf> {
    DATA_SOURCE.with(|source| source.borrow().clone())
}

pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!();
        for line in crash_report_lines(info) {
            eprintln!("{line}");
        }
    }));
}

fn crash_report_lines(info: &PanicHookInfo<'_>) -> Vec<String> {
    let rule = "═".repeat(WIDTH + 2);
    let mut lines = vec![
        format!("╔{rule}╗"),
        boxed("STUDIOPLAN CRASH REPORT"),
        format!("╠{rule}╣"),
        boxed(&format!("Version: {VERSION}")),
        boxed(&format!("Platform: {}", std::env::consts::OS)),
        boxed(&format!("PANIC: {}", panic_message(info))),
    ];

    if let Some(location) = info.location() {
        lines.push(boxed(&format!(
            "Location: {}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        )));
    }
    if let Some(metadata) = Span::current().metadata() {
        lines.push(boxed(&format!("Span: {}", metadata.name())));
    }
    if let Some(source) = current_data_source() {
        lines.push(boxed(&format!("Data: {}", source.display())));
    }
    if std::env::var_os("RUST_BACKTRACE").is_none() {
        lines.push(boxed("Run with RUST_BACKTRACE=1 for stack trace"));
    }
    lines.push(format!("╚{rule}╝"));
    lines
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn boxed(text: &str) -> String {
    format!("║ {:<WIDTH$} ║", truncate(text, WIDTH))
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
