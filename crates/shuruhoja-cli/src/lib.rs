/// Shuru Hoja CLI — argument parsing, report rendering, and export.
///
/// Consumes the ordered results of a `shuruhoja-core` scan and turns them
/// into a coloured terminal report or JSON/CSV on stdout.
pub mod app;
pub mod args;
pub mod export;
pub mod progress;
pub mod render;
pub mod theme;

pub use app::{run, scan_and_report, Outcome};
pub use args::Cli;
pub use theme::Theme;
