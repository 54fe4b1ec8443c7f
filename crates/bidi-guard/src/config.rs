//! Run configuration resolved from the command line.

use bidi_diagnostics::RenderConfig;
use bidi_scanner::ScanMode;
use termcolor::ColorChoice;
use tracing::warn;

/// When to color the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorWhen {
    /// Color when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

/// Configuration for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardConfig {
    pub mode: ScanMode,
    pub color: ColorWhen,
}

impl GuardConfig {
    /// Resolve the scan mode from the `--fix` switch and the positional mode
    /// words. `fix` is the only mode word; anything else is logged and
    /// ignored.
    pub fn from_flags<S: AsRef<str>>(fix: bool, modes: &[S], color: ColorWhen) -> Self {
        let mut mode = if fix { ScanMode::Fix } else { ScanMode::Report };
        for word in modes {
            match word.as_ref() {
                "fix" => mode = ScanMode::Fix,
                other => warn!(mode = other, "ignoring unknown mode"),
            }
        }
        Self { mode, color }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            use_color: self.color != ColorWhen::Never,
        }
    }

    pub fn color_choice(&self) -> ColorChoice {
        match self.color {
            ColorWhen::Auto => ColorChoice::Auto,
            ColorWhen::Always => ColorChoice::Always,
            ColorWhen::Never => ColorChoice::Never,
        }
    }
}
