use std::io::IsTerminal;
use std::time::{Duration, Instant};

use anstyle::{AnsiColor, Effects, Style};
use indicatif::{ProgressBar, ProgressStyle};
use pinswap_resolve::{ResolutionError, ResolutionInvoker, ResolutionStep};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

pub(crate) fn current_output_style(force_plain: bool) -> OutputStyle {
    if force_plain || std::env::var_os("NO_COLOR").is_some() || !std::io::stdout().is_terminal()
    {
        OutputStyle::Plain
    } else {
        OutputStyle::Rich
    }
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct TerminalRenderer {
    style: OutputStyle,
}

impl TerminalRenderer {
    pub(crate) fn from_style(style: OutputStyle) -> Self {
        Self { style }
    }

    pub(crate) fn print_status(self, status: &str, message: &str) {
        let line = render_status_line(self.style, status, message);
        match self.style {
            OutputStyle::Plain => println!("{line}"),
            OutputStyle::Rich => println!("{}", colorize_badge(status, &line)),
        }
    }

    pub(crate) fn print_lines(self, lines: &[String]) {
        for line in lines {
            println!("{line}");
        }
    }

    fn start_spinner(self, message: String) -> Option<ProgressBar> {
        if self.style != OutputStyle::Rich {
            return None;
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan.bold} {msg} {elapsed}") {
            spinner.set_style(style.tick_chars("|/-\\ "));
        }
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(80));
        Some(spinner)
    }
}

/// Shows a spinner while each resolution step runs and reports how it went.
pub(crate) struct ProgressInvoker<I> {
    inner: I,
    renderer: TerminalRenderer,
}

impl<I> ProgressInvoker<I> {
    pub(crate) fn new(inner: I, renderer: TerminalRenderer) -> Self {
        Self { inner, renderer }
    }
}

impl<I: ResolutionInvoker> ResolutionInvoker for ProgressInvoker<I> {
    fn invoke(&mut self, step: &ResolutionStep) -> Result<(), ResolutionError> {
        let label = format!("resolving {}", step.working_dir().display());
        let spinner = self.renderer.start_spinner(label.clone());
        let started_at = Instant::now();
        let result = self.inner.invoke(step);
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        match &result {
            Ok(()) => self.renderer.print_status(
                "ok",
                &format!("{label} complete in {}", format_elapsed(started_at.elapsed())),
            ),
            Err(_) => self.renderer.print_status("err", &format!("{label} failed")),
        }
        result
    }
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => format!("{} {message}", status_badge(status)),
    }
}

fn status_badge(status: &str) -> &'static str {
    match status {
        "ok" => "[OK]",
        "warn" => "[WARN]",
        "err" => "[ERR]",
        _ => "[..]",
    }
}

fn status_style(status: &str) -> Style {
    let color = match status {
        "ok" => AnsiColor::BrightGreen,
        "warn" => AnsiColor::BrightYellow,
        "err" => AnsiColor::BrightRed,
        _ => AnsiColor::BrightBlue,
    };
    Style::new().fg_color(Some(color.into())).effects(Effects::BOLD)
}

fn colorize_badge(status: &str, line: &str) -> String {
    let badge = status_badge(status);
    match line.strip_prefix(badge) {
        Some(rest) => format!("{}{rest}", colorize(status_style(status), badge)),
        None => line.to_string(),
    }
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}

pub(crate) fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let millis = elapsed.subsec_millis();
    format!("{secs}.{millis:03}s")
}
