//! Terminal and JSON rendering for rtbuild commands.
//!
//! Status lines go to stdout, warnings and failures to stderr. Colors are only
//! emitted when the target stream supports them.

use std::fmt::Display;
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{AnsiColors, OwoColorize, Stream};
use rtbuild_lib::decide::RebuildReason;
use rtbuild_lib::scan::NativeModules;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

/// Kind of a one-line status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
  Done,
  Note,
  Warn,
  Fail,
}

impl Tone {
  fn symbol(self) -> &'static str {
    match self {
      Tone::Done => "✓",
      Tone::Note => "•",
      Tone::Warn => "⚠",
      Tone::Fail => "✗",
    }
  }

  fn color(self) -> AnsiColors {
    match self {
      Tone::Done => AnsiColors::Green,
      Tone::Note => AnsiColors::Blue,
      Tone::Warn => AnsiColors::Yellow,
      Tone::Fail => AnsiColors::Red,
    }
  }

  fn on_stderr(self) -> bool {
    matches!(self, Tone::Warn | Tone::Fail)
  }
}

pub fn say(tone: Tone, message: &str) {
  if tone.on_stderr() {
    let raw = tone.symbol();
    let symbol = raw.if_supports_color(Stream::Stderr, |s| s.color(tone.color()));
    eprintln!("{} {}", symbol, message);
  } else {
    let raw = tone.symbol();
    let symbol = raw.if_supports_color(Stream::Stdout, |s| s.color(tone.color()));
    println!("{} {}", symbol, message);
  }
}

pub fn stat(label: &str, value: impl Display) {
  println!("  {}: {}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()), value);
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

pub fn format_elapsed(elapsed: Duration) -> String {
  match elapsed.as_millis() {
    ms @ 0..1_000 => format!("{}ms", ms),
    ms @ 1_000..60_000 => format!("{:.1}s", ms as f64 / 1000.0),
    ms => {
      let secs = ms / 1000;
      format!("{}m {:02}s", secs / 60, secs % 60)
    }
  }
}

fn module_count(count: usize) -> String {
  match count {
    1 => "1 native module".to_string(),
    n => format!("{} native modules", n),
  }
}

/// Where a project's native modules stand relative to the runtime.
#[derive(Debug, Clone, Copy)]
pub enum RebuildState<'a> {
  /// `deps` just rebuilt them.
  Rebuilt(&'a RebuildReason),
  /// `deps` would rebuild them.
  Pending(&'a RebuildReason),
  Current,
}

pub fn print_rebuild_state(modules: &NativeModules, state: RebuildState<'_>) {
  if modules.is_empty() {
    say(Tone::Note, "No native modules found");
    return;
  }

  let count = module_count(modules.len());
  match state {
    RebuildState::Rebuilt(reason) => say(Tone::Done, &format!("Rebuilt {} → {}", count, reason)),
    RebuildState::Pending(reason) => say(Tone::Note, &format!("{} would be rebuilt → {}", count, reason)),
    RebuildState::Current => say(Tone::Done, &format!("{} up to date", count)),
  }
}

/// How a scanned module compares with a recorded module set.
#[derive(Debug, PartialEq, Eq)]
enum Mark<'a> {
  Listed,
  Added,
  Changed { previous: &'a str },
  Unchanged,
}

fn mark_for<'a>(module: &str, version: &str, baseline: Option<&'a NativeModules>) -> Mark<'a> {
  let Some(baseline) = baseline else {
    return Mark::Listed;
  };
  match baseline.get(module) {
    None => Mark::Added,
    Some(previous) if previous != version => Mark::Changed { previous },
    Some(_) => Mark::Unchanged,
  }
}

/// List modules one per line, marked against `baseline` when one is given.
pub fn print_modules(modules: &NativeModules, baseline: Option<&NativeModules>) {
  for (module, version) in modules {
    let line = format!("{}@{}", module, version);
    match mark_for(module, version, baseline) {
      Mark::Listed | Mark::Unchanged => println!("    {}", line),
      Mark::Added => println!("  {} {}", "+".if_supports_color(Stream::Stdout, |s| s.green()), line),
      Mark::Changed { previous } => println!(
        "  {} {} (was {})",
        "~".if_supports_color(Stream::Stdout, |s| s.yellow()),
        line,
        previous
      ),
    }
  }
}
