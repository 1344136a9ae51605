use anyhow::Result;

use rtbuild_lib::platform::{Platform, paths};

use crate::output::{OutputFormat, Tone, print_json, say, stat};

pub fn cmd_info(format: OutputFormat) -> Result<()> {
  let platform = Platform::current();
  let cache_dir = paths::cache_dir();

  if format.is_json() {
    return print_json(&serde_json::json!({
      "platform": platform.map(|p| p.pair()),
      "executable": platform.map(|p| p.executable_path()),
      "cache_dir": cache_dir,
    }));
  }

  println!("System:");
  match platform {
    Some(platform) => {
      stat("Platform", platform);
      stat("Executable", platform.executable_path());
    }
    None => say(Tone::Warn, "Could not detect a supported platform."),
  }
  stat("Download cache", cache_dir.display());
  Ok(())
}
