//! Module for setting up a dailypapers working directory.

use std::fs;

use dailypapers::{config::DEFAULT_CONFIG, template::BUILTIN_TEMPLATES};

use super::*;

/// Options for [`Commands::Init`].
#[derive(Args, Clone)]
pub struct InitOptions {
  /// Only write the configuration file and keep using the built-in templates
  #[arg(long)]
  pub no_templates: bool,
}

/// Function for the [`Commands::Init`] in the CLI.
pub async fn init(cli: &Cli, options: InitOptions) -> Result<()> {
  let config_path = cli.config_path();
  let base = config_path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));

  if config_path.exists()
    && !cli.confirm(
      &format!("Configuration already exists at {}, overwrite it?", config_path.display()),
      false,
    )?
  {
    cli.reply(ResponseContent::Info("Keeping the existing configuration"))?;
    return Ok(());
  }

  fs::create_dir_all(base)?;
  let content = if options.no_templates { DEFAULT_CONFIG.to_string() } else { with_template_paths() };
  fs::write(&config_path, content)?;
  cli.reply(ResponseContent::Success(&format!(
    "Wrote configuration to {}",
    config_path.display()
  )))?;

  if options.no_templates {
    return Ok(());
  }

  let templates_dir = base.join("templates");
  fs::create_dir_all(&templates_dir)?;
  for (name, source) in BUILTIN_TEMPLATES {
    let path = templates_dir.join(format!("{name}.md"));
    if path.exists()
      && !cli.confirm(&format!("Template {} already exists, overwrite it?", path.display()), false)?
    {
      cli.reply(ResponseContent::Info(&format!("Keeping {}", path.display())))?;
      continue;
    }
    fs::write(&path, source)?;
    debug!("Wrote template {name} to {}", path.display());
  }
  cli.reply(ResponseContent::Success(&format!(
    "Wrote editable templates to {}",
    templates_dir.display()
  )))?;
  Ok(())
}

/// The bundled configuration with the template overrides switched on.
fn with_template_paths() -> String {
  let mut content = DEFAULT_CONFIG
    .lines()
    .map(|line| match line.strip_prefix("# ") {
      Some(setting) if setting.contains("\"templates/") => setting,
      _ => line,
    })
    .collect::<Vec<_>>()
    .join("\n");
  content.push('\n');
  content
}
