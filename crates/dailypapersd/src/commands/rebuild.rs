//! Module for regenerating the digest from the archive.

use super::*;

/// Function for the [`Commands::Rebuild`] in the CLI.
pub async fn rebuild(cli: &Cli, options: DateOptions) -> Result<()> {
  let config = cli.load_config()?;
  let templates = Templates::from_config(&config.templates)?;
  let writer = ArchiveWriter::new(&config.archive, &templates);

  let count = writer.rebuild_digest(options.date())?;
  if count == 0 {
    cli.reply(ResponseContent::Warning(&format!(
      "No archived entries found under {}",
      config.archive.root.display()
    )))?;
  }
  cli.reply(ResponseContent::Success(&format!(
    "Rebuilt {} with {count} entries",
    config.archive.digest.display()
  )))
}
