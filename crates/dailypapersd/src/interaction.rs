//! Terminal output and prompts.

use console::Term;
use dialoguer::Confirm;

use super::*;

/// Prefix for information messages
pub static INFO_PREFIX: &str = "ℹ ";
/// Prefix for long-running steps
pub static WORKING_PREFIX: &str = "» ";
/// Prefix for success messages
pub static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for error messages
pub static ERROR_PREFIX: &str = "✗ ";
/// Prefix for warning messages
pub static WARNING_PREFIX: &str = "! ";
/// Prefix for user prompts
pub static PROMPT_PREFIX: &str = "❯ ";
/// Prefix for list items
pub static ITEM_PREFIX: &str = "├─";
/// Prefix for the last item of a list
pub static LAST_ITEM_PREFIX: &str = "└─";
/// Continuation line for tree structure
pub static CONTINUE_PREFIX: &str = "│  ";

/// Something to show the user.
#[derive(Debug)]
pub enum ResponseContent<'a> {
  /// A single paper with its generated fields
  Paper(&'a PaperRecord),
  /// A compact list of papers
  Papers(&'a [PaperRecord]),
  /// A step is starting
  Working(&'a str),
  /// Something completed
  Success(&'a str),
  /// Something went wrong but the command continues
  Warning(&'a str),
  /// Neutral information
  Info(&'a str),
}

/// How commands talk to the user.
pub trait UserInteraction {
  /// Asks a yes/no question. `default` is the answer used when nobody can be asked.
  fn confirm(&self, message: &str, default: bool) -> Result<bool>;
  /// Prints a response.
  fn reply(&self, content: ResponseContent) -> Result<()>;
}

impl UserInteraction for Cli {
  fn confirm(&self, message: &str, default: bool) -> Result<bool> {
    if self.accept_defaults {
      return Ok(true);
    }
    if !Term::stderr().is_term() {
      debug!("No terminal attached, answering {default} to: {message}");
      return Ok(default);
    }
    Ok(
      Confirm::new()
        .with_prompt(format!("{}{message}", style(PROMPT_PREFIX).cyan()))
        .default(default)
        .interact()?,
    )
  }

  fn reply(&self, content: ResponseContent) -> Result<()> {
    match content {
      ResponseContent::Paper(paper) => {
        println!("{} {}", style(SUCCESS_PREFIX).green(), style(&paper.title).white().bold());
        println!("   {}{}", style(ITEM_PREFIX).dim(), style(&paper.id).yellow());
        println!("   {}{}", style(ITEM_PREFIX).dim(), style(paper.authors_display()).cyan());
        println!("   {}{}", style(ITEM_PREFIX).dim(), paper.source_link);
        if paper.is_summarized() {
          println!("   {}{}", style(ITEM_PREFIX).dim(), style(&paper.category).magenta());
          println!("   {}{}", style(LAST_ITEM_PREFIX).dim(), paper.summary);
        } else {
          println!("   {}{}", style(LAST_ITEM_PREFIX).dim(), style("No summary").dim());
        }
      },
      ResponseContent::Papers(papers) => {
        println!("{} Found {} papers:", style(SUCCESS_PREFIX).green(), style(papers.len()).yellow());
        for (i, paper) in papers.iter().enumerate() {
          let prefix = if i + 1 == papers.len() { LAST_ITEM_PREFIX } else { ITEM_PREFIX };
          println!(
            "   {}{} {}",
            style(prefix).dim(),
            style(&paper.id).yellow(),
            style(&paper.title).white().bold()
          );
          if !paper.authors.is_empty() {
            println!("   {}   {}", style(CONTINUE_PREFIX).dim(), style(paper.authors_display()).cyan());
          }
        }
      },
      ResponseContent::Working(message) => println!("{} {message}", style(WORKING_PREFIX).cyan()),
      ResponseContent::Success(message) => println!("{} {message}", style(SUCCESS_PREFIX).green()),
      ResponseContent::Warning(message) => eprintln!("{} {message}", style(WARNING_PREFIX).yellow()),
      ResponseContent::Info(message) => println!("{} {message}", style(INFO_PREFIX).blue()),
    }
    Ok(())
  }
}

/// Prints a fatal error before it is returned from `main`.
pub fn report_error(error: &DailyPapersdError) {
  eprintln!("{} {}", style(ERROR_PREFIX).red(), style(error).red());
}
