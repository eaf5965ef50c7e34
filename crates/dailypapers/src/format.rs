//! Text normalisation helpers shared by extraction, rendering and notification.

/// Characters Telegram's MarkdownV2 parse mode treats as markup.
const MARKDOWN_V2_SPECIAL: &str = r"_*[]()~`>#+-=|{}.!\";

/// Collapses every run of whitespace, including newlines, into a single space.
///
/// ```
/// use dailypapers::format::normalize_whitespace;
///
/// assert_eq!(normalize_whitespace("  Attention\n   Is All\tYou Need \n"), "Attention Is All You Need");
/// ```
pub fn normalize_whitespace(text: &str) -> String { text.split_whitespace().collect::<Vec<_>>().join(" ") }

/// Makes text safe to place inside a single Markdown table cell.
///
/// Line breaks would end the row and a bare `|` would open a new column, so newlines become
/// spaces and pipes are escaped.
pub fn table_cell(text: &str) -> String {
  text.replace("\r\n", " ").replace(['\n', '\r'], " ").replace('|', "\\|")
}

/// Escapes text for Telegram's MarkdownV2 parse mode.
///
/// ```
/// use dailypapers::format::escape_markdown_v2;
///
/// assert_eq!(escape_markdown_v2("GPT-4.5 (preview)!"), r"GPT\-4\.5 \(preview\)\!");
/// ```
pub fn escape_markdown_v2(text: &str) -> String {
  let mut escaped = String::with_capacity(text.len());
  for c in text.chars() {
    if MARKDOWN_V2_SPECIAL.contains(c) {
      escaped.push('\\');
    }
    escaped.push(c);
  }
  escaped
}

/// Escapes the target of a MarkdownV2 inline link, where only `)` and `\` are significant.
pub fn escape_markdown_v2_link(url: &str) -> String { url.replace('\\', "\\\\").replace(')', "\\)") }
