use super::*;

mod daily_run;

#[traced_test]
#[test]
fn test_listing_fixture_extraction() {
  let papers = parse_listing(&listing_fixture(), &ListingConfig::default()).unwrap();

  let ids: Vec<_> = papers.iter().map(|p| p.id.as_str()).collect();
  assert_eq!(ids, ["2401.00001", "2401.00002", "2401.00003"]);

  assert_eq!(papers[0].title, "Scaling Laws for Sparse Mixtures");
  assert_eq!(papers[0].authors, vec!["Ada Lovelace", "Alan Turing"]);
  assert_eq!(papers[0].source_link, "https://arxiv.org/abs/2401.00001");
  assert!(papers[2].authors.is_empty());

  assert!(logs_contain("Duplicate paper detected with ID 2401.00001"));
  assert!(logs_contain("Title not found"));
  assert!(logs_contain("Could not extract paper ID"));
}

#[test]
fn test_duplicate_block_yields_single_record() {
  let block = r#"<div class="w-full"><a class="line-clamp-3" href="/papers/2401.00001">Twice</a></div>"#;
  let html = format!("<html><body>{block}{block}</body></html>");

  let papers = parse_listing(&html, &ListingConfig::default()).unwrap();
  assert_eq!(papers.len(), 1);
  assert_eq!(papers[0].id, "2401.00001");
}
