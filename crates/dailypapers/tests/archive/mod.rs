use super::*;

#[test]
fn test_later_day_goes_first_and_earlier_day_is_preserved() -> TestResult<()> {
  let (config, _dir) = temp_archive();
  let templates = Templates::new()?;
  let writer = ArchiveWriter::new(&config, &templates);

  writer.write(date(1), &[summarized_paper("2401.00001", "Day One")])?;
  let day_one = Digest::parse(&fs::read_to_string(&config.digest)?).entry(date(1)).cloned().unwrap();
  let day_one_files =
    (fs::read(writer.snapshot_path(date(1)))?, fs::read(writer.entry_path(date(1)))?);

  writer.write(date(2), &[summarized_paper("2401.00002", "Day Two")])?;

  let text = fs::read_to_string(&config.digest)?;
  let digest = Digest::parse(&text);
  assert_eq!(digest.dates(), vec![date(2), date(1)]);
  assert_eq!(digest.entry(date(1)), Some(&day_one));
  assert!(text.find("Day Two").unwrap() < text.find("Day One").unwrap());
  assert!(digest.intro.contains("2024--01--02"));

  assert_eq!(
    (fs::read(writer.snapshot_path(date(1)))?, fs::read(writer.entry_path(date(1)))?),
    day_one_files
  );
  Ok(())
}

#[test]
fn test_hand_edited_entry_survives_merge() -> TestResult<()> {
  let (config, _dir) = temp_archive();
  let templates = Templates::new()?;
  let writer = ArchiveWriter::new(&config, &templates);

  writer.write(date(1), &[summarized_paper("2401.00001", "Day One")])?;
  let edited = fs::read_to_string(&config.digest)?.replace("Summary of Day One.", "Edited *by hand*.");
  fs::write(&config.digest, &edited)?;

  writer.write(date(2), &[summarized_paper("2401.00002", "Day Two")])?;
  let digest = Digest::parse(&fs::read_to_string(&config.digest)?);
  assert!(digest.entry(date(1)).unwrap().body.contains("Edited *by hand*."));
  Ok(())
}

#[traced_test]
#[test]
fn test_digest_without_markers_is_migrated() -> TestResult<()> {
  let (config, _dir) = temp_archive();
  let templates = Templates::new()?;
  fs::write(
    &config.digest,
    "# Daily Papers\n\nOld intro.\n\n## Papers for 2023-12-31\n\n| Title | Authors | Category | \
     Summary |\n| ----- | ------- | -------- | ------- |\n| Old paper | A | B | C |\n",
  )?;

  ArchiveWriter::new(&config, &templates).write(date(1), &[summarized_paper("2401.00001", "New")])?;

  let text = fs::read_to_string(&config.digest)?;
  let digest = Digest::parse(&text);
  let old = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
  assert_eq!(digest.dates(), vec![date(1), old]);
  assert!(digest.entry(old).unwrap().body.ends_with("| Old paper | A | B | C |"));
  assert!(!text.contains("Old intro."));
  assert!(logs_contain("Migrating 1 digest entries"));
  Ok(())
}

#[test]
fn test_rerun_replaces_the_days_entry() -> TestResult<()> {
  let (config, _dir) = temp_archive();
  let templates = Templates::new()?;
  let writer = ArchiveWriter::new(&config, &templates);

  writer.write(date(1), &[PaperRecord::new("2401.00001", "Blank at first", vec![])?])?;
  writer.write(date(1), &[summarized_paper("2401.00001", "Blank at first")])?;

  let digest = Digest::parse(&fs::read_to_string(&config.digest)?);
  assert_eq!(digest.dates(), vec![date(1)]);
  assert!(digest.entry(date(1)).unwrap().body.contains("Summary of Blank at first."));
  assert!(writer.load_snapshot(date(1))?[0].is_summarized());
  Ok(())
}

#[test]
fn test_rebuild_matches_incremental_merge() -> TestResult<()> {
  let (config, _dir) = temp_archive();
  let templates = Templates::new()?;
  let writer = ArchiveWriter::new(&config, &templates);

  writer.write(date(1), &[summarized_paper("2401.00001", "One")])?;
  writer.write(date(3), &[summarized_paper("2401.00003", "Three")])?;
  writer.write(date(2), &[summarized_paper("2401.00002", "Two")])?;
  let merged = Digest::parse(&fs::read_to_string(&config.digest)?);

  fs::remove_file(&config.digest)?;
  assert_eq!(writer.rebuild_digest(date(2))?, 3);
  let rebuilt = Digest::parse(&fs::read_to_string(&config.digest)?);

  assert_eq!(rebuilt.dates(), vec![date(3), date(2), date(1)]);
  assert_eq!(rebuilt.entries, merged.entries);
  assert_eq!(writer.archived_dates()?, vec![date(3), date(2), date(1)]);
  Ok(())
}

#[test]
fn test_empty_day_is_still_archived() -> TestResult<()> {
  let (config, _dir) = temp_archive();
  let templates = Templates::new()?;
  let writer = ArchiveWriter::new(&config, &templates);

  writer.write(date(6), &[])?;
  assert_eq!(fs::read_to_string(writer.snapshot_path(date(6)))?, "[]\n");
  assert!(writer.load_snapshot(date(6))?.is_empty());
  Ok(())
}
