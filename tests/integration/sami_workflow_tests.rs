/*!
 * End-to-end tests for reading SAMI files from disk
 */

use anyhow::Result;
use std::fs;
use smisub::encoding::ChardetDetector;
use smisub::sami::{SamiParser, SubtitleParser};
use smisub::subtitle_processor::SubtitleCollection;
use crate::common;

const KOREAN_SAMI: &str = "<SAMI>\r
<HEAD>\r
<TITLE>드라마</TITLE>\r
</HEAD>\r
<BODY>\r
<SYNC Start=2000><P Class=KRCC>두 번째 대사입니다. 잘 지내셨어요?\r
<SYNC Start=500><P Class=KRCC>안녕하세요, 여러분. 오늘 날씨가 정말 좋네요.\r
</BODY>\r
</SAMI>\r
";

fn summary(entries: &[smisub::SubtitleEntry]) -> Vec<(u64, u64, String)> {
    entries
        .iter()
        .map(|e| (e.start_time_ms, e.end_time_ms, e.text.clone()))
        .collect()
}

/// Test parsing through the generic parser trait
#[test]
fn test_parse_format_withMalformedFile_shouldReturnOrderedEntries() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_sami(temp_dir.path(), "movie.smi")?;
    let parser = SamiParser::new();

    let entries = parser.parse_format(&path)?;

    assert_eq!(parser.file_extension(), ".smi");
    assert_eq!(
        summary(&entries),
        vec![
            (1000, 3000, "First\nline".to_string()),
            (3000, 5000, "Second line".to_string()),
            (5000, 6000, "Third line".to_string()),
        ]
    );
    Ok(())
}

/// Test that the source file is left untouched by default
#[test]
fn test_parse_file_withoutRepair_shouldNotModifySource() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_sami(temp_dir.path(), "movie.smi")?;

    let parsed = SamiParser::new().parse_file(&path)?;

    assert!(!parsed.repaired_on_disk);
    assert_eq!(fs::read_to_string(&path)?, common::MALFORMED_SAMI);
    Ok(())
}

/// Test that in-place repair rewrites the file and the rewrite parses the same
#[test]
fn test_parse_file_withRepairInPlace_shouldPersistNormalizedMarkup() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_sami(temp_dir.path(), "movie.smi")?;
    let parser = SamiParser::new().with_repair_in_place(true);

    let first = parser.parse_file(&path)?;
    assert!(first.repaired_on_disk);

    let on_disk = fs::read_to_string(&path)?;
    assert!(on_disk.contains("\r\n"));
    assert!(on_disk.contains("<SYNC Start=1000><P Class=KRCC>\r\nFirst<br>line"));
    assert!(on_disk.contains("<Font Face=\"Gulim\">Second line"));
    let first_cue = on_disk.find("Start=1000").unwrap();
    let last_cue = on_disk.find("start=5000").unwrap();
    assert!(first_cue < last_cue);

    // A repaired file needs no further repair
    let second = parser.parse_file(&path)?;
    assert!(!second.repaired_on_disk);
    assert_eq!(summary(&first.entries), summary(&second.entries));
    Ok(())
}

/// Test that an EUC-KR file is detected and decoded
#[test]
fn test_parse_file_withEucKrFile_shouldDecodeHangul() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (bytes, _, had_errors) = encoding_rs::EUC_KR.encode(KOREAN_SAMI);
    assert!(!had_errors);
    let path = common::create_test_bytes(temp_dir.path(), "korean.smi", &bytes)?;

    let parser = SamiParser::new().with_detector(ChardetDetector::with_tld_hint("kr"));
    let parsed = parser.parse_file(&path)?;

    assert_eq!(parsed.encoding, encoding_rs::EUC_KR);
    assert_eq!(parsed.entries.len(), 2);
    assert_eq!(parsed.entries[0].start_time_ms, 500);
    assert_eq!(parsed.entries[0].text, "안녕하세요, 여러분. 오늘 날씨가 정말 좋네요.");
    assert_eq!(parsed.entries[1].end_time_ms, 3000);
    Ok(())
}

/// Test that in-place repair keeps a legacy encoding on disk
#[test]
fn test_parse_file_withRepairOnEucKrFile_shouldKeepEncoding() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (bytes, _, _) = encoding_rs::EUC_KR.encode(KOREAN_SAMI);
    let path = common::create_test_bytes(temp_dir.path(), "korean.smi", &bytes)?;

    let parser = SamiParser::new()
        .with_detector(ChardetDetector::with_tld_hint("kr"))
        .with_repair_in_place(true);
    let parsed = parser.parse_file(&path)?;
    assert!(parsed.repaired_on_disk);

    let rewritten = fs::read(&path)?;
    assert!(std::str::from_utf8(&rewritten).is_err());
    let (decoded, _, had_errors) = encoding_rs::EUC_KR.decode(&rewritten);
    assert!(!had_errors);
    assert!(decoded.contains("안녕하세요"));
    Ok(())
}

/// Test that byte order marks are honored and stripped
#[test]
fn test_parse_file_withBomPrefixedFiles_shouldParse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let mut utf8 = vec![0xEF, 0xBB, 0xBF];
    utf8.extend_from_slice(common::MALFORMED_SAMI.as_bytes());
    let utf8_path = common::create_test_bytes(temp_dir.path(), "utf8.smi", &utf8)?;

    let mut utf16 = vec![0xFF, 0xFE];
    for unit in common::MALFORMED_SAMI.encode_utf16() {
        utf16.extend_from_slice(&unit.to_le_bytes());
    }
    let utf16_path = common::create_test_bytes(temp_dir.path(), "utf16.smi", &utf16)?;

    let parser = SamiParser::new();
    let from_utf8 = parser.parse_file(&utf8_path)?;
    let from_utf16 = parser.parse_file(&utf16_path)?;

    assert_eq!(from_utf8.encoding, encoding_rs::UTF_8);
    assert_eq!(from_utf16.encoding, encoding_rs::UTF_16LE);
    assert_eq!(from_utf8.entries.len(), 3);
    assert_eq!(summary(&from_utf8.entries), summary(&from_utf16.entries));
    Ok(())
}

/// Test that try_parse hides failures
#[test]
fn test_try_parse_withNonSamiOrMissingFile_shouldReturnNone() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let srt = common::create_test_file(
        temp_dir.path(),
        "actually.smi",
        "1\n00:00:01,000 --> 00:00:02,000\nHello\n",
    )?;
    let good = common::create_test_sami(temp_dir.path(), "good.smi")?;
    let parser = SamiParser::new();

    assert!(parser.try_parse(&srt).is_none());
    assert!(parser.try_parse(temp_dir.path().join("missing.smi")).is_none());
    assert_eq!(parser.try_parse(&good).map(|e| e.len()), Some(3));
    Ok(())
}

/// Test loading a collection and dropping clear-screen cues
#[test]
fn test_collection_fromSamiFile_shouldRecordEncodingAndDropBlanks() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "clear.smi",
        "<SAMI>\n<BODY>\n<SYNC Start=0><P Class=KRCC>Hi\n<SYNC Start=800><P Class=KRCC>&nbsp;\n<SYNC Start=1200><P Class=KRCC>Bye\n</BODY>\n</SAMI>\n",
    )?;

    let collection = SubtitleCollection::from_sami_file(&path, &SamiParser::new())?;
    assert_eq!(collection.entries.len(), 3);
    assert_eq!(collection.entries[0].end_time_ms, 800);

    let cleaned = collection.without_blank_entries();
    let texts: Vec<&str> = cleaned.entries.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["Hi", "Bye"]);
    assert_eq!(cleaned.entries[1].seq_num, 2);
    assert_eq!(cleaned.entries[0].end_time_ms, 800);
    Ok(())
}
