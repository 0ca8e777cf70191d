/*!
 * Character encoding detection for subtitle files.
 *
 * SAMI files rarely declare their encoding. Detection runs once on the
 * original bytes: a byte order mark wins, otherwise a statistical guess
 * is made. Windows code page names (cp949, 932, ...) are accepted as
 * labels in addition to the WHATWG ones.
 */

use std::collections::HashMap;

use chardetng::EncodingDetector as Chardet;
use encoding_rs::Encoding;
use log::debug;
use once_cell::sync::Lazy;

/// Code page aliases registered once per process
static CODE_PAGE_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    debug!("Registering code page encoding aliases");
    HashMap::from([
        ("949", "euc-kr"),
        ("cp949", "euc-kr"),
        ("ms949", "euc-kr"),
        ("uhc", "euc-kr"),
        ("51949", "euc-kr"),
        ("932", "shift_jis"),
        ("cp932", "shift_jis"),
        ("ms932", "shift_jis"),
        ("936", "gbk"),
        ("cp936", "gbk"),
        ("950", "big5"),
        ("cp950", "big5"),
        ("1250", "windows-1250"),
        ("1251", "windows-1251"),
        ("1252", "windows-1252"),
        ("cp1252", "windows-1252"),
        ("65001", "utf-8"),
        ("cp65001", "utf-8"),
    ])
});

/// Resolve an encoding label, accepting Windows code page names
pub fn resolve_label(label: &str) -> Option<&'static Encoding> {
    let normalized = label.trim().to_ascii_lowercase();
    Encoding::for_label(normalized.as_bytes()).or_else(|| {
        CODE_PAGE_ALIASES
            .get(normalized.as_str())
            .and_then(|alias| Encoding::for_label(alias.as_bytes()))
    })
}

/// Detects the character encoding of raw subtitle bytes
pub trait EncodingDetector {
    /// Best guess for the encoding of `bytes`
    fn detect(&self, bytes: &[u8]) -> &'static Encoding;
}

/// BOM sniffing followed by chardetng's statistical guess
#[derive(Debug, Clone, Default)]
pub struct ChardetDetector {
    tld: Option<String>,
}

impl ChardetDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bias detection towards the legacy encodings of a top-level domain
    pub fn with_tld_hint(tld: impl Into<String>) -> Self {
        Self {
            tld: Some(tld.into().trim_start_matches('.').to_ascii_lowercase()),
        }
    }
}

impl EncodingDetector for ChardetDetector {
    fn detect(&self, bytes: &[u8]) -> &'static Encoding {
        if let Some((encoding, _)) = Encoding::for_bom(bytes) {
            debug!("Encoding from byte order mark: {}", encoding.name());
            return encoding;
        }

        let mut detector = Chardet::new();
        detector.feed(bytes, true);
        let encoding = detector.guess(self.tld.as_deref().map(str::as_bytes), true);
        debug!("Detected encoding: {}", encoding.name());
        encoding
    }
}

/// Always reports the same encoding
#[derive(Debug, Clone, Copy)]
pub struct FixedEncoding(pub &'static Encoding);

impl EncodingDetector for FixedEncoding {
    fn detect(&self, _bytes: &[u8]) -> &'static Encoding {
        self.0
    }
}

/// Decode bytes into text lines, stripping any byte order mark
pub fn decode_lines(bytes: &[u8], encoding: &'static Encoding) -> Vec<String> {
    let (text, actual, had_errors) = encoding.decode(bytes);
    if had_errors {
        debug!("Malformed {} sequences replaced while decoding", actual.name());
    }
    text.lines().map(str::to_string).collect()
}

/// Encode lines for writing back to disk with CRLF line endings
pub fn encode_lines<S: AsRef<str>>(lines: &[S], encoding: &'static Encoding) -> Vec<u8> {
    let mut text = String::new();
    for line in lines {
        for physical in line.as_ref().split('\n') {
            text.push_str(physical.trim_end_matches('\r'));
            text.push_str("\r\n");
        }
    }
    let (bytes, _, _) = encoding.encode(&text);
    bytes.into_owned()
}
