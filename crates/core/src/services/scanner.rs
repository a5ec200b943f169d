//! Content scanner.
//!
//! Policy checks for free text and URLs. The scanner is built once at
//! startup from [`ModerationConfig`] and is immutable afterwards. Matching is
//! token-based: a denylisted term only flags when it appears as a whole
//! token, never as a substring of a longer word.

use std::collections::HashSet;

use arbiter_common::{FieldIssue, ModerationConfig};
use url::Url;

/// Maximum accepted URL length.
const MAX_URL_LENGTH: usize = 2048;

/// Result of scanning a free-text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// Whether any denylisted term matched.
    pub flagged: bool,
    /// The denylisted terms that matched, in order of first appearance.
    pub matches: Vec<String>,
}

/// Result of validating a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlCheck {
    /// Whether the URL passed every check.
    pub valid: bool,
    /// Every problem found, not just the first.
    pub issues: Vec<String>,
}

/// The free-text fields and links of a profile write, ready for scanning.
#[derive(Debug, Clone, Copy)]
pub struct ProfilePayload<'a> {
    pub display_name: Option<&'a str>,
    pub headline: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub location: Option<&'a str>,
    pub links: &'a [String],
}

/// Scanner for profile text and links.
#[derive(Debug, Clone)]
pub struct ContentScanner {
    denylist: HashSet<String>,
    allowed_domains: Vec<String>,
    strict_mode: bool,
}

impl ContentScanner {
    /// Build a scanner from the moderation flags.
    ///
    /// Denylist terms are normalized the same way scanned text is, so the
    /// configuration may mix cases and accents freely.
    #[must_use]
    pub fn new(config: &ModerationConfig) -> Self {
        let denylist = config
            .profanity_denylist
            .iter()
            .map(|term| normalize(term))
            .filter(|term| !term.is_empty())
            .collect();

        let allowed_domains = config
            .url_allowed_domains
            .iter()
            .map(|d| d.trim().to_lowercase())
            .filter(|d| !d.is_empty())
            .collect();

        Self {
            denylist,
            allowed_domains,
            strict_mode: config.moderation_strict_mode,
        }
    }

    /// Scan a free-text field against the denylist.
    ///
    /// Text is lowercased, diacritics are folded and punctuation is stripped
    /// before tokenization, so `cl.ass` matches a denylisted `class` while
    /// `classic` does not. Leetspeak (`cl4ss`) is intentionally left alone.
    #[must_use]
    pub fn scan_text(&self, text: &str) -> ScanResult {
        let mut matches: Vec<String> = Vec::new();

        if !self.denylist.is_empty() {
            for token in normalize(text).split_whitespace() {
                if self.denylist.contains(token) && !matches.iter().any(|m| m == token) {
                    matches.push(token.to_string());
                }
            }
        }

        ScanResult {
            flagged: !matches.is_empty(),
            matches,
        }
    }

    /// Validate a URL.
    ///
    /// Dangerous schemes (`javascript:`, `data:`, anything not http/https)
    /// are rejected regardless of mode. In strict mode the host must be an
    /// allowlisted domain or a subdomain of one. Unparseable input is
    /// invalid, never an error.
    #[must_use]
    pub fn validate_url(&self, raw: &str) -> UrlCheck {
        let mut issues = Vec::new();

        if raw.len() > MAX_URL_LENGTH {
            issues.push(format!("URL exceeds {MAX_URL_LENGTH} characters"));
        }

        match Url::parse(raw) {
            Ok(url) => {
                let scheme = url.scheme();
                if scheme != "http" && scheme != "https" {
                    issues.push(format!("unsupported scheme: {scheme}"));
                } else if self.strict_mode {
                    match url.host_str() {
                        Some(host) if self.is_allowed_host(host) => {}
                        Some(host) => issues.push(format!("domain not allowlisted: {host}")),
                        None => issues.push("URL has no host".to_string()),
                    }
                }
            }
            Err(_) => issues.push("malformed URL".to_string()),
        }

        UrlCheck {
            valid: issues.is_empty(),
            issues,
        }
    }

    /// Scan every field of a profile payload.
    ///
    /// Aggregates all issues instead of stopping at the first, so a caller
    /// can report every problem at once.
    #[must_use]
    pub fn scan_profile_payload(&self, payload: &ProfilePayload<'_>) -> Vec<FieldIssue> {
        let mut issues = Vec::new();

        let text_fields = [
            ("displayName", payload.display_name),
            ("headline", payload.headline),
            ("bio", payload.bio),
            ("location", payload.location),
        ];

        for (field, value) in text_fields {
            let Some(text) = value else { continue };
            let result = self.scan_text(text);
            if result.flagged {
                issues.push(FieldIssue {
                    field: field.to_string(),
                    problem: format!("contains denylisted terms: {}", result.matches.join(", ")),
                });
            }
        }

        for (index, link) in payload.links.iter().enumerate() {
            let check = self.validate_url(link);
            if !check.valid {
                for problem in check.issues {
                    issues.push(FieldIssue {
                        field: format!("links[{index}]"),
                        problem,
                    });
                }
            }
        }

        issues
    }

    fn is_allowed_host(&self, host: &str) -> bool {
        let host = host.to_lowercase();
        self.allowed_domains
            .iter()
            .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
    }
}

/// Lowercase, fold diacritics and drop punctuation.
///
/// Whitespace survives so the result can be tokenized; everything else
/// non-alphanumeric is removed, which also collapses punctuation-based
/// evasion (`cl.ass` becomes `class`).
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(fold_diacritic)
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Map common accented Latin characters to their ASCII base.
const fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ğ' | 'ģ' => 'g',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ĺ' | 'ļ' | 'ľ' | 'ł' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ř' => 'r',
        'ś' | 'š' | 'ş' => 's',
        'ţ' | 'ť' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        _ => c,
    }
}
