// IGN extraction - pulls a player name out of a free-form introduction post.
//
// Posts usually look like:
//
//     Clan: Red Dragons
//     IGN: Shadow99#1234
//
// The extractor blanks out clan blocks, finds the leftmost name indicator in
// what is left and takes the rest of that line. Everything here is a pure
// function of the message text.

use super::ign_models::{ExtractedIgn, RawMessage};
use fancy_regex::Regex;

/// Name indicators, highest priority first. When two indicators start at the
/// same offset the earlier entry wins, so `ign:` beats bare `ign`.
const IGN_INDICATORS: &[(&str, &str)] = &[
    ("ign:", r"(?i)ign:"),
    ("ign", r"(?i)ign"),
    ("in-game name:", r"(?i)in-game name:"),
    ("in-game name", r"(?i)in-game name"),
];

/// Lines containing any of these start a clan block.
const DEFAULT_CLAN_MARKERS: &[&str] = &["clan:", "clan -", "clan "];

/// Platform account tags like `#1234` at the end of a name.
const DISCRIMINATOR_PATTERN: &str = r"\s*#\s*\d+\s*$";

#[derive(Debug, Clone)]
struct IndicatorPattern {
    label: &'static str,
    regex: Regex,
}

/// Compiled extraction rules. Build once and reuse across scans.
#[derive(Debug, Clone)]
pub struct IgnExtractor {
    indicators: Vec<IndicatorPattern>,
    clan_markers: Vec<String>,
    discriminator: Regex,
}

impl Default for IgnExtractor {
    fn default() -> Self {
        Self::with_clan_markers(DEFAULT_CLAN_MARKERS.iter().map(|m| m.to_string()))
    }
}

impl IgnExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an extractor with a custom set of clan markers (matched
    /// case-insensitively as substrings of a line).
    pub fn with_clan_markers(markers: impl IntoIterator<Item = String>) -> Self {
        let indicators = IGN_INDICATORS
            .iter()
            .map(|&(label, pattern)| IndicatorPattern {
                label,
                regex: Regex::new(pattern).expect("indicator patterns are valid"),
            })
            .collect();

        Self {
            indicators,
            clan_markers: markers.into_iter().map(|m| m.to_lowercase()).collect(),
            discriminator: Regex::new(DISCRIMINATOR_PATTERN)
                .expect("discriminator pattern is valid"),
        }
    }

    /// Extract the raw name candidate from a message body.
    ///
    /// Returns `None` when no indicator is present or nothing follows it.
    pub fn extract_candidate(&self, text: &str) -> Option<String> {
        let searchable = self.strip_clan_blocks(text);
        let (label, end) = self.leftmost_indicator(&searchable)?;

        let candidate = searchable[end..]
            .split('\n')
            .next()
            .unwrap_or_default()
            .trim();

        if candidate.is_empty() {
            return None;
        }

        tracing::trace!(indicator = label, candidate, "IGN indicator matched");
        Some(candidate.to_string())
    }

    /// Same as [`extract_candidate`](Self::extract_candidate) but keeps a
    /// reference to the source message.
    pub fn extract<'a>(&self, message: &'a RawMessage) -> Option<ExtractedIgn<'a>> {
        self.extract_candidate(&message.content)
            .map(|candidate| ExtractedIgn {
                candidate,
                source: message,
            })
    }

    /// Remove a trailing `#1234` style account tag.
    pub fn strip_discriminator(&self, candidate: &str) -> String {
        self.discriminator
            .replace(candidate, "")
            .trim()
            .to_string()
    }

    /// Drop lines belonging to a clan block. A block starts at a line with a
    /// clan marker (that line is dropped too) and ends at the next line that
    /// mentions a name indicator.
    fn strip_clan_blocks(&self, text: &str) -> String {
        let mut kept = Vec::new();
        let mut skipping = false;

        for line in text.lines() {
            let lower = line.to_lowercase();

            if self.clan_markers.iter().any(|m| lower.contains(m.as_str())) {
                skipping = true;
                continue;
            }

            if self.has_indicator(line) {
                skipping = false;
            }

            if !skipping {
                kept.push(line);
            }
        }

        kept.join("\n")
    }

    fn has_indicator(&self, line: &str) -> bool {
        self.indicators
            .iter()
            .any(|p| p.regex.is_match(line).unwrap_or(false))
    }

    /// Find the indicator that starts earliest in `text`.
    /// Returns its label and the byte offset just past the match.
    fn leftmost_indicator(&self, text: &str) -> Option<(&'static str, usize)> {
        let mut best: Option<(usize, &'static str, usize)> = None;

        for pattern in &self.indicators {
            let Ok(Some(found)) = pattern.regex.find(text) else {
                continue;
            };

            let earlier = match best {
                Some((start, _, _)) => found.start() < start,
                None => true,
            };
            if earlier {
                best = Some((found.start(), pattern.label, found.end()));
            }
        }

        best.map(|(_, label, end)| (label, end))
    }
}
