//! Regular expressions derived from the label tables.

use log::trace;
use regex::Regex;
use std::collections::HashMap;
use std::sync::RwLock;

use super::labels::{CanonicalLabel, sort_longest_first};

/// Characters that separate the fields of a release filename.
pub const FILENAME_SEPARATORS: [char; 3] = ['-', '.', '_'];

/// Builds the alternation of every alias from every label, longest first.
///
/// The ordering matters: the split stops at the first alternative that
/// matches, so `arm64` has to be tried before `arm`, and `x86_64` before
/// `x86`.
pub fn split_pattern<'a>(labels: impl IntoIterator<Item = &'a CanonicalLabel>) -> String {
    let mut all: Vec<&str> = labels
        .into_iter()
        .flat_map(|l| l.aliases.iter().map(String::as_str))
        .collect();
    sort_longest_first(&mut all);

    let escaped: Vec<String> = all.iter().map(|a| regex::escape(a)).collect();
    format!("(?i)({})", escaped.join("|"))
}

/// Builds the pattern for one canonical label. Each alias must be followed
/// by a filename separator or the end of the string, so `arm` does not
/// match the start of `arm64.exe`. The alias text is captured in group 1.
pub fn boundary_pattern(label: &CanonicalLabel) -> String {
    let aliases: Vec<String> = label
        .sorted_aliases()
        .into_iter()
        .map(regex::escape)
        .collect();

    let separators: String = FILENAME_SEPARATORS
        .iter()
        .map(|c| regex::escape(&c.to_string()))
        .collect();

    format!("(?i)({})(?:[{}]|$)", aliases.join("|"), separators)
}

/// Compiled patterns keyed by their source text.
///
/// Two callers missing on the same pattern at once both compile it; the
/// second insert replaces the first with an identical regex.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: RwLock<HashMap<String, Regex>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compile(&self, pattern: &str) -> Result<Regex, regex::Error> {
        if let Ok(compiled) = self.compiled.read() {
            if let Some(re) = compiled.get(pattern) {
                return Ok(re.clone());
            }
        }

        trace!("compiling pattern {}", pattern);
        let re = Regex::new(pattern)?;
        if let Ok(mut compiled) = self.compiled.write() {
            compiled.insert(pattern.to_string(), re.clone());
        }
        Ok(re)
    }

    pub fn len(&self) -> usize {
        self.compiled.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Trims one trailing separator left over after cutting a platform token
/// off a filename.
pub fn trim_separator_suffix(name: &str) -> &str {
    name.strip_suffix(&FILENAME_SEPARATORS[..]).unwrap_or(name)
}
