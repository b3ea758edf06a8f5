//! Derives OS, architecture, package and archive type from a filename.

use log::trace;

use crate::system::labels::{OS_DARWIN, OS_LINUX, OS_WINDOWS};
use crate::system::{LabelMatcher, Tables};

/// Filename suffixes that imply an OS when the name carries no OS token.
const OS_BY_EXTENSION: &[(&str, &str)] = &[
    (".rpm", OS_LINUX),
    (".deb", OS_LINUX),
    (".apk", OS_LINUX),
    (".exe", OS_WINDOWS),
    (".msi", OS_WINDOWS),
    (".dmg", OS_DARWIN),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub os: Option<String>,
    pub arch: Option<String>,
    pub package_type: Option<String>,
    pub archive_type: Option<String>,
}

pub fn classify(tables: &Tables, filename: &str) -> Classification {
    let classification = Classification {
        os: os_from_filename(tables, filename).map(str::to_string),
        arch: arch_from_filename(tables, filename).map(str::to_string),
        package_type: tables.packages().type_from_file(filename).map(str::to_string),
        archive_type: tables.archives().type_from_file(filename).map(str::to_string),
    };
    trace!("classified {:?} as {:?}", filename, classification);
    classification
}

/// Canonical architecture named in `filename`, if any.
pub fn arch_from_filename<'a>(tables: &'a Tables, filename: &str) -> Option<&'a str> {
    longest_label(tables.arch_matchers(), filename)
}

/// Canonical OS named in `filename`. Names without an OS token fall back to
/// the OS implied by a native installer extension.
pub fn os_from_filename<'a>(tables: &'a Tables, filename: &str) -> Option<&'a str> {
    longest_label(tables.os_matchers(), filename).or_else(|| os_from_extension(filename))
}

fn os_from_extension(filename: &str) -> Option<&'static str> {
    let lower = filename.to_lowercase();
    OS_BY_EXTENSION
        .iter()
        .find(|(ext, _)| lower.ends_with(ext))
        .map(|(_, os)| *os)
}

/// Runs every label's boundary pattern and keeps the longest alias hit.
/// Hits of equal length from different labels make the name ambiguous and
/// yield `None`; the same label matching twice is fine.
fn longest_label<'a>(matchers: &'a [LabelMatcher], filename: &str) -> Option<&'a str> {
    let mut best: Option<(usize, &str)> = None;
    let mut ambiguous = false;
    for matcher in matchers {
        let name = matcher.label.name.as_str();
        for caps in matcher.regex.captures_iter(filename) {
            let Some(alias) = caps.get(1) else {
                continue;
            };
            match best {
                Some((len, _)) if alias.len() < len => {}
                Some((len, best_name)) if alias.len() == len => {
                    if best_name != name {
                        ambiguous = true;
                    }
                }
                _ => {
                    best = Some((alias.len(), name));
                    ambiguous = false;
                }
            }
        }
    }
    if ambiguous {
        trace!("{:?} names more than one label", filename);
        return None;
    }
    best.map(|(_, name)| name)
}
