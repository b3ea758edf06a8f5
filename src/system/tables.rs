//! The immutable lookup configuration shared by the classifier, the
//! aggregator and the selector.

use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;

use super::extension::{ExtensionList, builtin_archive_extensions, builtin_package_extensions};
use super::labels::{CanonicalLabel, builtin_arch_labels, builtin_os_labels};
use super::pattern::{PatternCache, boundary_pattern, split_pattern};

#[derive(Debug, Error)]
pub enum TablesError {
    #[error("alias {alias:?} is claimed by both {first:?} and {second:?}")]
    OverlappingAlias {
        alias: String,
        first: String,
        second: String,
    },

    #[error("package and archive extensions overlap on {0:?}")]
    OverlappingExtension(String),

    #[error("invalid label pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A label together with its compiled boundary matcher.
#[derive(Debug, Clone)]
pub(crate) struct LabelMatcher {
    pub(crate) label: CanonicalLabel,
    pub(crate) regex: Regex,
}

/// Alias tables, extension lists and the compiled patterns derived from them.
///
/// Build it once at startup and pass it by reference.
#[derive(Debug)]
pub struct Tables {
    os: Vec<LabelMatcher>,
    arch: Vec<LabelMatcher>,
    packages: ExtensionList,
    archives: ExtensionList,
    split: Regex,
    cache: PatternCache,
}

impl Tables {
    pub fn new(
        os: Vec<CanonicalLabel>,
        arch: Vec<CanonicalLabel>,
        packages: ExtensionList,
        archives: ExtensionList,
    ) -> Result<Self, TablesError> {
        check_disjoint(&os)?;
        check_disjoint(&arch)?;
        if let Some(ext) = packages
            .extensions()
            .find(|p| archives.extensions().any(|a| a == *p))
        {
            return Err(TablesError::OverlappingExtension(ext.to_string()));
        }

        let cache = PatternCache::new();
        let split = cache.get_or_compile(&split_pattern(arch.iter().chain(os.iter())))?;
        let os = compile_matchers(&cache, os)?;
        let arch = compile_matchers(&cache, arch)?;

        Ok(Self {
            os,
            arch,
            packages,
            archives,
            split,
            cache,
        })
    }

    /// The built-in OS, architecture, package and archive tables.
    pub fn builtin() -> Result<Self, TablesError> {
        Self::new(
            builtin_os_labels(),
            builtin_arch_labels(),
            builtin_package_extensions(),
            builtin_archive_extensions(),
        )
    }

    /// Returns the canonical OS for `label`, or `None` if it is not a known alias.
    pub fn resolve_os(&self, label: &str) -> Option<&str> {
        resolve(&self.os, label)
    }

    /// Returns the canonical architecture for `label`, or `None` if it is not
    /// a known alias.
    pub fn resolve_arch(&self, label: &str) -> Option<&str> {
        resolve(&self.arch, label)
    }

    /// The alternation of every OS and architecture alias.
    pub fn global_split_pattern(&self) -> &Regex {
        &self.split
    }

    /// Compiles (or fetches from the cache) the boundary pattern for one label.
    pub fn boundary_pattern(&self, label: &CanonicalLabel) -> Result<Regex, regex::Error> {
        self.cache.get_or_compile(&boundary_pattern(label))
    }

    pub fn os_labels(&self) -> impl Iterator<Item = &CanonicalLabel> {
        self.os.iter().map(|m| &m.label)
    }

    pub fn arch_labels(&self) -> impl Iterator<Item = &CanonicalLabel> {
        self.arch.iter().map(|m| &m.label)
    }

    pub fn packages(&self) -> &ExtensionList {
        &self.packages
    }

    pub fn archives(&self) -> &ExtensionList {
        &self.archives
    }

    pub(crate) fn os_matchers(&self) -> &[LabelMatcher] {
        &self.os
    }

    pub(crate) fn arch_matchers(&self) -> &[LabelMatcher] {
        &self.arch
    }

    #[cfg(test)]
    pub(crate) fn pattern_cache(&self) -> &PatternCache {
        &self.cache
    }
}

fn resolve<'a>(matchers: &'a [LabelMatcher], label: &str) -> Option<&'a str> {
    matchers
        .iter()
        .find(|m| m.label.matches(label))
        .map(|m| m.label.name.as_str())
}

fn compile_matchers(
    cache: &PatternCache,
    labels: Vec<CanonicalLabel>,
) -> Result<Vec<LabelMatcher>, regex::Error> {
    labels
        .into_iter()
        .map(|label| {
            let regex = cache.get_or_compile(&boundary_pattern(&label))?;
            Ok(LabelMatcher { label, regex })
        })
        .collect()
}

fn check_disjoint(labels: &[CanonicalLabel]) -> Result<(), TablesError> {
    let mut owners: HashMap<String, &str> = HashMap::new();
    for label in labels {
        for alias in &label.aliases {
            if let Some(first) = owners.insert(alias.to_lowercase(), &label.name) {
                return Err(TablesError::OverlappingAlias {
                    alias: alias.clone(),
                    first: first.to_string(),
                    second: label.name.clone(),
                });
            }
        }
    }
    Ok(())
}
