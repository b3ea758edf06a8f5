//! Groups release assets into installables.

use log::debug;
use regex::Regex;
use std::collections::HashMap;

use crate::system::{Tables, trim_separator_suffix};

use super::classify::classify;
use super::model::{Asset, Installable, ReleaseItem};

/// Clusters the platform variants of each application under one
/// [`Installable`]. Assets whose name carries no platform token are kept as
/// standalone entries. The result is sorted by name and holds every input
/// asset exactly once.
pub fn aggregate(tables: &Tables, assets: Vec<Asset>) -> Vec<ReleaseItem> {
    let splitter = tables.global_split_pattern();

    let mut items = Vec::new();
    let mut installables: Vec<Installable> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for mut asset in assets {
        asset.apply(classify(tables, &asset.name));

        let Some(name) = base_name(splitter, &asset.name, &asset.version) else {
            debug!("{} has no platform token, keeping it standalone", asset.name);
            items.push(ReleaseItem::Asset(asset));
            continue;
        };

        let idx = match by_name.get(&name) {
            Some(idx) => *idx,
            None => {
                installables.push(Installable::named_after(name.clone(), &asset));
                by_name.insert(name, installables.len() - 1);
                installables.len() - 1
            }
        };
        installables[idx].variants.push(asset);
    }

    items.extend(installables.into_iter().map(ReleaseItem::Installable));
    items.sort_by(|a, b| a.name().cmp(b.name()));
    items
}

/// The application name of `filename`: the text before its first platform
/// token, without the release version. `None` when the name has no
/// platform token or starts with one.
pub(crate) fn base_name(splitter: &Regex, filename: &str, version: &str) -> Option<String> {
    let parts: Vec<&str> = splitter.split(filename).collect();
    if parts.len() < 2 {
        return None;
    }

    let candidate = trim_separator_suffix(parts[0]);
    if candidate.is_empty() {
        return None;
    }

    let tail = parts[parts.len() - 1];
    Some(strip_version(candidate, version, tail).to_string())
}

fn strip_version<'a>(name: &'a str, version: &str, tail: &str) -> &'a str {
    if version.is_empty() {
        return name;
    }
    let bare = version.strip_prefix('v').filter(|b| !b.is_empty());

    let stripped = if let Some(rest) = name.strip_suffix(version) {
        Some(rest)
    } else if let Some(rest) = bare.and_then(|b| name.strip_suffix(b)) {
        Some(rest)
    } else if tail.starts_with(".rpm") {
        strip_rpm_release(name, version, bare)
    } else {
        None
    };

    match stripped.map(trim_separator_suffix) {
        Some(rest) if !rest.is_empty() => rest,
        _ => name,
    }
}

/// RPM files append a `-<release>` counter after the version, as in
/// `cosign-2.4.3-1.x86_64.rpm`.
fn strip_rpm_release<'a>(name: &'a str, version: &str, bare: Option<&str>) -> Option<&'a str> {
    let (_, release) = name.rsplit_once('-')?;
    if release.is_empty() || !release.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let versioned = &name[..name.len() - release.len() - 1];
    versioned
        .strip_suffix(version)
        .or_else(|| bare.and_then(|b| versioned.strip_suffix(b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str, version: &str) -> Asset {
        Asset {
            name: name.to_string(),
            version: version.to_string(),
            host: "github.com".into(),
            org: "sigstore".into(),
            repo: "cosign".into(),
            download_url: format!("https://example.com/{}", name),
            ..Default::default()
        }
    }

    fn base(filename: &str, version: &str) -> Option<String> {
        let tables = Tables::builtin().unwrap();
        base_name(tables.global_split_pattern(), filename, version)
    }

    #[test]
    fn test_base_name() {
        let cases = [
            ("cosign-linux-amd64", "v2.4.3", Some("cosign")),
            ("cosign-darwin-amd64_2.4.3_darwin_amd64.sbom.json", "v2.4.3", Some("cosign")),
            ("cosign_2.4.3_amd64.deb", "v2.4.3", Some("cosign")),
            ("cosign_v2.4.3_amd64.deb", "v2.4.3", Some("cosign")),
            ("cosign-2.4.3-1.aarch64.rpm", "v2.4.3", Some("cosign")),
            ("cosign-2.4.3-1.aarch64.rpm-keyless.pem", "v2.4.3", Some("cosign")),
            ("cosign-linux-pivkey-pkcs11key-amd64", "v2.4.3", Some("cosign")),
            ("bom-amd64-darwin.sig", "v0.6.0", Some("bom")),
            ("tool-1.0-linux-amd64", "", Some("tool-1.0")),
            ("cosign_checksums.txt", "v2.4.3", None),
            ("release-cosign.pub", "v2.4.3", None),
        ];
        for (filename, version, expected) in cases {
            assert_eq!(base(filename, version).as_deref(), expected, "{}", filename);
        }
    }

    #[test]
    fn test_base_name_starting_with_token_is_standalone() {
        assert_eq!(base("linux-amd64.tar.gz", "v1.0.0"), None);
    }

    #[test]
    fn test_version_only_base_is_kept() {
        // stripping the version would leave nothing
        assert_eq!(base("2.4.3-linux-amd64", "2.4.3").as_deref(), Some("2.4.3"));
        assert_eq!(base("v2.4.3_linux_amd64", "v2.4.3").as_deref(), Some("v2.4.3"));
    }

    #[test]
    fn test_rpm_release_needs_rpm_suffix() {
        assert_eq!(
            base("cosign-2.4.3-1.aarch64.deb", "v2.4.3").as_deref(),
            Some("cosign-2.4.3-1")
        );
    }

    #[test]
    fn test_aggregate_cosign_example() {
        // --- Setup ---
        let tables = Tables::builtin().unwrap();
        let assets = vec![
            asset("cosign-linux-amd64", "v2.4.3"),
            asset("cosign-darwin-arm64", "v2.4.3"),
            asset("cosign_2.4.3_amd64.deb", "v2.4.3"),
            asset("cosign_checksums.txt", "v2.4.3"),
        ];

        // --- Execute ---
        let items = aggregate(&tables, assets);

        // --- Verify ---
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name(), "cosign");
        assert_eq!(items[1].name(), "cosign_checksums.txt");

        let ReleaseItem::Installable(inst) = &items[0] else {
            panic!("expected an installable, got {:?}", items[0]);
        };
        let names: Vec<&str> = inst.variants.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["cosign-linux-amd64", "cosign-darwin-arm64", "cosign_2.4.3_amd64.deb"]
        );
        assert_eq!(inst.os_variants(), vec!["linux", "darwin"]);
        assert_eq!(inst.arch_variants(), vec!["x86_64", "arm64"]);
        assert!(inst.has_packages());
        assert_eq!(inst.org, "sigstore");
        assert_eq!(inst.version, "v2.4.3");

        assert!(matches!(items[1], ReleaseItem::Asset(_)));
    }

    #[test]
    fn test_aggregate_conserves_assets() {
        // --- Setup ---
        let tables = Tables::builtin().unwrap();
        let names = [
            "bom-amd64-darwin",
            "bom-amd64-darwin.pem",
            "bom-amd64-darwin.sig",
            "bom-amd64-linux",
            "bom-amd64-windows.exe",
            "bom-arm-linux",
            "bom-arm64-darwin",
            "bom-arm64-linux",
            "bom-ppc64le-linux",
            "bom-s390x-linux",
            "bom.json.spdx",
            "bom.json.spdx.sig",
            "checksums.txt",
            "checksums.txt.sig",
            "linux-amd64.tar.gz",
        ];
        let assets: Vec<Asset> = names.iter().map(|n| asset(n, "v0.6.0")).collect();

        // --- Execute ---
        let items = aggregate(&tables, assets);

        // --- Verify ---
        let mut seen: Vec<String> = items
            .iter()
            .flat_map(|item| match item {
                ReleaseItem::Asset(a) => vec![a.name.clone()],
                ReleaseItem::Installable(i) => i.variants.iter().map(|v| v.name.clone()).collect(),
            })
            .collect();
        seen.sort();
        let mut expected: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        expected.sort();
        assert_eq!(seen, expected);

        let total: usize = items.iter().map(ReleaseItem::asset_count).sum();
        assert_eq!(total, names.len());

        let sorted: Vec<&str> = items.iter().map(ReleaseItem::name).collect();
        let mut resorted = sorted.clone();
        resorted.sort();
        assert_eq!(sorted, resorted);
    }

    #[test]
    fn test_aggregate_annotates_variants() {
        let tables = Tables::builtin().unwrap();
        let items = aggregate(
            &tables,
            vec![
                asset("cosign-2.4.3-1.x86_64.rpm", "v2.4.3"),
                asset("cosign-windows-amd64.exe", "v2.4.3"),
            ],
        );
        assert_eq!(items.len(), 1);
        let ReleaseItem::Installable(inst) = &items[0] else {
            panic!("expected an installable");
        };
        let rpm = &inst.variants[0];
        assert_eq!(rpm.os.as_deref(), Some("linux"));
        assert_eq!(rpm.arch.as_deref(), Some("x86_64"));
        assert_eq!(rpm.package_type.as_deref(), Some("rpm"));
        let exe = &inst.variants[1];
        assert_eq!(exe.os.as_deref(), Some("windows"));
        assert!(exe.is_binary());
    }

    #[test]
    fn test_aggregate_empty() {
        let tables = Tables::builtin().unwrap();
        assert!(aggregate(&tables, Vec::new()).is_empty());
    }
}
