//! `ls`-style listing of release items and releases.

use anyhow::Result;
use chrono::{DateTime, Datelike, FixedOffset, Local, Utc};
use std::io::Write;

use crate::asset::{Release, ReleaseItem};
use crate::system::labels::{OS_DARWIN, OS_LINUX, OS_WINDOWS};

/// Names per row in the short listing.
const SHORT_COLUMNS: usize = 3;
const COLUMN_GAP: &str = "  ";
/// Flag column of a release row.
const RELEASE_FLAGS: &str = "r-----";
const PRERELEASE_FLAGS: &str = "r----~";

type Row = [String; 8];

pub struct Renderer {
    long: bool,
    now: DateTime<FixedOffset>,
}

impl Renderer {
    pub fn new(long: bool) -> Self {
        Self {
            long,
            now: Local::now().fixed_offset(),
        }
    }

    /// Renders dates relative to `now` and in its offset.
    pub fn with_now(long: bool, now: DateTime<FixedOffset>) -> Self {
        Self { long, now }
    }

    pub fn render<W: Write>(&self, w: &mut W, org: &str, items: &[ReleaseItem]) -> Result<()> {
        if !self.long {
            return write_columns(w, items.iter().map(ReleaseItem::name));
        }
        let rows: Vec<Row> = items
            .iter()
            .map(|item| {
                let (month, day, time) = self.date_columns(item.updated_at());
                [
                    flags(item),
                    item.author().to_string(),
                    org.to_string(),
                    item.size().to_string(),
                    month,
                    day,
                    time,
                    item.name().to_string(),
                ]
            })
            .collect();
        write_table(w, &rows)
    }

    /// Lists releases by tag. The long form dates each release by its
    /// creation and marks prereleases with `~`.
    pub fn render_releases<W: Write>(
        &self,
        w: &mut W,
        org: &str,
        releases: &[Release],
    ) -> Result<()> {
        if !self.long {
            return write_columns(w, releases.iter().map(|r| r.version.as_str()));
        }
        let rows: Vec<Row> = releases
            .iter()
            .map(|release| {
                let (month, day, time) = self.date_columns(release.created_at);
                let flags = if release.prerelease {
                    PRERELEASE_FLAGS
                } else {
                    RELEASE_FLAGS
                };
                [
                    flags.to_string(),
                    release.author.clone(),
                    org.to_string(),
                    "-".to_string(),
                    month,
                    day,
                    time,
                    release.version.clone(),
                ]
            })
            .collect();
        write_table(w, &rows)
    }

    /// Month, day, and either `HH:MM` or the year when it differs from now.
    fn date_columns(&self, date: Option<DateTime<Utc>>) -> (String, String, String) {
        let Some(date) = date else {
            return ("-".into(), "-".into(), "-".into());
        };
        let local = date.with_timezone(&self.now.timezone());
        let time = if local.year() == self.now.year() {
            local.format("%H:%M").to_string()
        } else {
            local.year().to_string()
        };
        (local.format("%b").to_string(), local.day().to_string(), time)
    }
}

/// `i` or `f` for installable or plain file, then one position each for
/// linux, darwin, windows, packages and archives.
pub fn flags(item: &ReleaseItem) -> String {
    let (kind, oses, has_packages, has_archives) = match item {
        ReleaseItem::Installable(i) => ('i', i.os_variants(), i.has_packages(), i.has_archives()),
        ReleaseItem::Asset(a) => (
            'f',
            a.os.as_deref().into_iter().collect(),
            a.is_package(),
            a.is_archive(),
        ),
    };
    let flag = |on: bool, c: char| if on { c } else { '-' };

    [
        kind,
        flag(oses.contains(&OS_LINUX), 'l'),
        flag(oses.contains(&OS_DARWIN), 'm'),
        flag(oses.contains(&OS_WINDOWS), 'w'),
        flag(has_packages, 'p'),
        flag(has_archives, 'a'),
    ]
    .iter()
    .collect()
}

/// Writes `total N` and the rows with padded columns. The name column is
/// last and left unpadded.
fn write_table<W: Write>(w: &mut W, rows: &[Row]) -> Result<()> {
    writeln!(w, "total {}", rows.len())?;

    let mut widths = [0usize; 8];
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    for row in rows {
        let mut line = String::new();
        for (i, (cell, width)) in row.iter().zip(widths).enumerate() {
            if i > 0 {
                line.push_str(COLUMN_GAP);
            }
            match i {
                // size and day read better right aligned
                3 | 5 => line.push_str(&format!("{:>width$}", cell, width = width)),
                7 => line.push_str(cell),
                _ => line.push_str(&format!("{:<width$}", cell, width = width)),
            }
        }
        writeln!(w, "{}", line)?;
    }
    Ok(())
}

fn write_columns<'a, W: Write>(w: &mut W, names: impl Iterator<Item = &'a str>) -> Result<()> {
    let names: Vec<&str> = names.collect();
    let width = names.iter().map(|n| n.chars().count()).max().unwrap_or(0);

    for row in names.chunks(SHORT_COLUMNS) {
        let cells: Vec<String> = row
            .iter()
            .map(|n| format!("{:<width$}", n, width = width))
            .collect();
        writeln!(w, "{}", cells.join(COLUMN_GAP).trim_end())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{Asset, Installable};
    use chrono::TimeZone;

    fn now() -> DateTime<FixedOffset> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
            .unwrap()
            .fixed_offset()
    }

    fn file(name: &str, size: u64, updated: DateTime<Utc>) -> Asset {
        Asset {
            name: name.into(),
            size,
            author: "sigstore-bot".into(),
            updated_at: Some(updated),
            ..Default::default()
        }
    }

    fn items() -> Vec<ReleaseItem> {
        let updated = Utc.with_ymd_and_hms(2025, 2, 19, 13, 56, 0).unwrap();
        let mut linux = file("cosign-linux-amd64", 48504720, updated);
        linux.os = Some("linux".into());
        linux.arch = Some("x86_64".into());
        let mut deb = file("cosign_2.4.3_amd64.deb", 20000000, updated);
        deb.os = Some("linux".into());
        deb.arch = Some("x86_64".into());
        deb.package_type = Some("deb".into());
        let mut windows = file("cosign-windows-amd64.exe", 49000000, updated);
        windows.os = Some("windows".into());
        windows.arch = Some("x86_64".into());

        vec![
            ReleaseItem::Installable(Installable {
                name: "cosign".into(),
                variants: vec![linux, deb, windows],
                ..Default::default()
            }),
            ReleaseItem::Asset(file(
                "cosign_checksums.txt",
                3906,
                Utc.with_ymd_and_hms(2024, 12, 2, 8, 5, 0).unwrap(),
            )),
        ]
    }

    #[test]
    fn test_flags() {
        let items = items();
        assert_eq!(flags(&items[0]), "il-wp-");
        assert_eq!(flags(&items[1]), "f-----");

        let mut zip = file("tool-darwin-arm64.zip", 1, Utc::now());
        zip.os = Some("darwin".into());
        zip.archive_type = Some("zip".into());
        assert_eq!(flags(&ReleaseItem::Asset(zip)), "f-m--a");
    }

    #[test]
    fn test_render_long() {
        // --- Setup ---
        let renderer = Renderer::with_now(true, now());
        let mut out = Vec::new();

        // --- Execute ---
        renderer.render(&mut out, "sigstore", &items()).unwrap();

        // --- Verify ---
        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "total 2");
        assert!(lines[1].starts_with("il-wp-  sigstore-bot  sigstore"));
        assert!(lines[1].contains("Feb"));
        assert!(lines[1].contains("13:56"));
        assert!(lines[1].ends_with("cosign"));
        // last year's asset shows the year instead of the time
        assert!(lines[2].contains("Dec"));
        assert!(lines[2].contains("2024"));
        assert!(lines[2].ends_with("cosign_checksums.txt"));
        // columns line up
        assert_eq!(lines[1].find("Feb"), lines[2].find("Dec"));
    }

    #[test]
    fn test_render_long_missing_date() {
        let renderer = Renderer::with_now(true, now());
        let mut out = Vec::new();
        let items = vec![ReleaseItem::Asset(Asset {
            name: "notes.md".into(),
            ..Default::default()
        })];

        renderer.render(&mut out, "org", &items).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("-  -  -  notes.md"));
    }

    #[test]
    fn test_render_short() {
        let renderer = Renderer::with_now(false, now());
        let names = ["a", "bb", "ccc", "dddd"];
        let items: Vec<ReleaseItem> = names
            .iter()
            .map(|n| {
                ReleaseItem::Asset(Asset {
                    name: n.to_string(),
                    ..Default::default()
                })
            })
            .collect();
        let mut out = Vec::new();

        renderer.render(&mut out, "org", &items).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "a     bb    ccc\ndddd\n");
    }

    fn releases() -> Vec<Release> {
        vec![
            Release {
                version: "v2.5.0-rc.1".into(),
                author: "cpanato".into(),
                prerelease: true,
                created_at: Some(Utc.with_ymd_and_hms(2025, 2, 27, 9, 5, 0).unwrap()),
                ..Default::default()
            },
            Release {
                version: "v2.4.3".into(),
                author: "sigstore-bot".into(),
                created_at: Some(Utc.with_ymd_and_hms(2024, 12, 2, 8, 5, 0).unwrap()),
                ..Default::default()
            },
            Release {
                version: "v2.4.2".into(),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_render_releases_long() {
        // --- Setup ---
        let renderer = Renderer::with_now(true, now());
        let mut out = Vec::new();

        // --- Execute ---
        renderer
            .render_releases(&mut out, "sigstore", &releases())
            .unwrap();

        // --- Verify ---
        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "total 3");
        assert!(lines[1].starts_with("r----~  cpanato       sigstore"));
        assert!(lines[1].contains("09:05"));
        assert!(lines[1].ends_with("v2.5.0-rc.1"));
        assert!(lines[2].starts_with("r-----  sigstore-bot  sigstore"));
        assert!(lines[2].contains("2024"));
        assert!(lines[2].ends_with("v2.4.3"));
        assert_eq!(
            lines[3],
            "r-----                sigstore  -  -     -  -      v2.4.2"
        );
    }

    #[test]
    fn test_render_releases_short() {
        let renderer = Renderer::with_now(false, now());
        let mut out = Vec::new();

        renderer.render_releases(&mut out, "sigstore", &releases()).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "v2.5.0-rc.1  v2.4.3       v2.4.2\n"
        );
    }

    #[test]
    fn test_render_empty() {
        let mut out = Vec::new();
        Renderer::with_now(true, now())
            .render(&mut out, "org", &[])
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "total 0\n");

        let mut out = Vec::new();
        Renderer::with_now(false, now())
            .render(&mut out, "org", &[])
            .unwrap();
        assert!(out.is_empty());
    }
}
