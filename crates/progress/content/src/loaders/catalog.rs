//! Adventure catalog and briefing loader.

use std::path::Path;

use progress_core::{Adventure, AdventureId, Briefing, MissionId};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// Display metadata for one adventure.
#[derive(Clone, Debug, Deserialize)]
pub struct AdventureSpec {
    pub id: AdventureId,
    pub name: String,
    pub color: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BriefingSpec {
    pub mission: MissionId,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogFile {
    adventures: Vec<AdventureSpec>,
    briefings: Vec<BriefingSpec>,
}

/// Presentation content keyed by curriculum id.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    adventures: Vec<Adventure>,
    briefings: Vec<Briefing>,
}

impl Catalog {
    /// All eight adventures; ones missing from the file carry no display data.
    pub fn adventures(&self) -> &[Adventure] {
        &self.adventures
    }

    pub fn adventure(&self, id: AdventureId) -> Option<&Adventure> {
        self.adventures.get(id.index())
    }

    pub fn briefings(&self) -> &[Briefing] {
        &self.briefings
    }

    pub fn briefing(&self, mission: MissionId) -> Option<&Briefing> {
        self.briefings
            .iter()
            .find(|briefing| briefing.mission == mission)
    }
}

/// Loader for `catalog.toml`.
pub struct CatalogLoader;

impl CatalogLoader {
    pub fn load(path: &Path) -> LoadResult<Catalog> {
        let content = read_file(path)?;
        let file: CatalogFile = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse catalog TOML {}: {}", path.display(), e)
        })?;

        let mut adventures: Vec<Adventure> = AdventureId::all().map(Adventure::new).collect();
        for spec in file.adventures {
            let slot = &mut adventures[spec.id.index()];
            if slot.name.is_some() {
                anyhow::bail!("Duplicate catalog entry for adventure {}", spec.id.get());
            }
            *slot = Adventure::new(spec.id).with_display(spec.name, spec.color);
        }

        let mut briefings: Vec<Briefing> = Vec::with_capacity(file.briefings.len());
        for spec in file.briefings {
            if briefings.iter().any(|b| b.mission == spec.mission) {
                anyhow::bail!("Duplicate briefing for mission {}", spec.mission);
            }
            briefings.push(Briefing {
                mission: spec.mission,
                title: spec.title,
                body: spec.body,
            });
        }

        Ok(Catalog {
            adventures,
            briefings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_catalog_fills_missing_adventures() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[adventures]]
id = 2
name = "Foundations"
color = "teal"

[[briefings]]
mission = "S3M2"
title = "Variables"
body = "Name things."
"#
        )
        .unwrap();

        let catalog = CatalogLoader::load(file.path()).expect("catalog should parse");
        assert_eq!(catalog.adventures().len(), 8);

        let named = catalog.adventure(AdventureId::new(2).unwrap()).unwrap();
        assert_eq!(named.name.as_deref(), Some("Foundations"));
        assert_eq!(named.stages.len(), 5);
        assert!(catalog.adventure(AdventureId::FIRST).unwrap().name.is_none());

        let mission: MissionId = "S3M2".parse().unwrap();
        assert_eq!(catalog.briefing(mission).unwrap().title, "Variables");
    }

    #[test]
    fn test_rejects_out_of_range_ids() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[adventures]]\nid = 9\nname = \"x\"\ncolor = \"y\"").unwrap();
        assert!(CatalogLoader::load(file.path()).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[briefings]]\nmission = \"S36M1\"\ntitle = \"x\"\nbody = \"y\"").unwrap();
        assert!(CatalogLoader::load(file.path()).is_err());
    }
}
