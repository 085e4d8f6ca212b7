//! Challenge catalog: the clips a player can try to imitate.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

/// File name of the catalog inside the assets directory.
pub const CATALOG_FILE: &str = "challenges.json";

/// One reference clip with the text shown alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub lyrics: String,
    /// URL or path of the reference clip.
    #[serde(alias = "mp3")]
    pub reference: String,
    /// Recording cut-off, in milliseconds.
    #[serde(default, alias = "timeLimit")]
    pub time_limit_ms: Option<u64>,
}

impl Challenge {
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    challenges: Vec<Challenge>,
}

impl Catalog {
    pub fn new(challenges: Vec<Challenge>) -> Result<Self> {
        let catalog = Self { challenges };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load_from_assets(assets_root: &Path) -> Result<Self> {
        let path = assets_root.join(CATALOG_FILE);
        let reader = File::open(&path)
            .with_context(|| format!("failed to open challenge catalog at {:?}", path))?;
        let catalog: Catalog = serde_json::from_reader(reader)
            .with_context(|| format!("failed to parse challenge catalog at {:?}", path))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let catalog: Catalog =
            serde_json::from_str(raw).context("failed to parse challenge catalog JSON")?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (idx, challenge) in self.challenges.iter().enumerate() {
            ensure!(
                !challenge.id.trim().is_empty(),
                "challenge {} has an empty id",
                idx
            );
            ensure!(
                seen.insert(challenge.id.as_str()),
                "duplicate challenge id '{}'",
                challenge.id
            );
            ensure!(
                !challenge.reference.trim().is_empty(),
                "challenge '{}' has no reference clip",
                challenge.id
            );
            ensure!(
                challenge.time_limit_ms != Some(0),
                "challenge '{}' time limit must be positive",
                challenge.id
            );
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.id == id)
    }

    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, Challenge};
    use std::time::Duration;

    const SAMPLE: &str = r#"{
        "challenges": [
            {"id": "1", "label": "Warm-up", "lyrics": "la la", "mp3": "https://cdn.test/a.mp3"},
            {"id": "2", "label": "Hard", "reference": "clips/b.wav", "time_limit_ms": 4000}
        ]
    }"#;

    #[test]
    fn parses_and_looks_up_by_id() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 2);
        let first = catalog.get("1").unwrap();
        assert_eq!(first.reference, "https://cdn.test/a.mp3");
        assert_eq!(first.time_limit(), None);
        let second = catalog.get("2").unwrap();
        assert_eq!(second.time_limit(), Some(Duration::from_secs(4)));
        assert!(second.lyrics.is_empty());
        assert!(catalog.get("3").is_none());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let raw = r#"{"challenges": [
            {"id": "1", "label": "a", "reference": "a.wav"},
            {"id": "1", "label": "b", "reference": "b.wav"}
        ]}"#;
        let err = Catalog::from_json(raw).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn new_validates_programmatic_catalogs() {
        let challenge = |id: &str, limit| Challenge {
            id: id.to_string(),
            label: format!("Challenge {id}"),
            image: None,
            lyrics: String::new(),
            reference: format!("clips/{id}.wav"),
            time_limit_ms: limit,
        };
        let catalog =
            Catalog::new(vec![challenge("a", None), challenge("b", Some(1500))]).unwrap();
        assert_eq!(
            catalog.challenges()[1].time_limit(),
            Some(Duration::from_millis(1500))
        );
        assert!(Catalog::new(vec![challenge("a", Some(0))]).is_err());
        assert!(Catalog::new(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn rejects_missing_reference() {
        let raw = r#"{"challenges": [{"id": "1", "label": "a", "reference": " "}]}"#;
        assert!(Catalog::from_json(raw).is_err());
    }
}
