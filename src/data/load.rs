use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::model::Dataset;
use super::sample::sample_dataset;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatasetSource {
    Sample,
    File(PathBuf),
}

impl DatasetSource {
    pub fn from_arg(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Sample, Self::File)
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Sample => "built-in sample".to_owned(),
            Self::File(path) => path.display().to_string(),
        }
    }

    pub fn load(&self) -> Result<Dataset> {
        match self {
            Self::Sample => Ok(sample_dataset()),
            Self::File(path) => load_dataset(path),
        }
    }
}

pub fn parse_dataset(raw: &str) -> Result<Dataset> {
    let dataset: Dataset = serde_json::from_str(raw).context("invalid dataset JSON")?;
    dataset
        .validate()
        .context("dataset failed consistency checks")?;
    Ok(dataset)
}

pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset file {}", path.display()))?;
    let dataset =
        parse_dataset(&raw).with_context(|| format!("failed to load {}", path.display()))?;
    log::info!(
        "loaded {} projects and {} clips from {}",
        dataset.projects.len(),
        dataset.clips.len(),
        path.display()
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::DataError;

    #[test]
    fn parses_camel_case_clip_usage() {
        let raw = r#"{
            "projects": [
                {"id": "p1", "name": "Pilot", "clips": ["c1", "c2"]},
                {"id": "p2", "name": "Sequel", "clips": ["c2"]}
            ],
            "clips": [
                {"id": "c1", "name": "Opening", "usedInProjects": ["p1"]},
                {"id": "c2", "name": "Credits", "usedInProjects": ["p1", "p2"]}
            ]
        }"#;

        let dataset = parse_dataset(raw).unwrap();
        assert_eq!(dataset.projects.len(), 2);
        assert_eq!(dataset.clips[1].used_in_projects, vec!["p1", "p2"]);
        assert_eq!(dataset.reference_count(), 3);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let dataset = parse_dataset("{}").unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_dataset("{\"projects\": [").is_err());
    }

    #[test]
    fn inconsistent_dataset_surfaces_validation_error() {
        let raw = r#"{"projects": [{"id": "p1", "name": "Pilot", "clips": ["nope"]}]}"#;
        let error = parse_dataset(raw).unwrap_err();
        let cause = error.downcast_ref::<DataError>();
        assert!(matches!(cause, Some(DataError::UnknownClip { .. })));
    }

    #[test]
    fn missing_file_reports_path() {
        let path = Path::new("/definitely/not/here/clips.json");
        let error = load_dataset(path).unwrap_err();
        assert!(format!("{error:#}").contains("clips.json"));
    }

    #[test]
    fn sample_source_loads_builtin_data() {
        let source = DatasetSource::from_arg(None);
        assert_eq!(source, DatasetSource::Sample);
        assert_eq!(source.load().unwrap().projects.len(), 5);
    }
}
