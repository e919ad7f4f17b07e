//! Content pools that feed case generation

use std::fs;
use std::path::Path;

use tracing::info;

use crate::core::error::{DeskError, Result};
use crate::core::types::{Region, UniversityTier};

const BUILTIN_CONTENT: &str = include_str!("../../data/content.toml");

#[derive(Debug, Clone, PartialEq)]
pub struct UniversityProfile {
    pub abbreviation: String,
    pub name: String,
    pub tier: UniversityTier,
    pub location: Region,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionProfile {
    pub region: Region,
    pub display_name: String,
    /// -10 strongly favored .. 10 strongly discriminated
    pub discrimination_level: i32,
    pub perception: String,
}

/// Everything the generator draws from
#[derive(Debug, Clone, Default)]
pub struct ContentPools {
    pub universities: Vec<UniversityProfile>,
    pub regions: Vec<RegionProfile>,
    pub surnames: Vec<String>,
    pub male_names: Vec<String>,
    pub female_names: Vec<String>,
    pub majors: Vec<String>,
    pub companies: Vec<String>,
    pub positions: Vec<String>,
    pub recommendation_text: String,
    pub certification_name: String,
}

impl ContentPools {
    /// Pools shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CONTENT)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let toml: toml::Value = content.parse()?;

        let mut pools = ContentPools {
            recommendation_text: toml
                .get("recommendation_text")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            certification_name: toml
                .get("certification_name")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            ..Default::default()
        };

        if let Some(list) = toml.get("universities").and_then(|v| v.as_array()) {
            for entry in list {
                pools.universities.push(parse_university(entry)?);
            }
        }

        if let Some(list) = toml.get("regions").and_then(|v| v.as_array()) {
            for entry in list {
                pools.regions.push(parse_region(entry)?);
            }
        }

        if let Some(names) = toml.get("names") {
            pools.surnames = string_list(names, "surnames");
            pools.male_names = string_list(names, "male");
            pools.female_names = string_list(names, "female");
        }

        if let Some(career) = toml.get("career") {
            pools.majors = string_list(career, "majors");
            pools.companies = string_list(career, "companies");
            pools.positions = string_list(career, "positions");
        }

        info!(
            universities = pools.universities.len(),
            regions = pools.regions.len(),
            majors = pools.majors.len(),
            "Loaded content pools"
        );
        Ok(pools)
    }

    pub fn region_profile(&self, region: Region) -> Option<&RegionProfile> {
        self.regions.iter().find(|r| r.region == region)
    }

    pub fn university_by_abbreviation(&self, abbreviation: &str) -> Option<&UniversityProfile> {
        self.universities
            .iter()
            .find(|u| u.abbreviation == abbreviation)
    }
}

fn string_list(table: &toml::Value, key: &str) -> Vec<String> {
    table
        .get(key)
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_university(value: &toml::Value) -> Result<UniversityProfile> {
    let abbreviation = value
        .get("abbreviation")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DeskError::ContentData("university missing abbreviation".into()))?
        .to_string();

    let name = value
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DeskError::ContentData(format!("{}: university missing name", abbreviation)))?
        .to_string();

    let tier: UniversityTier = value
        .get("tier")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DeskError::ContentData(format!("{}: university missing tier", abbreviation)))?
        .parse()?;

    let location: Region = value
        .get("location")
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            DeskError::ContentData(format!("{}: university missing location", abbreviation))
        })?
        .parse()?;

    let description = value
        .get("description")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    Ok(UniversityProfile {
        abbreviation,
        name,
        tier,
        location,
        description,
    })
}

fn parse_region(value: &toml::Value) -> Result<RegionProfile> {
    let region: Region = value
        .get("region")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DeskError::ContentData("region entry missing region".into()))?
        .parse()?;

    let display_name = value
        .get("display_name")
        .and_then(|v| v.as_str())
        .unwrap_or(region.as_str())
        .to_string();

    let discrimination_level = value
        .get("discrimination_level")
        .and_then(|v| v.as_integer())
        .unwrap_or(0) as i32;

    let perception = value
        .get("perception")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    Ok(RegionProfile {
        region,
        display_name,
        discrimination_level,
        perception,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_pools_complete() {
        let pools = ContentPools::builtin().unwrap();
        assert_eq!(pools.universities.len(), 4);
        assert_eq!(pools.regions.len(), 4);
        assert_eq!(pools.surnames.len(), 16);
        assert_eq!(pools.majors.len(), 12);
        assert!(!pools.recommendation_text.is_empty());
    }

    #[test]
    fn test_region_discrimination_levels() {
        let pools = ContentPools::builtin().unwrap();
        assert_eq!(pools.region_profile(Region::Corvus).unwrap().discrimination_level, 8);
        assert_eq!(pools.region_profile(Region::Eridanus).unwrap().discrimination_level, -5);
    }

    #[test]
    fn test_university_lookup() {
        let pools = ContentPools::builtin().unwrap();
        let occ = pools.university_by_abbreviation("OCC").unwrap();
        assert_eq!(occ.tier, UniversityTier::Mid);
        assert_eq!(occ.location, Region::Eridanus);
    }

    #[test]
    fn test_unknown_tier_rejected() {
        let content = r#"
            [[universities]]
            abbreviation = "XU"
            name = "Nowhere"
            tier = "Elite"
            location = "Libra"
        "#;
        assert!(matches!(
            ContentPools::from_toml_str(content),
            Err(DeskError::UnknownValue(_))
        ));
    }

    #[test]
    fn test_empty_document_gives_empty_pools() {
        let pools = ContentPools::from_toml_str("").unwrap();
        assert!(pools.universities.is_empty());
        assert!(pools.majors.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/content.toml");
        let pools = ContentPools::load(&path).unwrap();
        assert_eq!(pools.universities.len(), 4);
        assert!(pools.university_by_abbreviation("VNU").is_some());
    }
}
