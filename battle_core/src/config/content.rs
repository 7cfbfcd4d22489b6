//! Content loading

use super::ConfigError;
use crate::content::{ContentFile, ContentLibrary};
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

/// Load a content library from a TOML file
pub fn load_content(path: &Path) -> Result<ContentLibrary, ConfigError> {
    let file: ContentFile = super::load_toml(path)?;
    build_library(file)
}

/// Load a content library from a TOML string
pub fn parse_content(content: &str) -> Result<ContentLibrary, ConfigError> {
    let file: ContentFile = super::parse_toml(content)?;
    build_library(file)
}

/// Get the embedded content library
pub fn default_content() -> ContentLibrary {
    let toml = include_str!("../../config/content.toml");
    parse_content(toml).unwrap_or_else(|err| {
        warn!(%err, "embedded content failed to load");
        ContentLibrary::default()
    })
}

fn build_library(file: ContentFile) -> Result<ContentLibrary, ConfigError> {
    check_unique("monster", file.monsters.iter().map(|m| m.id.as_str()))?;
    check_unique("skill", file.skills.iter().map(|s| s.id.as_str()))?;
    check_unique("chapter", file.chapters.iter().map(|c| c.id.as_str()))?;
    for chapter in &file.chapters {
        check_unique("node", chapter.nodes.iter().map(|n| n.id.as_str()))?;
    }
    if !(0.0..=1.0).contains(&file.drops.drop_chance) {
        return Err(ConfigError::ValidationError(
            "drop_chance must be in [0, 1]".to_string(),
        ));
    }

    let library = ContentLibrary::from_file(file);
    let missing = library.missing_skills();
    if !missing.is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "unknown skills referenced: {}",
            missing.join(", ")
        )));
    }
    Ok(library)
}

fn check_unique<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate {kind} id '{id}'"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentCatalog;

    #[test]
    fn test_parse_content() {
        let toml = r#"
[[skills]]
id = "bite"
name = "Bite"
nodes = [{ id = "hit", effect = { type = "deal_damage", scale = 1.2 } }]

[[monsters]]
id = "wolf"
name = "Wolf"
skills = ["bite"]
xp = 4
stats = { hp = 60.0, attack = 9.0 }

[[chapters]]
id = "woods"
name = "Woods"

[[chapters.nodes]]
id = "den"
name = "Den"
level = 2
waves = [{ monsters = [{ monster_id = "wolf", count = 2 }] }]
"#;

        let library = parse_content(toml).unwrap();
        assert_eq!(library.monster("wolf").unwrap().xp, 4);
        assert!(library.skill("bite").is_some());
        let node = library.chapter("woods").unwrap().node("den").unwrap();
        assert_eq!(node.waves[0].monsters[0].count, 2);
        assert!((node.encounter_factor - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let toml = r#"
[[monsters]]
id = "wolf"
name = "Wolf"
stats = { hp = 60.0, attack = 9.0 }

[[monsters]]
id = "wolf"
name = "Dire Wolf"
stats = { hp = 90.0, attack = 12.0 }
"#;
        assert!(matches!(
            parse_content(toml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_unknown_skill_rejected() {
        let toml = r#"
[[monsters]]
id = "wolf"
name = "Wolf"
skills = ["howl"]
stats = { hp = 60.0, attack = 9.0 }
"#;
        assert!(matches!(
            parse_content(toml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_default_content_loads() {
        let library = default_content();
        assert!(library.monster_count() > 0);
        assert!(library.skill_count() > 0);
        assert!(library.chapter("training").is_some());
        assert!(library.preset("adventurer").is_some());
        assert!(library.missing_skills().is_empty());
    }
}
