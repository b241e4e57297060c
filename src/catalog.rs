//! The ordered catalog of selectable pose names.

use serde::Deserialize;

use crate::flags::ShapeConstraints;

/// One entry of the full, unfiltered catalog.
///
/// `ordinal` is the position in the full catalog and stays stable across
/// filtering; it is the lookup key clients use for icons, pose frames, etc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub name: String,
    pub ordinal: usize,
}

/// Which hand the session operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    #[default]
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Side-specific names resolved once at session start.
#[derive(Debug, Clone)]
pub struct HandProfile {
    pub side: Side,
    pub pose_library: String,
}

impl HandProfile {
    pub fn resolve(side: Side) -> Self {
        let pose_library = match side {
            Side::Left => "handshape_lib_L",
            Side::Right => "handshape_lib_R",
        };
        Self {
            side,
            pose_library: pose_library.to_string(),
        }
    }
}

/// Supplies the ordered item list and per-item constraints.
///
/// `items` is read once at session start; `constraints` on demand while
/// filtering. Both must be stable for the session lifetime.
pub trait CatalogProvider {
    fn items(&self) -> Vec<CatalogItem>;
    fn constraints(&self, name: &str) -> ShapeConstraints;
}

/// In-memory catalog backed by a name list and a constraint store.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    names: Vec<String>,
    constraints: crate::flags::ConstraintStore,
}

impl StaticCatalog {
    pub fn new(names: Vec<String>, constraints: crate::flags::ConstraintStore) -> Self {
        Self { names, constraints }
    }

    /// The fingerspelling alphabet with its default constraint tables.
    pub fn fingerspelling() -> Self {
        let mut names: Vec<String> = ('a'..='z').map(|c| c.to_string()).collect();
        names.insert(0, "OpenHand".to_string());
        names.insert(1, "ClosedHand".to_string());
        names.push("sch".to_string());
        Self::new(names, crate::flags::ConstraintStore::fingerspelling_defaults())
    }
}

impl CatalogProvider for StaticCatalog {
    fn items(&self) -> Vec<CatalogItem> {
        self.names
            .iter()
            .enumerate()
            .map(|(ordinal, name)| CatalogItem {
                name: name.clone(),
                ordinal,
            })
            .collect()
    }

    fn constraints(&self, name: &str) -> ShapeConstraints {
        self.constraints.constraints(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_follow_catalog_order() {
        let cat = StaticCatalog::new(
            vec!["a".into(), "b".into(), "c".into()],
            crate::flags::ConstraintStore::new(),
        );
        let items = cat.items();
        assert_eq!(items.len(), 3);
        assert_eq!(items[1].name, "b");
        assert_eq!(items[1].ordinal, 1);
    }

    #[test]
    fn hand_profile_resolves_per_side() {
        assert_eq!(HandProfile::resolve(Side::Left).pose_library, "handshape_lib_L");
        assert_eq!(HandProfile::resolve(Side::Right).pose_library, "handshape_lib_R");
    }

    #[test]
    fn fingerspelling_catalog_has_extras() {
        let cat = StaticCatalog::fingerspelling();
        let items = cat.items();
        assert_eq!(items[0].name, "OpenHand");
        assert_eq!(items[1].name, "ClosedHand");
        assert_eq!(items.last().unwrap().name, "sch");
    }
}
