//! App catalog data structures
//!
//! The catalog is the closed list of apps a user can lock or unlock. It ships
//! with eight built-in entries and can be replaced by a JSON file.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// One lockable app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub package_name: String,
}

impl CatalogItem {
    pub fn new(id: &str, name: &str, icon: &str, package_name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            package_name: package_name.to_string(),
        }
    }
}

/// Ordered, immutable list of catalog items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            items: vec![
                CatalogItem::new("instagram", "Instagram", "📷", "com.instagram.android"),
                CatalogItem::new("tiktok", "TikTok", "🎵", "com.zhiliaoapp.musically"),
                CatalogItem::new("twitter", "Twitter", "🐦", "com.twitter.android"),
                CatalogItem::new("youtube", "YouTube", "▶️", "com.google.android.youtube"),
                CatalogItem::new("facebook", "Facebook", "👥", "com.facebook.katana"),
                CatalogItem::new("snapchat", "Snapchat", "👻", "com.snapchat.android"),
                CatalogItem::new("reddit", "Reddit", "🤖", "com.reddit.frontpage"),
                CatalogItem::new("netflix", "Netflix", "🎬", "com.netflix.mediaclient"),
            ],
        }
    }
}

impl Catalog {
    /// Build a catalog, rejecting empty lists and duplicate ids
    pub fn from_items(items: Vec<CatalogItem>) -> Result<Self, CatalogError> {
        if items.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::DuplicateId(item.id.clone()));
            }
        }
        Ok(Self { items })
    }

    /// Load a catalog from a JSON array of items
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let items: Vec<CatalogItem> =
            serde_json::from_str(&content).map_err(|source| CatalogError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_items(items)
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn at(&self, index: usize) -> Option<&CatalogItem> {
        self.items.get(index)
    }

    /// Display name for an id, falling back to the raw id for unknown entries
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map(|item| item.name.as_str()).unwrap_or(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn create_temp_catalog_file(content: &str) -> (tempfile::NamedTempFile, PathBuf) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        let path = file.path().to_path_buf();
        (file, path)
    }

    #[test]
    fn test_default_catalog_has_eight_unique_entries() {
        let catalog = Catalog::default();
        assert_eq!(catalog.len(), 8);
        let ids: HashSet<_> = catalog.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.len(), 8);
        assert_eq!(
            catalog.get("tiktok").map(|i| i.package_name.as_str()),
            Some("com.zhiliaoapp.musically")
        );
    }

    #[test]
    fn test_display_name_unknown_falls_back_to_id() {
        let catalog = Catalog::default();
        assert_eq!(catalog.display_name("youtube"), "YouTube");
        assert_eq!(catalog.display_name("myspace"), "myspace");
    }

    #[test]
    fn test_catalog_load_success() {
        let json = r#"[
            {"id": "chess", "name": "Chess", "icon": "♟", "packageName": "com.chess"},
            {"id": "news", "name": "News", "icon": "📰", "packageName": "com.news"}
        ]"#;
        let (_file, path) = create_temp_catalog_file(json);

        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.at(0).unwrap().id, "chess");
        assert_eq!(catalog.get("news").unwrap().package_name, "com.news");
    }

    #[test]
    fn test_catalog_load_rejects_duplicates() {
        let json = r#"[
            {"id": "chess", "name": "Chess", "icon": "♟", "packageName": "com.chess"},
            {"id": "chess", "name": "Chess 2", "icon": "♞", "packageName": "com.chess2"}
        ]"#;
        let (_file, path) = create_temp_catalog_file(json);

        let result = Catalog::load(&path);
        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id == "chess"));
    }

    #[test]
    fn test_catalog_load_rejects_empty() {
        let (_file, path) = create_temp_catalog_file("[]");
        assert!(matches!(Catalog::load(&path), Err(CatalogError::Empty)));
    }

    #[test]
    fn test_catalog_load_invalid_json() {
        let (_file, path) = create_temp_catalog_file("{ not json");
        assert!(matches!(
            Catalog::load(&path),
            Err(CatalogError::Malformed { .. })
        ));
    }

    #[test]
    fn test_catalog_load_file_not_found() {
        let path = PathBuf::from("/nonexistent/catalog.json");
        assert!(matches!(Catalog::load(&path), Err(CatalogError::Read { .. })));
    }
}
