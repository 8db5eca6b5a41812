//! Catalog content loaded at startup.
//!
//! The catalog is a JSON document (see `crates/storefront/content/catalog.json`)
//! read once when the server starts and kept in memory for the life of the
//! process.

use std::path::{Path, PathBuf};

use alforja_core::Catalog;
use thiserror::Error;

/// Errors loading the catalog file.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    /// The file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid catalog.
    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load and parse the catalog at `path`.
///
/// Products that cannot be read (no price, no name, ...) are logged and left
/// out; the rest of the catalog still loads. Repeated product ids are logged
/// but not rejected: the cart keys lines by id, so such products would share
/// a cart line.
///
/// # Errors
///
/// Returns [`CatalogLoadError`] if the file is unreadable or is not a
/// catalog document at all.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogLoadError> {
    let json = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let (catalog, skipped) =
        Catalog::from_json_lenient(&json).map_err(|source| CatalogLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    for entry in &skipped {
        tracing::warn!(
            category = %entry.category,
            index = entry.index,
            product_id = entry.id.as_deref().unwrap_or("-"),
            error = %entry.error,
            "Skipping unreadable catalog product"
        );
    }

    for (id, count) in catalog.duplicate_ids() {
        tracing::warn!(product_id = %id, count, "Catalog reuses product id");
    }

    tracing::info!(
        categories = catalog.categories.len(),
        products = catalog.products().count(),
        skipped = skipped.len(),
        path = %path.display(),
        "Catalog loaded"
    );

    Ok(catalog)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use alforja_core::ProductId;

    fn shipped_catalog_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("content/catalog.json")
    }

    #[test]
    fn test_shipped_catalog_loads() {
        let catalog = load_catalog(&shipped_catalog_path()).unwrap();

        assert!(catalog.duplicate_ids().is_empty());
        assert_eq!(
            catalog.product(ProductId::new(1)).unwrap().name,
            "Café Colombiano Premium"
        );
        assert_eq!(catalog.by_kind("metodo").products().count(), 6);
    }

    #[test]
    fn test_missing_file() {
        let result = load_catalog(Path::new("/nonexistent/catalog.json"));
        assert!(matches!(result, Err(CatalogLoadError::Io { .. })));
    }

    fn load_from(json: &str) -> Result<Catalog, CatalogLoadError> {
        let path = std::env::temp_dir().join(format!(
            "alforja-catalog-{}.json",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&path, json).unwrap();

        let result = load_catalog(&path);
        std::fs::remove_file(&path).unwrap();
        result
    }

    #[test]
    fn test_malformed_file() {
        let result = load_from("{\"categories\": [{\"name\": 5}]}");
        assert!(matches!(result, Err(CatalogLoadError::Parse { .. })));
    }

    #[test]
    fn test_product_without_price_does_not_sink_catalog() {
        let catalog = load_from(
            r#"{"categories": [{"name": "Cafés", "products": [
                {"id": 1, "name": "A", "price": "1"},
                {"id": 2, "name": "B"}
            ]}]}"#,
        )
        .unwrap();

        assert_eq!(catalog.products().count(), 1);
        assert_eq!(catalog.product(ProductId::new(1)).unwrap().name, "A");
        assert!(catalog.product(ProductId::new(2)).is_none());
    }
}
