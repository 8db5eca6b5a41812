//! Catalog inspection commands.
//!
//! # Usage
//!
//! ```bash
//! # List every product, grouped by category
//! alforja-cli catalog list
//!
//! # List products whose name contains "mezcla"
//! alforja-cli catalog list --query mezcla
//!
//! # Fail if a product is unreadable or two products share an id
//! alforja-cli catalog check --path crates/storefront/content/catalog.json
//! ```

use std::path::{Path, PathBuf};

use alforja_core::{Catalog, ProductId, SkippedProduct};
use thiserror::Error;

/// Catalog file used when no `--path` is given.
pub const DEFAULT_CATALOG_PATH: &str = "crates/storefront/content/catalog.json";

/// Errors that can occur during catalog commands.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is not valid.
    #[error("Invalid catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Products the storefront would leave out of the catalog.
    #[error("Catalog has {0} unreadable product(s)")]
    UnreadableProducts(usize),

    /// Products share ids, so they would share cart lines.
    #[error("Catalog has {} duplicated product id(s)", .0.len())]
    DuplicateIds(Vec<(ProductId, usize)>),
}

/// Read and parse a catalog file the way the storefront does.
///
/// Unreadable products are logged and returned next to the catalog.
///
/// # Errors
///
/// Returns `CatalogError` if the file is unreadable or not a catalog.
pub fn read_catalog(path: &Path) -> Result<(Catalog, Vec<SkippedProduct>), CatalogError> {
    let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let (catalog, skipped) =
        Catalog::from_json_lenient(&json).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    for entry in &skipped {
        tracing::warn!(
            category = %entry.category,
            index = entry.index,
            product_id = entry.id.as_deref().unwrap_or("-"),
            error = %entry.error,
            "Unreadable product"
        );
    }
    Ok((catalog, skipped))
}

/// Render the catalog as one block per category.
#[must_use]
pub fn render(catalog: &Catalog) -> String {
    let mut out = String::new();
    for category in &catalog.categories {
        out.push_str(&category.name);
        out.push('\n');
        for product in &category.products {
            let kind = product.kind.as_deref().unwrap_or("-");
            out.push_str(&format!(
                "  {:>4}  {:<28} {:>8}  {kind}\n",
                product.id.to_string(),
                product.name,
                product.price.to_string()
            ));
        }
    }
    out
}

/// List products, optionally filtered by a name search.
///
/// # Errors
///
/// Returns `CatalogError` if the catalog cannot be loaded.
#[allow(clippy::print_stdout)]
pub fn list(path: &Path, query: Option<&str>) -> Result<(), CatalogError> {
    let (catalog, _) = read_catalog(path)?;
    let shown = query.map_or_else(|| catalog.clone(), |term| catalog.search(term));

    if shown.categories.is_empty() {
        println!("No products match.");
        return Ok(());
    }

    print!("{}", render(&shown));
    Ok(())
}

/// Check that every product is readable and no product id repeats.
///
/// # Errors
///
/// Returns `CatalogError::UnreadableProducts` if the storefront would skip
/// any product, or `CatalogError::DuplicateIds` if any id is used more than
/// once.
#[allow(clippy::print_stdout)]
pub fn check(path: &Path) -> Result<(), CatalogError> {
    let (catalog, skipped) = read_catalog(path)?;
    if !skipped.is_empty() {
        return Err(CatalogError::UnreadableProducts(skipped.len()));
    }

    let duplicates = catalog.duplicate_ids();

    for (id, count) in &duplicates {
        tracing::error!(product_id = %id, count, "Duplicated product id");
    }
    if !duplicates.is_empty() {
        return Err(CatalogError::DuplicateIds(duplicates));
    }

    println!(
        "{}: {} categories, {} products, ids unique",
        path.display(),
        catalog.categories.len(),
        catalog.products().count()
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "categories": [
            {"name": "Mezclas Premium", "products": [
                {"id": 7, "name": "Mezcla House Blend", "price": "24.99", "type": "cafe"},
                {"id": 8, "name": "Mezcla Espresso", "price": "27.99", "type": "cafe"}
            ]},
            {"name": "Métodos", "products": [
                {"id": 101, "name": "Método V60", "price": "15.99", "type": "metodo"}
            ]}
        ]
    }"#;

    #[test]
    fn test_render_lists_every_product() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let out = render(&catalog);

        assert!(out.contains("Mezclas Premium\n"));
        assert!(out.contains("Mezcla Espresso"));
        assert!(out.contains("$15.99"));
        assert_eq!(out.lines().count(), 5);
    }

    #[test]
    fn test_read_catalog_missing_file() {
        let result = read_catalog(Path::new("/nonexistent/catalog.json"));
        assert!(matches!(result, Err(CatalogError::Read { .. })));
    }

    fn write_catalog(name: &str, json: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "alforja-cli-{name}-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_check_rejects_product_without_price() {
        let path = write_catalog(
            "priceless",
            r#"{"categories": [{"name": "Cafés", "products": [
                {"id": 1, "name": "A", "price": "1"},
                {"id": 2, "name": "B"}
            ]}]}"#,
        );

        let (catalog, skipped) = read_catalog(&path).unwrap();
        let result = check(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(catalog.products().count(), 1);
        assert_eq!(skipped.len(), 1);
        assert!(matches!(result, Err(CatalogError::UnreadableProducts(1))));
    }

    #[test]
    fn test_check_accepts_valid_catalog() {
        let path = write_catalog("valid", CATALOG);
        let result = check(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(result.is_ok());
    }

    #[test]
    fn test_duplicate_ids_error_message() {
        let err = CatalogError::DuplicateIds(vec![(ProductId::new(3), 2)]);
        assert_eq!(err.to_string(), "Catalog has 1 duplicated product id(s)");
    }
}
