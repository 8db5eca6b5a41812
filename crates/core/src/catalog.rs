//! Product catalog.
//!
//! The catalog is static content: categories of products, each product with
//! an optional set of option groups (roast level, grind size, ...). It is
//! loaded from JSON and never validated against a schema, so every field
//! that is not needed to put a product in the cart has a default. A product
//! lacking one of the fields that are needed is skipped by
//! [`Catalog::from_json_lenient`] rather than failing the whole catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{NewLineItem, SelectedOption};
use crate::types::{Price, ProductId};

/// Errors resolving a customer's option choice against a product.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OptionError {
    /// The product has no option group with this name.
    #[error("product {product} has no option group named {group:?}")]
    UnknownGroup {
        /// Product being configured.
        product: ProductId,
        /// Requested group name.
        group: String,
    },
    /// The group exists but does not offer this value.
    #[error("option group {group:?} has no value {value:?}")]
    UnknownValue {
        /// Option group name.
        group: String,
        /// Requested value.
        value: String,
    },
}

/// One selectable value within an option group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionChoice {
    pub value: String,
    #[serde(default)]
    pub surcharge: Price,
}

/// A named set of mutually exclusive choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionGroup {
    pub name: String,
    #[serde(default)]
    pub choices: Vec<OptionChoice>,
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Catalog price before options.
    pub price: Price,
    /// Category tag (`cafe`, `metodo`, ...).
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub option_groups: Vec<OptionGroup>,
}

impl Product {
    /// Resolve a `(group, value)` choice to a [`SelectedOption`].
    ///
    /// The surcharge always comes from the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`OptionError`] if the group or the value is not offered.
    pub fn choose(&self, group: &str, value: &str) -> Result<SelectedOption, OptionError> {
        let option_group = self
            .option_groups
            .iter()
            .find(|g| g.name == group)
            .ok_or_else(|| OptionError::UnknownGroup {
                product: self.id,
                group: group.to_string(),
            })?;

        let choice = option_group
            .choices
            .iter()
            .find(|c| c.value == value)
            .ok_or_else(|| OptionError::UnknownValue {
                group: group.to_string(),
                value: value.to_string(),
            })?;

        Ok(SelectedOption::new(
            &option_group.name,
            &choice.value,
            choice.surcharge,
        ))
    }

    /// Build the add-to-cart candidate for this product with a selection.
    ///
    /// The unit price is the catalog price plus the selection's surcharges.
    #[must_use]
    pub fn candidate(&self, selection: Vec<SelectedOption>) -> NewLineItem {
        let surcharges: Price = selection.iter().map(|option| option.surcharge).sum();
        NewLineItem {
            id: self.id,
            name: self.name.clone(),
            base_price: self.price,
            price: self.price + surcharges,
            options: selection,
            kind: self.kind.clone(),
        }
    }
}

/// A named shelf of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// A catalog entry that could not be read as a [`Product`].
#[derive(Debug)]
pub struct SkippedProduct {
    /// Name of the category holding the entry.
    pub category: String,
    /// Position of the entry within the category.
    pub index: usize,
    /// The entry's `id` field as written, if it has one.
    pub id: Option<String>,
    pub error: serde_json::Error,
}

#[derive(Deserialize)]
struct RawCatalog {
    #[serde(default)]
    categories: Vec<RawCategory>,
}

#[derive(Deserialize)]
struct RawCategory {
    name: String,
    #[serde(default)]
    products: Vec<serde_json::Value>,
}

/// The whole catalog, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Catalog {
    /// Create a catalog from categories.
    #[must_use]
    pub const fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Parse a catalog from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the document is malformed or a
    /// product is missing its id, name, or price.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse a catalog, skipping products that cannot be read.
    ///
    /// Each product is read on its own, so one entry without a price or name
    /// only loses that entry. The skipped entries are returned alongside the
    /// catalog in document order.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the document itself is malformed or
    /// a category has no name.
    pub fn from_json_lenient(json: &str) -> Result<(Self, Vec<SkippedProduct>), serde_json::Error> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        let mut skipped = Vec::new();

        let categories = raw
            .categories
            .into_iter()
            .map(|category| {
                let mut products = Vec::with_capacity(category.products.len());
                for (index, value) in category.products.into_iter().enumerate() {
                    let id = value.get("id").map(ToString::to_string);
                    match serde_json::from_value::<Product>(value) {
                        Ok(product) => products.push(product),
                        Err(error) => skipped.push(SkippedProduct {
                            category: category.name.clone(),
                            index,
                            id,
                            error,
                        }),
                    }
                }
                Category {
                    name: category.name,
                    products,
                }
            })
            .collect();

        Ok((Self { categories }, skipped))
    }

    /// All products, in category order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.categories
            .iter()
            .flat_map(|category| category.products.iter())
    }

    /// Look up a product by id. The first match wins if ids repeat.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products().find(|product| product.id == id)
    }

    /// Categories whose products' names contain `term`, case-insensitively.
    ///
    /// Categories left without products are dropped. An empty or blank term
    /// returns the whole catalog.
    #[must_use]
    pub fn search(&self, term: &str) -> Self {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.clone();
        }
        self.filter(|product| product.name.to_lowercase().contains(&needle))
    }

    /// Categories restricted to products with the given kind tag.
    #[must_use]
    pub fn by_kind(&self, kind: &str) -> Self {
        self.filter(|product| product.kind.as_deref() == Some(kind))
    }

    fn filter(&self, keep: impl Fn(&Product) -> bool) -> Self {
        let categories = self
            .categories
            .iter()
            .filter_map(|category| {
                let products: Vec<Product> = category
                    .products
                    .iter()
                    .filter(|product| keep(product))
                    .cloned()
                    .collect();
                (!products.is_empty()).then(|| Category {
                    name: category.name.clone(),
                    products,
                })
            })
            .collect();
        Self { categories }
    }

    /// Ids used by more than one product, with how often each appears.
    ///
    /// The cart keys lines by id, so a repeated id makes two products share
    /// one cart line.
    #[must_use]
    pub fn duplicate_ids(&self) -> Vec<(ProductId, usize)> {
        let mut counts: BTreeMap<ProductId, usize> = BTreeMap::new();
        for product in self.products() {
            *counts.entry(product.id).or_insert(0) += 1;
        }
        counts.into_iter().filter(|(_, n)| *n > 1).collect()
    }
}
