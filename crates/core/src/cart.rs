//! The cart store.
//!
//! A [`Cart`] owns an ordered list of [`LineItem`]s and is the single source
//! of truth for quantities, per-line prices, and aggregate totals. Every
//! mutation goes through one of its methods; line items are never handed out
//! mutably.
//!
//! # Invariants
//!
//! - At most one line exists per [`ProductId`]. Adding an id that is already
//!   present bumps that line's quantity instead of adding a row, even when the
//!   new candidate carries different options.
//! - A line never sits at quantity zero: decrementing to zero removes it.
//! - A line's `price` is always `base_price` plus the surcharges of its current
//!   options once [`Cart::update_options`] has run; it is never derived from a
//!   previous `price`.
//!
//! Operations on an id that is not in the cart are silent no-ops. The boolean
//! they return only reports whether anything changed.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A customization chosen for a line, e.g. roast level or grind size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option group name (e.g. "Nivel de Tostión").
    pub name: String,
    /// Chosen value within the group (e.g. "Alta").
    pub value: String,
    /// Amount added to the unit price. Absent means no surcharge.
    #[serde(default)]
    pub surcharge: Price,
}

impl SelectedOption {
    /// Create a selected option.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, surcharge: Price) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            surcharge,
        }
    }
}

/// Record a choice for an option group.
///
/// Any earlier choice for the same group is dropped and the new one is
/// appended, so a selection holds at most one value per group.
pub fn merge_selection(selection: &mut Vec<SelectedOption>, choice: SelectedOption) {
    selection.retain(|existing| existing.name != choice.name);
    selection.push(choice);
}

/// Sum of the surcharges of a set of options.
fn surcharge_total(options: &[SelectedOption]) -> Price {
    options.iter().map(|option| option.surcharge).sum()
}

/// A candidate handed to [`Cart::add_item`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLineItem {
    /// Catalog entry being added.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Catalog price before options.
    pub base_price: Price,
    /// Effective unit price for the new line.
    pub price: Price,
    /// Options chosen before adding.
    #[serde(default)]
    pub options: Vec<SelectedOption>,
    /// Category tag, informational only.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// One cart row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    pub base_price: Price,
    pub price: Price,
    pub quantity: u32,
    #[serde(default)]
    pub options: Vec<SelectedOption>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl LineItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price * self.quantity
    }

    /// `"name: value"` pairs joined by `", "`, or `None` when no options are set.
    #[must_use]
    pub fn options_label(&self) -> Option<String> {
        if self.options.is_empty() {
            return None;
        }
        let parts: Vec<String> = self
            .options
            .iter()
            .map(|option| format!("{}: {}", option.name, option.value))
            .collect();
        Some(parts.join(", "))
    }
}

impl From<NewLineItem> for LineItem {
    fn from(candidate: NewLineItem) -> Self {
        Self {
            id: candidate.id,
            name: candidate.name,
            base_price: candidate.base_price,
            price: candidate.price,
            quantity: 1,
            options: candidate.options,
            kind: candidate.kind,
        }
    }
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The line for a catalog id, if present.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn get_mut(&mut self, id: ProductId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Returns `true` when the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a catalog entry.
    ///
    /// If a line with the same id exists its quantity goes up by one and its
    /// price and options are left untouched. Otherwise the candidate is
    /// appended at quantity one. Returns the line's resulting quantity.
    pub fn add_item(&mut self, candidate: NewLineItem) -> u32 {
        if let Some(existing) = self.get_mut(candidate.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            return existing.quantity;
        }
        self.items.push(LineItem::from(candidate));
        1
    }

    /// Increment a line's quantity by one.
    pub fn increase_quantity(&mut self, id: ProductId) -> bool {
        let Some(item) = self.get_mut(id) else {
            return false;
        };
        item.quantity = item.quantity.saturating_add(1);
        true
    }

    /// Decrement a line's quantity by one, removing the line when it reaches zero.
    pub fn decrease_quantity(&mut self, id: ProductId) -> bool {
        let Some(item) = self.get_mut(id) else {
            return false;
        };
        item.quantity = item.quantity.saturating_sub(1);
        self.items.retain(|item| item.quantity > 0);
        true
    }

    /// Remove a line regardless of its quantity.
    pub fn remove_item(&mut self, id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Replace a line's options and recompute its price from `base_price`.
    pub fn update_options(&mut self, id: ProductId, options: Vec<SelectedOption>) -> bool {
        let Some(item) = self.get_mut(id) else {
            return false;
        };
        item.price = item.base_price + surcharge_total(&options);
        item.options = options;
        true
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |count, item| count.saturating_add(item.quantity))
    }

    /// Sum of `price * quantity` across all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn unique_line_count(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn price(units: i64) -> Price {
        Price::new(Decimal::from(units))
    }

    fn candidate(id: i32, base: i64) -> NewLineItem {
        NewLineItem {
            id: ProductId::new(id),
            name: format!("Producto {id}"),
            base_price: price(base),
            price: price(base),
            options: Vec::new(),
            kind: Some("cafe".to_string()),
        }
    }

    fn roast(value: &str, surcharge: i64) -> SelectedOption {
        SelectedOption::new("roast", value, price(surcharge))
    }

    #[test]
    fn test_add_same_id_twice_merges_into_one_line() {
        let mut cart = Cart::new();
        cart.add_item(candidate(1, 10));
        cart.add_item(candidate(1, 10));

        assert_eq!(cart.unique_line_count(), 1);
        let line = cart.get(ProductId::new(1)).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.price, price(10));
        assert_eq!(cart.total_price(), price(20));
    }

    #[test]
    fn test_add_many_times_quantity_equals_call_count() {
        let mut cart = Cart::new();
        for expected in 1..=25 {
            let quantity = cart.add_item(candidate(3, 7));
            assert_eq!(quantity, expected);
        }
        assert_eq!(cart.unique_line_count(), 1);
        assert_eq!(cart.total_item_count(), 25);
    }

    #[test]
    fn test_add_existing_id_keeps_first_line_options() {
        let mut cart = Cart::new();
        let mut first = candidate(1, 10);
        first.options = vec![roast("Clara", 0)];
        cart.add_item(first);

        let mut second = candidate(1, 10);
        second.options = vec![roast("Alta", 2)];
        second.price = price(12);
        cart.add_item(second);

        let line = cart.get(ProductId::new(1)).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.options, vec![roast("Clara", 0)]);
        assert_eq!(line.price, price(10));
    }

    #[test]
    fn test_new_line_takes_price_and_base_price_from_candidate() {
        let mut cart = Cart::new();
        let mut item = candidate(4, 30);
        item.price = price(33);
        cart.add_item(item);

        let line = cart.get(ProductId::new(4)).unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.base_price, price(30));
        assert_eq!(line.price, price(33));
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = Cart::new();
        cart.add_item(candidate(5, 1));
        cart.add_item(candidate(2, 1));
        cart.add_item(candidate(9, 1));
        cart.add_item(candidate(2, 1));

        let ids: Vec<i32> = cart.items().iter().map(|item| item.id.as_i32()).collect();
        assert_eq!(ids, vec![5, 2, 9]);
    }

    #[test]
    fn test_decrease_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_item(candidate(1, 10));

        assert!(cart.decrease_quantity(ProductId::new(1)));
        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), Price::ZERO);

        // Further decreases are no-ops; the line stays absent.
        assert!(!cart.decrease_quantity(ProductId::new(1)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_decrease_keeps_line_above_zero() {
        let mut cart = Cart::new();
        cart.add_item(candidate(1, 10));
        cart.increase_quantity(ProductId::new(1));
        cart.decrease_quantity(ProductId::new(1));

        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity, 1);
    }

    #[test]
    fn test_operations_on_absent_id_are_silent_noops() {
        let mut cart = Cart::new();
        cart.add_item(candidate(1, 10));
        let before = cart.clone();

        let missing = ProductId::new(99);
        assert!(!cart.increase_quantity(missing));
        assert!(!cart.decrease_quantity(missing));
        assert!(!cart.remove_item(missing));
        assert!(!cart.update_options(missing, vec![roast("Alta", 2)]));

        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_item_ignores_quantity() {
        let mut cart = Cart::new();
        cart.add_item(candidate(1, 10));
        cart.add_item(candidate(1, 10));
        cart.add_item(candidate(2, 5));

        assert!(cart.remove_item(ProductId::new(1)));
        assert_eq!(cart.unique_line_count(), 1);
        assert!(cart.get(ProductId::new(1)).is_none());
    }

    #[test]
    fn test_update_options_adds_surcharge_to_base_price() {
        let mut cart = Cart::new();
        cart.add_item(candidate(2, 20));
        cart.update_options(ProductId::new(2), vec![roast("Alta", 2)]);

        assert_eq!(cart.get(ProductId::new(2)).unwrap().price, price(22));
    }

    #[test]
    fn test_update_options_always_derives_from_base_price() {
        let mut cart = Cart::new();
        cart.add_item(candidate(2, 20));

        cart.update_options(ProductId::new(2), vec![roast("Alta", 2)]);
        cart.update_options(
            ProductId::new(2),
            vec![roast("Media", 1), SelectedOption::new("grind", "Fina", price(3))],
        );
        assert_eq!(cart.get(ProductId::new(2)).unwrap().price, price(24));

        cart.update_options(ProductId::new(2), Vec::new());
        let line = cart.get(ProductId::new(2)).unwrap();
        assert_eq!(line.price, price(20));
        assert!(line.options.is_empty());
    }

    #[test]
    fn test_totals_follow_every_mutation() {
        let mut cart = Cart::new();
        cart.add_item(candidate(1, 10));
        cart.add_item(candidate(2, 20));
        assert_eq!(cart.total_price(), price(30));

        cart.increase_quantity(ProductId::new(2));
        assert_eq!(cart.total_price(), price(50));
        assert_eq!(cart.total_item_count(), 3);

        cart.update_options(ProductId::new(2), vec![roast("Alta", 2)]);
        assert_eq!(cart.total_price(), price(54));

        cart.remove_item(ProductId::new(1));
        assert_eq!(cart.total_price(), price(44));
        assert_eq!(cart.unique_line_count(), 1);

        let recomputed: Price = cart.items().iter().map(|i| i.price * i.quantity).sum();
        assert_eq!(cart.total_price(), recomputed);
    }

    #[test]
    fn test_merge_selection_replaces_same_group() {
        let mut selection = vec![roast("Clara", 0)];
        merge_selection(&mut selection, SelectedOption::new("grind", "Fina", price(0)));
        merge_selection(&mut selection, roast("Alta", 2));

        assert_eq!(selection.len(), 2);
        assert_eq!(selection[0].name, "grind");
        assert_eq!(selection[1], roast("Alta", 2));
    }

    #[test]
    fn test_options_label() {
        let mut cart = Cart::new();
        cart.add_item(candidate(1, 10));
        assert_eq!(cart.get(ProductId::new(1)).unwrap().options_label(), None);

        cart.update_options(
            ProductId::new(1),
            vec![roast("Alta", 0), SelectedOption::new("grind", "Fina", Price::ZERO)],
        );
        assert_eq!(
            cart.get(ProductId::new(1)).unwrap().options_label().as_deref(),
            Some("roast: Alta, grind: Fina")
        );
    }

    #[test]
    fn test_option_without_surcharge_deserializes_as_zero() {
        let option: SelectedOption =
            serde_json::from_str(r#"{"name":"grind","value":"Media"}"#).unwrap();
        assert_eq!(option.surcharge, Price::ZERO);
    }
}
