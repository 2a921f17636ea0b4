//! The static menu catalog.
//!
//! Items are never created or destroyed at runtime; the only mutation is the
//! availability toggle.
use serde::{Deserialize, Serialize};

/// Display order of menu categories.
pub const CATEGORY_ORDER: [&str; 9] = [
    "Starters",
    "Main",
    "Pasta",
    "Burgers",
    "Drinks",
    "Desserts",
    "Ulam",
    "Silog Meals",
    "Extras",
];

/// Represents an orderable item in the menu catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    /// Price in whole pesos.
    pub price: u32,
    pub available: bool,
    pub category: String,
}

impl MenuItem {
    /// Creates a new, available MenuItem.
    ///
    /// # Arguments
    /// * `id` - Unique catalog identifier (e.g. `"tapsilog"`)
    /// * `name` - Display name
    /// * `price` - Price in whole pesos
    /// * `category` - One of [`CATEGORY_ORDER`]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: u32,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            available: true,
            category: category.into(),
        }
    }
}

/// Persisted availability flag of a single menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAvailability {
    pub id: String,
    pub available: bool,
}

/// The menu catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Price of an item, or `None` when the id does not resolve.
    pub fn price_of(&self, id: &str) -> Option<u32> {
        self.get(id).map(|item| item.price)
    }

    /// Items of one category, in catalog order.
    pub fn items_in<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a MenuItem> + 'a {
        self.items.iter().filter(move |item| item.category == category)
    }

    /// Categories that have at least one item, in display order.
    pub fn categories(&self) -> Vec<&'static str> {
        CATEGORY_ORDER
            .iter()
            .copied()
            .filter(|category| self.items_in(category).next().is_some())
            .collect()
    }

    /// Flips the availability of an item and returns the new flag.
    pub fn toggle_availability(&mut self, id: &str) -> Option<bool> {
        let item = self.items.iter_mut().find(|item| item.id == id)?;
        item.available = !item.available;
        Some(item.available)
    }

    pub fn availability(&self) -> Vec<ItemAvailability> {
        self.items
            .iter()
            .map(|item| ItemAvailability {
                id: item.id.clone(),
                available: item.available,
            })
            .collect()
    }

    /// Applies saved availability flags. Unknown ids are ignored.
    pub fn apply_availability(&mut self, saved: &[ItemAvailability]) {
        for entry in saved {
            if let Some(item) = self.items.iter_mut().find(|item| item.id == entry.id) {
                item.available = entry.available;
            }
        }
    }
}

impl Default for Menu {
    fn default() -> Self {
        let item = |id: &str, name: &str, price: u32, category: &str| {
            MenuItem::new(id, name, price, category)
        };
        Self::new(vec![
            item("garlic_bread", "Garlic Bread", 80, "Starters"),
            item("caesar_salad", "Caesar Salad", 150, "Starters"),
            item("chicken_soup", "Chicken Soup", 120, "Starters"),
            item("grilled_chicken_rice", "Grilled Chicken with Rice", 180, "Main"),
            item("beef_steak", "Beef Steak (Sirloin)", 250, "Main"),
            item("pork_bbq_platter", "Pork BBQ Platter", 200, "Main"),
            item("spag_bolo", "Spaghetti Bolognese", 160, "Pasta"),
            item("carbonara", "Carbonara", 170, "Pasta"),
            item("pesto_pasta", "Pesto Pasta", 180, "Pasta"),
            item("classic_beef_burger", "Classic Beef Burger", 120, "Burgers"),
            item("chicken_sandwich", "Chicken Sandwich", 110, "Burgers"),
            item("bacon_cheeseburger", "Bacon Cheeseburger", 150, "Burgers"),
            item("iced_tea", "Iced Tea", 40, "Drinks"),
            item("softdrinks", "Softdrinks", 35, "Drinks"),
            item("fresh_lemonade", "Fresh Lemonade", 60, "Drinks"),
            item("choco_cake_slice", "Chocolate Cake Slice", 90, "Desserts"),
            item("mango_float", "Mango Float", 85, "Desserts"),
            item("icecream_scoop", "Ice Cream (1 scoop)", 35, "Desserts"),
            item("adobo", "Adobo (Chicken/Pork)", 120, "Ulam"),
            item("sinigang_baboy", "Sinigang na Baboy", 140, "Ulam"),
            item("kare_kare", "Kare-Kare", 180, "Ulam"),
            item("tapsilog", "Tapsilog", 95, "Silog Meals"),
            item("longsilog", "Longsilog", 85, "Silog Meals"),
            item("tocilog", "Tocilog", 85, "Silog Meals"),
            item("plain_rice", "Plain Rice", 20, "Extras"),
            item("garlic_rice", "Garlic Rice", 25, "Extras"),
            item("egg", "Egg", 15, "Extras"),
        ])
    }
}
