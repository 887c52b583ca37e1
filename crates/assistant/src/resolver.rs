use serde::Serialize;
use stockdesk_core::domain::dashboard::DEFAULT_LOW_STOCK_THRESHOLD;
use stockdesk_core::domain::product::Product;

const STOCK_KEYWORDS: [&str; 3] = ["stock", "have", "available"];
const PRICE_KEYWORDS: [&str; 3] = ["price", "cost", "how much"];
const LOW_STOCK_KEYWORDS: [&str; 2] = ["low", "out of stock"];
const GREETING_KEYWORDS: [&str; 3] = ["hello", "hi", "help"];

pub const PRICE_CLARIFICATION: &str = "Which product's price would you like to know?";
pub const HEALTHY_STOCK_REPLY: &str = "Stock levels are healthy. No items are critically low.";
pub const HELP_REPLY: &str = "Hello! I'm your Inventory Assistant. You can ask me about stock levels, prices, or low stock alerts. For example: 'Stock for iPhone 14' or 'Show low stock'.";
pub const FALLBACK_REPLY: &str =
    "I didn't quite catch that. Try asking about 'stock', 'price', or 'low stock items'.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Stock,
    Price,
    LowStock,
    Greeting,
    Fallback,
}

impl Intent {
    /// First matching category wins; the order is stock, price, low stock, greeting.
    pub fn classify(message: &str) -> Self {
        Self::classify_lowered(&message.to_lowercase())
    }

    fn classify_lowered(lowered: &str) -> Self {
        if contains_any(lowered, &STOCK_KEYWORDS) {
            Self::Stock
        } else if contains_any(lowered, &PRICE_KEYWORDS) {
            Self::Price
        } else if contains_any(lowered, &LOW_STOCK_KEYWORDS) {
            Self::LowStock
        } else if contains_any(lowered, &GREETING_KEYWORDS) {
            Self::Greeting
        } else {
            Self::Fallback
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntentResolver {
    low_stock_threshold: u32,
}

impl Default for IntentResolver {
    fn default() -> Self {
        Self { low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD }
    }
}

impl IntentResolver {
    pub fn new(low_stock_threshold: u32) -> Self {
        Self { low_stock_threshold }
    }

    pub fn low_stock_threshold(&self) -> u32 {
        self.low_stock_threshold
    }

    pub fn resolve(&self, message: &str, catalog: &[Product]) -> String {
        self.resolve_with_intent(message, catalog).1
    }

    pub fn resolve_with_intent(&self, message: &str, catalog: &[Product]) -> (Intent, String) {
        let lowered = message.to_lowercase();
        let intent = Intent::classify_lowered(&lowered);

        let reply = match intent {
            Intent::Stock => stock_reply(&lowered, catalog),
            Intent::Price => price_reply(&lowered, catalog),
            Intent::LowStock => self.low_stock_reply(catalog),
            Intent::Greeting => HELP_REPLY.to_string(),
            Intent::Fallback => FALLBACK_REPLY.to_string(),
        };

        (intent, reply)
    }

    fn low_stock_reply(&self, catalog: &[Product]) -> String {
        let running_low = catalog
            .iter()
            .filter(|product| product.stock < self.low_stock_threshold)
            .map(|product| format!("{} ({})", product.name, product.stock))
            .collect::<Vec<_>>();

        if running_low.is_empty() {
            return HEALTHY_STOCK_REPLY.to_string();
        }

        format!("The following items are running low: {}.", running_low.join(", "))
    }
}

/// Resolves a message against a catalog snapshot with the default low-stock threshold.
pub fn resolve(message: &str, catalog: &[Product]) -> String {
    IntentResolver::default().resolve(message, catalog)
}

fn stock_reply(lowered: &str, catalog: &[Product]) -> String {
    match find_mentioned_product(lowered, catalog) {
        Some(product) if product.stock > 0 => {
            format!("We have {} units of {} in stock.", product.stock, product.name)
        }
        Some(product) => format!("Sorry, {} is currently out of stock.", product.name),
        None => {
            let total_stock: u64 = catalog.iter().map(|product| u64::from(product.stock)).sum();
            format!(
                "We have a total of {total_stock} items in stock across all models. You can ask about a specific model like \"iPhone 14\"."
            )
        }
    }
}

fn price_reply(lowered: &str, catalog: &[Product]) -> String {
    match find_mentioned_product(lowered, catalog) {
        Some(product) => {
            format!("The price for {} is ${}.", product.name, product.base_price.normalize())
        }
        None => PRICE_CLARIFICATION.to_string(),
    }
}

fn find_mentioned_product<'a>(lowered: &str, catalog: &'a [Product]) -> Option<&'a Product> {
    catalog
        .iter()
        .find(|product| mentions(lowered, &product.name) || mentions(lowered, &product.model))
}

/// Whether `field`, lower-cased, occurs in the lower-cased message.
///
/// Blank fields never match. An empty name or model is a substring of every
/// message, so without this guard a product with a blank model would answer
/// every stock and price question.
fn mentions(lowered: &str, field: &str) -> bool {
    let needle = field.to_lowercase();
    !needle.trim().is_empty() && lowered.contains(&needle)
}

fn contains_any(lowered: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| lowered.contains(keyword))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use stockdesk_core::domain::product::{Product, ProductId};

    use super::{
        resolve, Intent, IntentResolver, FALLBACK_REPLY, HEALTHY_STOCK_REPLY, HELP_REPLY,
        PRICE_CLARIFICATION,
    };

    fn product(id: &str, name: &str, model: &str, price: Decimal, stock: u32) -> Product {
        Product {
            id: ProductId(id.to_owned()),
            name: name.to_owned(),
            brand: "Brand".to_owned(),
            model: model.to_owned(),
            base_price: price,
            stock,
            image_url: None,
            client_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn demo_catalog() -> Vec<Product> {
        vec![
            product("1", "iPhone 14 Pro", "14 Pro", Decimal::from(999), 24),
            product("2", "Samsung S23 Ultra", "S23 Ultra", Decimal::from(1199), 8),
            product("3", "Pixel 7", "Pixel 7", Decimal::from(599), 0),
            product("4", "OnePlus 11", "11", Decimal::from(699), 15),
            product("5", "iPhone 13", "13", Decimal::from(699), 42),
        ]
    }

    #[test]
    fn stock_query_reports_exact_units_for_named_product() {
        let reply = resolve("How much stock for iPhone 14 Pro?", &demo_catalog());
        assert_eq!(reply, "We have 24 units of iPhone 14 Pro in stock.");
    }

    #[test]
    fn stock_query_matches_on_model_case_insensitively() {
        let reply = resolve("do you HAVE any s23 ultra", &demo_catalog());
        assert_eq!(reply, "We have 8 units of Samsung S23 Ultra in stock.");
    }

    #[test]
    fn zero_stock_is_reported_as_out_of_stock() {
        let reply = resolve("Is the pixel 7 available?", &demo_catalog());
        assert_eq!(reply, "Sorry, Pixel 7 is currently out of stock.");
    }

    #[test]
    fn stock_query_without_product_reports_total() {
        let reply = resolve("what stock do we carry", &demo_catalog());
        assert_eq!(
            reply,
            "We have a total of 89 items in stock across all models. You can ask about a specific model like \"iPhone 14\"."
        );
    }

    #[test]
    fn empty_catalog_stock_query_reports_zero_total() {
        let reply = resolve("stock for iPhone 14 Pro", &[]);
        assert!(reply.starts_with("We have a total of 0 items in stock"));
    }

    #[test]
    fn first_catalog_entry_wins_on_ambiguous_mention() {
        let catalog = vec![
            product("a", "Phone", "X1", Decimal::from(10), 2),
            product("b", "Phone Max", "X1 Max", Decimal::from(20), 9),
        ];
        let reply = resolve("stock of phone max", &catalog);
        assert_eq!(reply, "We have 2 units of Phone in stock.");
    }

    #[test]
    fn price_query_states_unit_price() {
        let reply = resolve("What's the price of the Pixel 7?", &demo_catalog());
        assert_eq!(reply, "The price for Pixel 7 is $599.");
    }

    #[test]
    fn price_renders_fractional_cents_without_trailing_zeros() {
        let catalog = vec![product("1", "Widget", "W-1", Decimal::new(99950, 2), 3)];
        assert_eq!(resolve("widget cost?", &catalog), "The price for Widget is $999.5.");
    }

    #[test]
    fn price_query_without_product_asks_which_product() {
        assert_eq!(resolve("what is the price", &demo_catalog()), PRICE_CLARIFICATION);
        assert_eq!(resolve("how much is it", &[]), PRICE_CLARIFICATION);
    }

    #[test]
    fn low_query_lists_only_products_strictly_below_threshold() {
        let catalog = vec![
            product("a", "A", "MA", Decimal::ONE, 3),
            product("b", "B", "MB", Decimal::ONE, 5),
            product("c", "C", "MC", Decimal::ONE, 10),
        ];
        let reply = resolve("anything low?", &catalog);
        assert_eq!(reply, "The following items are running low: A (3).");
        assert!(!reply.contains("B (5)"));
        assert!(!reply.contains("C (10)"));
    }

    #[test]
    fn low_query_joins_items_in_catalog_order() {
        let catalog = vec![
            product("a", "Pixel 7", "P7", Decimal::ONE, 0),
            product("b", "Nokia", "N1", Decimal::ONE, 7),
            product("c", "Moto G", "G", Decimal::ONE, 4),
        ];
        assert_eq!(
            resolve("show low items", &catalog),
            "The following items are running low: Pixel 7 (0), Moto G (4)."
        );
    }

    #[test]
    fn low_query_with_healthy_catalog_reports_healthy_levels() {
        let catalog = vec![
            product("a", "A", "MA", Decimal::ONE, 5),
            product("b", "B", "MB", Decimal::ONE, 50),
        ];
        assert_eq!(resolve("low?", &catalog), HEALTHY_STOCK_REPLY);
    }

    #[test]
    fn configured_threshold_changes_low_stock_cut_off() {
        let catalog = vec![product("a", "A", "MA", Decimal::ONE, 7)];
        let resolver = IntentResolver::new(8);
        assert_eq!(resolver.low_stock_threshold(), 8);
        assert_eq!(
            resolver.resolve("low items", &catalog),
            "The following items are running low: A (7)."
        );
        assert_eq!(resolve("low items", &catalog), HEALTHY_STOCK_REPLY);
    }

    #[test]
    fn out_of_stock_phrase_is_captured_by_stock_intent_first() {
        assert_eq!(Intent::classify("what is out of stock"), Intent::Stock);
    }

    #[test]
    fn greeting_and_stock_resolve_as_stock() {
        let catalog = demo_catalog();
        assert_eq!(Intent::classify("hello, stock of iPhone 13?"), Intent::Stock);
        assert_eq!(
            resolve("hello, stock of iPhone 13?", &catalog),
            "We have 42 units of iPhone 13 in stock."
        );
    }

    #[test]
    fn greeting_returns_help_message() {
        assert_eq!(resolve("Hello there", &demo_catalog()), HELP_REPLY);
        assert_eq!(resolve("help", &[]), HELP_REPLY);
    }

    #[test]
    fn unmatched_and_empty_messages_fall_back() {
        assert_eq!(resolve("", &demo_catalog()), FALLBACK_REPLY);
        assert_eq!(resolve("", &[]), FALLBACK_REPLY);
        assert_eq!(resolve("good morning", &demo_catalog()), FALLBACK_REPLY);
        assert_eq!(Intent::classify("   "), Intent::Fallback);
    }

    #[test]
    fn blank_product_fields_never_match() {
        let catalog = vec![
            product("a", "", "", Decimal::ONE, 1),
            product("b", "Nokia", "N1", Decimal::ONE, 7),
        ];
        assert_eq!(resolve("stock of nokia", &catalog), "We have 7 units of Nokia in stock.");
    }

    #[test]
    fn resolution_is_idempotent() {
        let catalog = demo_catalog();
        for message in ["stock iphone 13", "price of 11", "low", "hi", "???"] {
            assert_eq!(resolve(message, &catalog), resolve(message, &catalog));
        }
    }

    #[test]
    fn resolve_with_intent_reports_the_branch_taken() {
        let (intent, reply) =
            IntentResolver::default().resolve_with_intent("cost of OnePlus 11", &demo_catalog());
        assert_eq!(intent, Intent::Price);
        assert_eq!(reply, "The price for OnePlus 11 is $699.");
    }
}
