use stockdesk_client::{CatalogStore, HttpCatalogStore};
use stockdesk_core::domain::product::{Product, ProductForm, ProductId};

use crate::commands::{with_session, CommandResult, EXIT_INPUT};

pub fn list() -> CommandResult {
    with_session("products.list", |config, context| async move {
        let store = HttpCatalogStore::new(context.api());
        execute_list(&store, config.inventory.low_stock_threshold).await
    })
}

pub fn add(form: ProductForm) -> CommandResult {
    // Parse before logging in so bad input never costs a round trip.
    if let Err(error) = form.parse() {
        return CommandResult::failure("products.add", "validation", error.to_string(), EXIT_INPUT);
    }
    with_session("products.add", |_config, context| async move {
        let store = HttpCatalogStore::new(context.api());
        execute_add(&store, &form).await
    })
}

pub fn update(id: String, form: ProductForm) -> CommandResult {
    if let Err(error) = form.parse_patch() {
        return CommandResult::failure("products.update", "validation", error.to_string(), EXIT_INPUT);
    }
    with_session("products.update", |_config, context| async move {
        let store = HttpCatalogStore::new(context.api());
        execute_update(&store, &ProductId(id), &form).await
    })
}

pub fn delete(id: String) -> CommandResult {
    with_session("products.delete", |_config, context| async move {
        let store = HttpCatalogStore::new(context.api());
        execute_delete(&store, &ProductId(id)).await
    })
}

pub async fn execute_list(store: &dyn CatalogStore, low_stock_threshold: u32) -> CommandResult {
    match store.list_products().await {
        Ok(products) => {
            CommandResult::success("products.list", render_products(&products, low_stock_threshold))
        }
        Err(error) => CommandResult::from_client_error("products.list", &error),
    }
}

pub async fn execute_add(store: &dyn CatalogStore, form: &ProductForm) -> CommandResult {
    let draft = match form.parse() {
        Ok(draft) => draft,
        Err(error) => {
            return CommandResult::failure("products.add", "validation", error.to_string(), EXIT_INPUT)
        }
    };

    match store.create_product(draft).await {
        Ok(product) => CommandResult::success(
            "products.add",
            format!("created {} ({}) with {} unit(s)", product.name, product.id, product.stock),
        ),
        Err(error) => CommandResult::from_client_error("products.add", &error),
    }
}

pub async fn execute_update(
    store: &dyn CatalogStore,
    id: &ProductId,
    form: &ProductForm,
) -> CommandResult {
    let patch = match form.parse_patch() {
        Ok(patch) => patch,
        Err(error) => {
            return CommandResult::failure(
                "products.update",
                "validation",
                error.to_string(),
                EXIT_INPUT,
            )
        }
    };

    match store.update_product(id, patch).await {
        Ok(product) => CommandResult::success(
            "products.update",
            format!("updated {} ({}); stock now {}", product.name, product.id, product.stock),
        ),
        Err(error) => CommandResult::from_client_error("products.update", &error),
    }
}

pub async fn execute_delete(store: &dyn CatalogStore, id: &ProductId) -> CommandResult {
    match store.delete_product(id).await {
        Ok(()) => CommandResult::success("products.delete", format!("deleted product {id}")),
        Err(error) => CommandResult::from_client_error("products.delete", &error),
    }
}

pub fn render_products(products: &[Product], low_stock_threshold: u32) -> String {
    if products.is_empty() {
        return "no products".to_string();
    }

    let mut lines = vec![format!("{} product(s):", products.len())];
    for product in products {
        lines.push(format!(
            "- {} | {} | {} {} | ${} | stock {} ({})",
            product.id,
            product.name,
            product.brand,
            product.model,
            product.base_price.normalize(),
            product.stock,
            product.stock_status(low_stock_threshold).label(),
        ));
    }
    lines.join("\n")
}
