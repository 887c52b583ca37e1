use stockdesk_client::{ApiClient, CatalogStore, HttpCatalogStore};
use stockdesk_core::domain::dashboard::{CatalogSummary, DashboardStats};

use crate::commands::{with_session, CommandResult, EXIT_API};

/// Local totals from the catalog, or the server-side dashboard with `--server`.
pub fn run(server: bool) -> CommandResult {
    with_session("summary", |config, context| async move {
        if server {
            return execute_server(&context.api()).await;
        }
        let store = HttpCatalogStore::new(context.api());
        execute_local(&store, config.inventory.low_stock_threshold).await
    })
}

pub async fn execute_local(store: &dyn CatalogStore, low_stock_threshold: u32) -> CommandResult {
    match store.list_products().await {
        Ok(products) => match CatalogSummary::from_products(&products, low_stock_threshold) {
            Ok(summary) => CommandResult::success("summary", render_summary(&summary)),
            Err(error) => {
                CommandResult::failure("summary", "invalid_catalog", error.to_string(), EXIT_API)
            }
        },
        Err(error) => CommandResult::from_client_error("summary", &error),
    }
}

pub async fn execute_server(api: &ApiClient) -> CommandResult {
    match api.dashboard_stats().await {
        Ok(stats) => CommandResult::success("summary", render_stats(&stats)),
        Err(error) => CommandResult::from_client_error("summary", &error),
    }
}

pub fn render_summary(summary: &CatalogSummary) -> String {
    let mut lines = vec![
        format!("total products: {}", summary.total_products),
        format!("total stock: {}", summary.total_stock),
        format!("inventory value: ${:.2}", summary.total_value),
        format!(
            "low stock (< {}): {}",
            summary.low_stock_threshold,
            summary.low_stock_count()
        ),
    ];
    lines.extend(summary.low_stock.iter().map(|item| {
        format!("  - {}: {} unit(s) ({})", item.name, item.stock, item.status.label())
    }));
    lines.join("\n")
}

pub fn render_stats(stats: &DashboardStats) -> String {
    [
        format!("total products: {}", stats.total_products),
        format!("total stock: {}", stats.total_stock),
        format!("inventory value: ${:.2}", stats.total_value),
        format!("low stock: {}", stats.low_stock_count),
        format!("recent transactions: {}", stats.recent_transactions.len()),
        format!("unread alerts: {}", stats.alerts.len()),
    ]
    .join("\n")
}
