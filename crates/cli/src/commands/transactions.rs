use stockdesk_client::ApiClient;
use stockdesk_core::domain::product::parse_price;
use stockdesk_core::domain::transaction::{NewTransaction, Transaction, TransactionKind};

use crate::commands::{with_session, CommandResult, EXIT_INPUT};

pub fn list() -> CommandResult {
    with_session("transactions.list", |_config, context| async move {
        execute_list(&context.api()).await
    })
}

pub fn record(transaction: NewTransaction) -> CommandResult {
    if let Err(error) = transaction.validate() {
        return CommandResult::failure(
            "transactions.record",
            "validation",
            error.to_string(),
            EXIT_INPUT,
        );
    }
    with_session("transactions.record", |_config, context| async move {
        execute_record(&context.api(), &transaction).await
    })
}

/// Accepts the same price syntax as the product form.
pub fn price_arg(raw: &str) -> Result<rust_decimal::Decimal, String> {
    parse_price(raw).map_err(|error| error.to_string())
}

pub async fn execute_list(api: &ApiClient) -> CommandResult {
    match api.list_transactions().await {
        Ok(transactions) => {
            CommandResult::success("transactions.list", render_transactions(&transactions))
        }
        Err(error) => CommandResult::from_client_error("transactions.list", &error),
    }
}

pub async fn execute_record(api: &ApiClient, transaction: &NewTransaction) -> CommandResult {
    match api.create_transaction(transaction).await {
        Ok(created) => CommandResult::success(
            "transactions.record",
            format!(
                "recorded {} of {} unit(s) for product {}",
                kind_label(created.kind),
                created.quantity,
                created.product_id
            ),
        ),
        Err(error) => CommandResult::from_client_error("transactions.record", &error),
    }
}

fn kind_label(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Sale => "sale",
        TransactionKind::Purchase => "purchase",
        TransactionKind::Adjustment => "adjustment",
    }
}

pub fn render_transactions(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "no transactions".to_string();
    }

    let mut lines = vec![format!("{} transaction(s):", transactions.len())];
    for transaction in transactions {
        let delta = transaction.kind.stock_delta(transaction.quantity);
        lines.push(format!(
            "- {} | {} | product {} | {:+} | ${} | {}",
            transaction.created_at.format("%Y-%m-%d %H:%M"),
            kind_label(transaction.kind),
            transaction.product_id,
            delta,
            transaction.price.normalize(),
            transaction.notes.as_deref().unwrap_or("-"),
        ));
    }
    lines.join("\n")
}
