use std::io::{BufRead, Write};

use stockdesk_assistant::{Conversation, IntentResolver};
use stockdesk_client::{CatalogStore, HttpCatalogStore};
use tracing::warn;

use crate::commands::{with_session, CommandResult, EXIT_INPUT, EXIT_RUNTIME};

const COMMAND: &str = "ask";

/// One question from the command line, or an interactive chat on stdin when
/// no words are given.
pub fn run(words: Vec<String>) -> CommandResult {
    with_session(COMMAND, |config, context| async move {
        let store = HttpCatalogStore::new(context.api());
        let resolver = IntentResolver::new(config.inventory.low_stock_threshold);

        if words.is_empty() {
            let stdin = std::io::stdin();
            chat(&store, resolver, stdin.lock(), &mut std::io::stdout()).await
        } else {
            answer(&store, &resolver, &words.join(" ")).await
        }
    })
}

pub async fn answer(
    store: &dyn CatalogStore,
    resolver: &IntentResolver,
    message: &str,
) -> CommandResult {
    if message.trim().is_empty() {
        return CommandResult::failure(COMMAND, "validation", "message must not be blank", EXIT_INPUT);
    }

    match store.list_products().await {
        Ok(catalog) => CommandResult::success(COMMAND, resolver.resolve(message, &catalog)),
        Err(error) => CommandResult::from_client_error(COMMAND, &error),
    }
}

/// Reads one message per line until EOF. The catalog is reloaded for every
/// message so replies track the live stock; a failed reload gets an apology
/// line and the chat carries on.
pub async fn chat<R, W>(
    store: &dyn CatalogStore,
    resolver: IntentResolver,
    input: R,
    output: &mut W,
) -> CommandResult
where
    R: BufRead,
    W: Write,
{
    let mut conversation = Conversation::new(resolver);
    let mut answered = 0usize;

    if let Some(welcome) = conversation.last_reply() {
        if let Err(error) = writeln!(output, "bot> {welcome}") {
            return io_failure(error);
        }
    }

    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => return io_failure(error),
        };
        if line.trim().is_empty() {
            continue;
        }

        let catalog = match store.list_products().await {
            Ok(catalog) => catalog,
            Err(error) => {
                warn!(
                    event_name = "cli.chat.catalog_unavailable",
                    error_class = error.class(),
                    error = %error,
                    "catalog reload failed"
                );
                let notice = format!(
                    "bot> Sorry, the inventory is unavailable right now ({}). Please try again.",
                    error.class()
                );
                if let Err(error) = writeln!(output, "{notice}") {
                    return io_failure(error);
                }
                continue;
            }
        };
        if let Some(reply) = conversation.ask(&line, &catalog) {
            answered += 1;
            if let Err(error) = writeln!(output, "bot> {reply}") {
                return io_failure(error);
            }
        }
    }

    CommandResult::success(COMMAND, format!("chat ended after {answered} message(s)"))
}

fn io_failure(error: std::io::Error) -> CommandResult {
    CommandResult::failure(COMMAND, "io", error.to_string(), EXIT_RUNTIME)
}
