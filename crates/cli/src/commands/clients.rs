use stockdesk_client::SessionContext;
use stockdesk_core::domain::user::{NewUser, User, UserId};

use crate::commands::{with_session, CommandResult, EXIT_INPUT};

pub fn list() -> CommandResult {
    with_session("clients.list", |_config, context| async move { execute_list(&context).await })
}

pub fn add(new_client: NewUser) -> CommandResult {
    with_session("clients.add", |_config, context| async move {
        execute_add(&context, &new_client).await
    })
}

pub fn delete(id: String) -> CommandResult {
    with_session("clients.delete", |_config, context| async move {
        execute_delete(&context, &UserId(id)).await
    })
}

pub async fn execute_list(context: &SessionContext) -> CommandResult {
    if let Err(error) = context.require_admin() {
        return CommandResult::from_client_error("clients.list", &error);
    }

    match context.api().list_clients().await {
        Ok(clients) => CommandResult::success("clients.list", render_clients(&clients)),
        Err(error) => CommandResult::from_client_error("clients.list", &error),
    }
}

/// Registers a client account on behalf of the signed-in admin.
pub async fn execute_add(context: &SessionContext, new_client: &NewUser) -> CommandResult {
    if let Err(error) = context.require_admin() {
        return CommandResult::from_client_error("clients.add", &error);
    }

    match context.api().register(new_client).await {
        Ok(client) => CommandResult::success(
            "clients.add",
            format!("added client {} ({}) <{}>", client.name, client.id, client.email),
        ),
        Err(error) => CommandResult::from_client_error("clients.add", &error),
    }
}

pub async fn execute_delete(context: &SessionContext, id: &UserId) -> CommandResult {
    if let Err(error) = context.require_admin() {
        return CommandResult::from_client_error("clients.delete", &error);
    }
    if context.current_user().is_some_and(|user| &user.id == id) {
        return CommandResult::failure(
            "clients.delete",
            "validation",
            "refusing to delete the signed-in account",
            EXIT_INPUT,
        );
    }

    match context.api().delete_user(id).await {
        Ok(()) => CommandResult::success("clients.delete", format!("deleted client {id}")),
        Err(error) => CommandResult::from_client_error("clients.delete", &error),
    }
}

pub fn render_clients(clients: &[User]) -> String {
    if clients.is_empty() {
        return "no clients".to_string();
    }

    let mut lines = vec![format!("{} client(s):", clients.len())];
    for client in clients {
        lines.push(format!(
            "- {} | {} | {} | {}",
            client.id,
            client.name,
            client.email,
            client.company.as_deref().unwrap_or("-"),
        ));
    }
    lines.join("\n")
}
