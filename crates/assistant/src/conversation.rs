use serde::Serialize;
use stockdesk_core::domain::product::Product;
use tracing::debug;

use crate::resolver::IntentResolver;

pub const WELCOME_MESSAGE: &str = "Hello! How can I help you with the inventory today?";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

impl ChatMessage {
    fn bot(text: impl Into<String>) -> Self {
        Self { sender: Sender::Bot, text: text.into() }
    }

    fn user(text: impl Into<String>) -> Self {
        Self { sender: Sender::User, text: text.into() }
    }
}

/// Ordered chat transcript between the operator and the assistant.
#[derive(Clone, Debug)]
pub struct Conversation {
    resolver: IntentResolver,
    messages: Vec<ChatMessage>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new(IntentResolver::default())
    }
}

impl Conversation {
    pub fn new(resolver: IntentResolver) -> Self {
        Self { resolver, messages: vec![ChatMessage::bot(WELCOME_MESSAGE)] }
    }

    /// Records `text` and the reply computed from `catalog`. Blank input is ignored.
    pub fn ask(&mut self, text: &str, catalog: &[Product]) -> Option<&str> {
        if text.trim().is_empty() {
            return None;
        }

        let (intent, reply) = self.resolver.resolve_with_intent(text, catalog);
        debug!(
            event_name = "assistant.reply",
            intent = ?intent,
            catalog_size = catalog.len(),
            "assistant resolved message"
        );

        self.messages.push(ChatMessage::user(text));
        self.messages.push(ChatMessage::bot(reply));
        self.messages.last().map(|message| message.text.as_str())
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last_reply(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|message| message.sender == Sender::Bot)
            .map(|message| message.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use stockdesk_core::domain::product::{Product, ProductId};

    use super::{Conversation, Sender, WELCOME_MESSAGE};

    fn catalog(stock: u32) -> Vec<Product> {
        vec![Product {
            id: ProductId("p-1".to_owned()),
            name: "iPhone 13".to_owned(),
            brand: "Apple".to_owned(),
            model: "13".to_owned(),
            base_price: Decimal::from(699),
            stock,
            image_url: None,
            client_id: None,
            created_at: None,
            updated_at: None,
        }]
    }

    #[test]
    fn transcript_starts_with_welcome() {
        let conversation = Conversation::default();
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].sender, Sender::Bot);
        assert_eq!(conversation.last_reply(), Some(WELCOME_MESSAGE));
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut conversation = Conversation::default();
        assert_eq!(conversation.ask("   ", &catalog(3)), None);
        assert_eq!(conversation.messages().len(), 1);
    }

    #[test]
    fn each_reply_reflects_the_snapshot_passed_with_it() {
        let mut conversation = Conversation::default();

        let first = conversation.ask("stock for iphone 13", &catalog(42)).map(str::to_owned);
        let second = conversation.ask("stock for iphone 13", &catalog(0)).map(str::to_owned);

        assert_eq!(first.as_deref(), Some("We have 42 units of iPhone 13 in stock."));
        assert_eq!(second.as_deref(), Some("Sorry, iPhone 13 is currently out of stock."));
        assert_eq!(conversation.messages().len(), 5);
        assert_eq!(conversation.messages()[3].sender, Sender::User);
    }
}
