pub mod commands;
pub mod logging;

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use stockdesk_core::domain::product::{ProductForm, ProductId};
use stockdesk_core::domain::transaction::{NewTransaction, TransactionKind};
use stockdesk_core::domain::user::{NewUser, Role};

#[derive(Debug, Parser)]
#[command(
    name = "stockdesk",
    about = "Stockdesk inventory CLI",
    long_about = "Query and manage the product catalog, watch stock alerts, and ask the inventory assistant.",
    after_help = "Examples:\n  stockdesk ask stock for iphone 13\n  stockdesk products list\n  stockdesk alerts --watch\n  stockdesk config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Ask the inventory assistant; with no message, start an interactive chat")]
    Ask {
        #[arg(trailing_var_arg = true, help = "Message to send, e.g. `price of galaxy s22`")]
        message: Vec<String>,
    },
    #[command(subcommand, about = "List, add, update, or delete catalog products")]
    Products(ProductsCommand),
    #[command(about = "Show unread stock alerts")]
    Alerts {
        #[arg(long, help = "Keep polling and print every refresh until Ctrl-C")]
        watch: bool,
        #[arg(long, value_name = "ALERT_ID", conflicts_with = "watch", help = "Mark one alert as read")]
        mark_read: Option<String>,
    },
    #[command(subcommand, about = "Manage client accounts (admin only)")]
    Clients(ClientsCommand),
    #[command(subcommand, about = "List or record stock transactions")]
    Transactions(TransactionsCommand),
    #[command(about = "Summarize catalog totals and low-stock items")]
    Summary {
        #[arg(long, help = "Use the server-side dashboard totals instead of the local catalog")]
        server: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution and redaction")]
    Config,
}

#[derive(Debug, Subcommand)]
enum ProductsCommand {
    List,
    Add(ProductFields),
    Update {
        id: String,
        #[command(flatten)]
        fields: ProductFields,
    },
    Delete {
        id: String,
    },
}

/// Raw form fields; validation happens in [`ProductForm`].
#[derive(Debug, Args)]
struct ProductFields {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    brand: String,
    #[arg(long, default_value = "")]
    model: String,
    #[arg(long, default_value = "", help = "Unit price, e.g. 699.99")]
    price: String,
    #[arg(long, default_value = "")]
    stock: String,
    #[arg(long, default_value = "")]
    image_url: String,
    #[arg(long, default_value = "", help = "Owning client id")]
    client_id: String,
}

impl From<ProductFields> for ProductForm {
    fn from(fields: ProductFields) -> Self {
        Self {
            name: fields.name,
            brand: fields.brand,
            model: fields.model,
            base_price: fields.price,
            stock: fields.stock,
            image_url: fields.image_url,
            client_id: fields.client_id,
        }
    }
}

#[derive(Debug, Subcommand)]
enum ClientsCommand {
    List,
    #[command(about = "Register a new client account")]
    Add {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(long, help = "Initial password for the client")]
        password: String,
    },
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
enum TransactionsCommand {
    List,
    Record {
        #[arg(long)]
        product_id: String,
        #[arg(long, value_enum)]
        kind: KindArg,
        #[arg(long)]
        quantity: u32,
        #[arg(long, value_parser = commands::transactions::price_arg)]
        price: Decimal,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Sale,
    Purchase,
    Adjustment,
}

impl From<KindArg> for TransactionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Sale => Self::Sale,
            KindArg::Purchase => Self::Purchase,
            KindArg::Adjustment => Self::Adjustment,
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Ask { message } => commands::ask::run(message),
        Command::Products(ProductsCommand::List) => commands::products::list(),
        Command::Products(ProductsCommand::Add(fields)) => commands::products::add(fields.into()),
        Command::Products(ProductsCommand::Update { id, fields }) => {
            commands::products::update(id, fields.into())
        }
        Command::Products(ProductsCommand::Delete { id }) => commands::products::delete(id),
        Command::Alerts { watch, mark_read } => commands::alerts::run(watch, mark_read),
        Command::Clients(ClientsCommand::List) => commands::clients::list(),
        Command::Clients(ClientsCommand::Add { email, name, company, password }) => {
            commands::clients::add(NewUser { email, name, role: Role::Client, company, password })
        }
        Command::Clients(ClientsCommand::Delete { id }) => commands::clients::delete(id),
        Command::Transactions(TransactionsCommand::List) => commands::transactions::list(),
        Command::Transactions(TransactionsCommand::Record {
            product_id,
            kind,
            quantity,
            price,
            notes,
        }) => commands::transactions::record(NewTransaction {
            product_id: ProductId(product_id),
            kind: kind.into(),
            quantity,
            price,
            notes,
        }),
        Command::Summary { server } => commands::summary::run(server),
        Command::Config => commands::CommandResult::success("config", commands::config::run()),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
