use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "devis")]
#[command(about = "Price, version and confirm HVAC quotes")]
pub struct Cli {
    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Price a list of quote actions offline, without the API
    Price {
        /// JSON file holding an array of quote actions
        actions: PathBuf,
    },
    /// Create a quote, apply actions, and save it
    Create(CreateArgs),
    /// Show a saved quote (canonical or display ID)
    Show { id: String },
    /// Apply actions to a saved quote and save them as a new version
    Revise {
        id: String,
        /// JSON file holding an array of quote actions
        #[arg(long)]
        actions: PathBuf,
    },
    /// Confirm a saved quote with an external reference number
    Confirm {
        id: String,
        #[arg(long)]
        reference: String,
    },
    /// Delete a saved quote
    Delete { id: String },
    /// Show the exchange rate the next quote would use
    Rate {
        #[arg(long, default_value = "EUR")]
        from: String,
        #[arg(long, default_value = "TND")]
        to: String,
    },
    /// Manage clients, sites and splits
    #[command(subcommand)]
    Client(ClientCommand),
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub client: String,
    #[arg(long)]
    pub site: String,
    #[arg(long, default_value = "")]
    pub object: String,
    /// Seed both margin rates from this client's record
    #[arg(long)]
    pub client_id: Option<String>,
    /// Margin rate for supplies, overrides the client's
    #[arg(long)]
    pub supply_margin: Option<Decimal>,
    /// Margin rate for labor, overrides the client's
    #[arg(long)]
    pub labor_margin: Option<Decimal>,
    /// Follow-up reminder date (YYYY-MM-DD)
    #[arg(long)]
    pub reminder: Option<chrono::NaiveDate>,
    /// JSON file holding an array of quote actions
    #[arg(long)]
    pub actions: Option<PathBuf>,
    /// Keep the quote as a draft instead of saving it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum ClientCommand {
    /// List clients
    List,
    /// Create a client with the next sequential ID
    New {
        #[arg(long)]
        name: String,
        #[arg(long)]
        margin: Decimal,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// List or create the sites of a client
    Sites {
        client_id: String,
        /// Create a site with this name
        #[arg(long)]
        add: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// List or create the splits of a site
    Splits {
        site_id: String,
        /// Create a split with this name
        #[arg(long)]
        add: Option<String>,
    },
}
