use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "omniq-cart")]
#[command(about = "Catalog/cart session that posts order plans to a chat webhook")]
pub struct CliConfig {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    pub config: String,

    /// Override the webhook URL from the configuration file
    #[arg(long)]
    pub webhook_url: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
