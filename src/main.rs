use clap::Parser;
use omniq_cart::adapters::{ConsoleHost, MattermostSink};
use omniq_cart::config::CliConfig;
use omniq_cart::domain::model::{CategoryFilter, CategoryId, ProductId, StateSnapshot};
use omniq_cart::utils::{logger, validation::Validate};
use omniq_cart::{AppConfig, CartEngine, Catalog, CheckoutDispatcher};
use std::io::{BufRead, Write};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting omniq-cart CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let mut config = match AppConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Could not load configuration from {}: {}", cli.config, e);
            eprintln!("❌ Could not load configuration from {}: {}", cli.config, e);
            std::process::exit(1);
        }
    };
    if let Some(url) = cli.webhook_url {
        config.webhook.url = Some(url);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let host = Arc::new(ConsoleHost::new());
    let catalog = Catalog::from_config(&config);
    let mut engine = CartEngine::new(catalog, config.initial_balances(), host.clone())
        .with_policy(config.notifications);
    let sink = MattermostSink::new(config.webhook.clone());
    let dispatcher = CheckoutDispatcher::new(
        sink,
        config.webhook.sender_name().to_string(),
        config.webhook.icon_url().to_string(),
        host,
    );

    println!(
        "📦 {} products, {} categories loaded. Type 'help' for commands.",
        engine.snapshot().products.len(),
        engine.snapshot().categories.len()
    );
    print_products(&engine.snapshot());

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let mut parts = line.split_whitespace();
        let command = match parts.next() {
            Some(c) => c,
            None => continue,
        };
        let arg = parts.next();

        match command {
            "help" => print_help(),
            "list" | "products" => print_products(&engine.snapshot()),
            "cart" => print_cart(&engine.snapshot()),
            "balance" => {
                let b = engine.balances();
                println!("Frontend: {} | Backend: {}", b.frontend, b.backend);
            }
            "filter" => match arg {
                Some("all") => engine.filter_by_category(CategoryFilter::All),
                Some(id) => {
                    engine.filter_by_category(CategoryFilter::Only(CategoryId(id.to_string())))
                }
                None => println!("Usage: filter <category-id|all>"),
            },
            "add" => match arg.and_then(|a| a.parse::<u32>().ok()) {
                Some(id) => {
                    let _ = engine.add_to_cart(ProductId(id));
                }
                None => println!("Usage: add <product-id>"),
            },
            "remove" => match arg.and_then(|a| a.parse::<u32>().ok()) {
                Some(id) => {
                    let _ = engine.remove_from_cart(ProductId(id));
                }
                None => println!("Usage: remove <product-id>"),
            },
            "checkout" => {
                let _ = dispatcher.checkout(&mut engine).await;
            }
            "quit" | "exit" => break,
            other => println!("Unknown command '{}'. Type 'help'.", other),
        }
    }

    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  list               Show products for the current filter");
    println!("  filter <id|all>    Filter products by category");
    println!("  add <product-id>   Add a product to the cart");
    println!("  remove <id>        Remove a product from the cart");
    println!("  cart               Show cart contents and totals");
    println!("  balance            Show remaining balances");
    println!("  checkout           Send the plan to the webhook");
    println!("  quit               Exit");
}

fn print_products(snapshot: &StateSnapshot) {
    print!("{}", format_products(snapshot));
}

fn format_products(snapshot: &StateSnapshot) -> String {
    let mut out = String::new();
    for view in &snapshot.products {
        let marker = if view.in_cart {
            "✔ in cart"
        } else if view.affordable {
            ""
        } else {
            "✖ unavailable"
        };
        out.push_str(&format!(
            "  [{}] {} (frontend: {}, backend: {}) {}\n",
            view.product.id, view.product.name, view.product.frontend, view.product.backend, marker
        ));
    }
    out.push_str(&format!(
        "Balance: Frontend {} | Backend {}\n",
        snapshot.balances.frontend, snapshot.balances.backend
    ));
    out
}


fn print_cart(snapshot: &StateSnapshot) {
    if snapshot.cart.is_empty() {
        println!("Cart is empty.");
        return;
    }
    for (i, item) in snapshot.cart.iter().enumerate() {
        println!("  {}. {}", i + 1, item.product.name);
    }
    println!(
        "Used: Frontend {}, Backend {}",
        snapshot.totals.frontend, snapshot.totals.backend
    );
}
