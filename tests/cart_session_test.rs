use anyhow::Result;
use omniq_cart::domain::model::{Balances, CategoryFilter, CategoryId, PopupRequest, ProductId};
use omniq_cart::domain::ports::HostPlatform;
use omniq_cart::utils::validation::Validate;
use omniq_cart::{AppConfig, CartEngine, CartError, Catalog};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

struct RecordingHost {
    popups: Mutex<Vec<PopupRequest>>,
}

impl RecordingHost {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            popups: Mutex::new(Vec::new()),
        })
    }
}

impl HostPlatform for RecordingHost {
    fn show_popup(&self, popup: &PopupRequest) {
        self.popups.lock().unwrap().push(popup.clone());
    }
}

const SESSION_CONFIG: &str = r#"
[app]
frontend_balance = 10
backend_balance = 10

[webhook]
url = "https://chat.example.com/hooks/abc123"

[[categories]]
id = "frontend"
name = "Frontend"

[[categories]]
id = "backend"
name = "Backend"

[[products]]
id = 1
name = "Login form"
description = "A login form"
category = "frontend"
frontend = 5
backend = 3

[[products]]
id = 2
name = "Search API"
description = "A search endpoint"
category = "backend"
frontend = 2
backend = 5
effect = "+latency"

[[products]]
id = 3
name = "Admin dashboard"
description = "Full admin UI with reporting"
category = "frontend"
frontend = 9
backend = 9
"#;

fn session_engine() -> (CartEngine, Arc<RecordingHost>) {
    let mut config_file = NamedTempFile::new().unwrap();
    config_file.write_all(SESSION_CONFIG.as_bytes()).unwrap();

    let config = AppConfig::from_file(config_file.path()).unwrap();
    config.validate().unwrap();

    let host = RecordingHost::new();
    let engine = CartEngine::new(
        Catalog::from_config(&config),
        config.initial_balances(),
        host.clone(),
    )
    .with_policy(config.notifications);
    (engine, host)
}

#[test]
fn add_then_remove_round_trips_the_session() -> Result<()> {
    let (mut engine, host) = session_engine();

    engine.add_to_cart(ProductId(1))?;
    assert_eq!(engine.balances(), Balances::new(5, 7));
    assert_eq!(engine.cart().len(), 1);

    engine.remove_from_cart(ProductId(1))?;
    assert_eq!(engine.balances(), Balances::new(10, 10));
    assert!(engine.cart_is_empty());

    let popups = host.popups.lock().unwrap();
    assert_eq!(popups.len(), 2);
    assert_eq!(popups[0].title, "Added");
    assert_eq!(popups[0].message, "Login form added to the plan");
    assert_eq!(popups[1].title, "Removed");
    Ok(())
}

#[test]
fn running_out_of_budget_rejects_further_adds() {
    let (mut engine, host) = session_engine();

    engine.add_to_cart(ProductId(1)).unwrap(); // leaves {5, 7}
    let err = engine.add_to_cart(ProductId(3)).unwrap_err(); // needs {9, 9}

    assert!(matches!(err, CartError::InsufficientResources { .. }));
    assert_eq!(engine.balances(), Balances::new(5, 7));
    assert_eq!(engine.cart().len(), 1);
    assert_eq!(
        host.popups.lock().unwrap().last().unwrap().message,
        "Insufficient resources"
    );
}

#[test]
fn filter_is_presentation_only() -> Result<()> {
    let (mut engine, _host) = session_engine();
    engine.add_to_cart(ProductId(1))?;

    engine.filter_by_category(CategoryFilter::Only(CategoryId("backend".to_string())));

    // Filter hides product 1 from the view but changes nothing else.
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.products.len(), 1);
    assert_eq!(snapshot.products[0].product.id, ProductId(2));
    assert_eq!(engine.balances(), Balances::new(5, 7));
    assert_eq!(engine.cart().len(), 1);

    // Adding a product that the filter hides still works: affordability and
    // membership are evaluated against the full catalog.
    engine.filter_by_category(CategoryFilter::All);
    let err = engine.add_to_cart(ProductId(1)).unwrap_err();
    assert!(matches!(err, CartError::DuplicateProduct(_)));
    Ok(())
}

#[test]
fn session_invariant_survives_a_long_mixed_sequence() {
    let (mut engine, _host) = session_engine();
    let initial = engine.initial_balances();

    let ops: &[(bool, u32)] = &[
        (true, 1),
        (true, 2),
        (false, 1),
        (true, 1),
        (false, 2),
        (false, 2), // absent: no-op
        (true, 2),
        (false, 1),
    ];
    for &(add, id) in ops {
        if add {
            let _ = engine.add_to_cart(ProductId(id));
        } else {
            let _ = engine.remove_from_cart(ProductId(id));
        }

        let (frontend_reserved, backend_reserved) = engine
            .cart()
            .iter()
            .fold((0u32, 0u32), |(f, b), item| {
                (f + item.product.frontend, b + item.product.backend)
            });
        assert_eq!(engine.balances().frontend + frontend_reserved, initial.frontend);
        assert_eq!(engine.balances().backend + backend_reserved, initial.backend);
    }
}
