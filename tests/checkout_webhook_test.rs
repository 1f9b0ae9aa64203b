use httpmock::prelude::*;
use omniq_cart::adapters::MattermostSink;
use omniq_cart::config::PLACEHOLDER_WEBHOOK_URL;
use omniq_cart::domain::model::{Balances, PopupRequest, ProductId};
use omniq_cart::domain::ports::HostPlatform;
use omniq_cart::{AppConfig, CartEngine, CartError, Catalog, CheckoutDispatcher};
use std::sync::{Arc, Mutex};

struct RecordingHost {
    popups: Mutex<Vec<PopupRequest>>,
}

impl RecordingHost {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            popups: Mutex::new(Vec::new()),
        })
    }

    fn last_title(&self) -> Option<String> {
        self.popups.lock().unwrap().last().map(|p| p.title.clone())
    }
}

impl HostPlatform for RecordingHost {
    fn show_popup(&self, popup: &PopupRequest) {
        self.popups.lock().unwrap().push(popup.clone());
    }
}

fn config_with_webhook(url: &str) -> AppConfig {
    AppConfig::from_toml_str(&format!(
        r#"
[app]
frontend_balance = 10
backend_balance = 10

[webhook]
url = "{}"

[[categories]]
id = "frontend"
name = "Frontend"

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
category = "frontend"
frontend = 1
backend = 6
"#,
        url
    ))
    .unwrap()
}

fn wiring(
    config: &AppConfig,
    host: Arc<RecordingHost>,
) -> (CartEngine, CheckoutDispatcher<MattermostSink>) {
    let engine = CartEngine::new(
        Catalog::from_config(config),
        config.initial_balances(),
        host.clone(),
    )
    .with_policy(config.notifications);
    let dispatcher = CheckoutDispatcher::new(
        MattermostSink::new(config.webhook.clone()),
        config.webhook.sender_name().to_string(),
        config.webhook.icon_url().to_string(),
        host,
    );
    (engine, dispatcher)
}

#[tokio::test]
async fn checkout_posts_numbered_plan_and_resets_session() {
    let server = MockServer::start();
    let config = config_with_webhook(&server.url("/hooks/abc123"));

    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/hooks/abc123").json_body(
            serde_json::json!({
                "text": "1. Login form\n2. Search API",
                "username": "OmniQ",
                "icon_url": "https://raw.githubusercontent.com/mattermost/mattermost/master/branding/icons/icon_36x36.png"
            }),
        );
        then.status(200).body("ok");
    });

    let host = RecordingHost::new();
    let (mut engine, dispatcher) = wiring(&config, host.clone());
    engine.add_to_cart(ProductId(1)).unwrap();
    engine.add_to_cart(ProductId(2)).unwrap();
    assert_eq!(engine.balances(), Balances::new(4, 1));

    dispatcher.checkout(&mut engine).await.unwrap();

    api_mock.assert();
    assert!(engine.cart_is_empty());
    // Reset to configured initials, whatever the pre-checkout values were.
    assert_eq!(engine.balances(), Balances::new(10, 10));
    assert_eq!(host.last_title().unwrap(), "Success");
}

#[tokio::test]
async fn status_201_counts_as_accepted() {
    let server = MockServer::start();
    let config = config_with_webhook(&server.url("/hooks/abc123"));

    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/hooks/abc123");
        then.status(201);
    });

    let host = RecordingHost::new();
    let (mut engine, dispatcher) = wiring(&config, host);
    engine.add_to_cart(ProductId(1)).unwrap();

    dispatcher.checkout(&mut engine).await.unwrap();

    api_mock.assert();
    assert!(engine.cart_is_empty());
}

#[tokio::test]
async fn server_error_leaves_cart_and_balances_untouched() {
    let server = MockServer::start();
    let config = config_with_webhook(&server.url("/hooks/abc123"));

    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/hooks/abc123");
        then.status(500);
    });

    let host = RecordingHost::new();
    let (mut engine, dispatcher) = wiring(&config, host.clone());
    engine.add_to_cart(ProductId(1)).unwrap();
    let balances_before = engine.balances();

    let err = dispatcher.checkout(&mut engine).await.unwrap_err();

    api_mock.assert();
    assert!(matches!(
        err,
        CartError::DeliveryFailure { status: Some(500) }
    ));
    assert_eq!(engine.cart().len(), 1);
    assert_eq!(engine.balances(), balances_before);
    assert_eq!(host.last_title().unwrap(), "Send failed");
}

#[tokio::test]
async fn transport_error_is_a_generic_delivery_failure() {
    // Nothing listens here; reqwest fails at the transport level.
    let config = config_with_webhook("http://127.0.0.1:1/hooks/nope");

    let host = RecordingHost::new();
    let (mut engine, dispatcher) = wiring(&config, host.clone());
    engine.add_to_cart(ProductId(1)).unwrap();
    let balances_before = engine.balances();

    let err = dispatcher.checkout(&mut engine).await.unwrap_err();

    assert!(matches!(err, CartError::HttpError(_)));
    assert_eq!(engine.cart().len(), 1);
    assert_eq!(engine.balances(), balances_before);
    // Same user-facing message as a non-2xx status.
    assert_eq!(host.last_title().unwrap(), "Send failed");
}

#[tokio::test]
async fn empty_cart_never_reaches_the_webhook() {
    let server = MockServer::start();
    let config = config_with_webhook(&server.url("/hooks/abc123"));

    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/hooks/abc123");
        then.status(200);
    });

    let host = RecordingHost::new();
    let (mut engine, dispatcher) = wiring(&config, host);

    let err = dispatcher.checkout(&mut engine).await.unwrap_err();

    assert!(matches!(err, CartError::EmptyCart));
    api_mock.assert_hits(0);
}

#[tokio::test]
async fn placeholder_webhook_counts_as_unconfigured() {
    let config = config_with_webhook(PLACEHOLDER_WEBHOOK_URL);

    let host = RecordingHost::new();
    let (mut engine, dispatcher) = wiring(&config, host.clone());
    engine.add_to_cart(ProductId(1)).unwrap();

    let err = dispatcher.checkout(&mut engine).await.unwrap_err();

    assert!(matches!(err, CartError::WebhookNotConfigured));
    assert_eq!(engine.cart().len(), 1);
    assert_eq!(host.last_title().unwrap(), "Error");
}
