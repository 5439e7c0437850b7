//! Campaign companion demo.
//!
//! Drives the request engine end-to-end against the scripted backend:
//! a failed and a successful login through the session middleware, a
//! flaky rockets query showing the retrying lifecycle and its
//! auto-generated alerts, and a logout.

use campaign::backend;
use campaign::support::{CampaignStore, ConsoleAlerts, InMemoryStorage};
use campaign::types::Rocket;
use lorekeeper_client::request::{Params, RequestConfig, RequestMetadata};
use lorekeeper_client::resources::{ResourceConfig, ResourceQueryBuilder};
use lorekeeper_client::session::{
    ClearSessionMiddlewareBuilder, SessionDispatcher, SessionMiddlewareBuilder,
};
use lorekeeper_client::env::RequestEnv;
use serde_json::json;
use std::sync::Arc;

fn credentials(username: &str, password: &str) -> Params {
    let mut params = Params::new();
    params.insert("username".to_string(), json!(username));
    params.insert("password".to_string(), json!(password));
    params
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== Campaign Companion ===\n");

    let store = Arc::new(CampaignStore::new());
    let dispatcher: Arc<dyn SessionDispatcher> = store.clone();
    let env = RequestEnv::new(
        Arc::new(ConsoleAlerts),
        dispatcher,
        Arc::new(InMemoryStorage::new()),
    );

    // Login through the session middleware.
    let login = RequestConfig::new()
        .with_middleware(SessionMiddlewareBuilder::new())
        .with_metadata(RequestMetadata::mutation("session:create"))
        .build(backend::login_operation(), &env);

    println!("Logging in with the wrong password...");
    let response = login.call(credentials("Tron", "wrong")).await;
    println!("  -> {}\n", response.status());

    println!("Logging in with the right password...");
    let response = login.call(credentials("Tron", backend::DEMO_PASSWORD)).await;
    println!("  -> {}", response.status());
    if let Some(session) = store.session() {
        println!("  logged in as {}\n", session.user.username);
    }

    // The rockets index, with auto-generated alerts. The backend is
    // flaky on purpose: the first run fails, the retry succeeds.
    let rockets = ResourceQueryBuilder::new(ResourceConfig::new("index", "rockets"))
        .build(Arc::new(backend::flaky_rockets_operation()), env.clone());

    println!("Fetching the hangar (first try)...");
    let response = rockets.run(Params::new()).await;
    println!("  -> {}\n", response.status());

    println!("Fetching the hangar (retry)...");
    let response = rockets.run(Params::new()).await;
    println!("  -> {}", response.status());
    if let Some(data) = response.data() {
        let fleet: Vec<Rocket> = serde_json::from_value(data.clone())?;
        for rocket in &fleet {
            println!("  [{:>3} fuel] {}", rocket.fuel, rocket.name);
        }
    }
    println!();

    // Logout clears the session.
    let logout = RequestConfig::new()
        .with_middleware(ClearSessionMiddlewareBuilder::new())
        .with_metadata(RequestMetadata::mutation("session:destroy"))
        .build(backend::logout_operation(), &env);

    println!("Logging out...");
    let response = logout.call(Params::new()).await;
    println!("  -> {}", response.status());
    println!(
        "  session present: {}",
        if store.session().is_some() { "yes" } else { "no" }
    );

    Ok(())
}
