//! Scripted Signup Session
//!
//! Mounts the customer form, runs it in a `FormSession` and replays a short
//! user script against it, logging every outbound form event. Useful for
//! eyeballing rule ordering and debounce timing without a renderer.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin signup-demo
//!
//! # With debug output from the form engine
//! RUST_LOG=signup_core=debug cargo run --bin signup-demo
//!
//! # With a config override file
//! SIGNUP_CONFIG=./signup.json cargo run --bin signup-demo
//! ```
//!
//! # Environment Variables
//!
//! - `SIGNUP_CONFIG`: Path to a JSON `FormConfig` (partial files are fine)
//! - `RUST_LOG`: Logging level (default: "info")

use std::env;
use std::time::Duration;

use serde_json::json;
use signup_core::{CustomerForm, FormConfig, FormSession, NotificationMode, UserEvent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match env::var("SIGNUP_CONFIG") {
        Ok(path) => {
            tracing::info!("Loading config from {}", path);
            FormConfig::from_file(&path)?
        }
        Err(_) => FormConfig::default(),
    };
    let debounce = config.email_debounce();

    let form = CustomerForm::mount(config)?;
    let mut events = form.subscribe();
    let (handle, session) = FormSession::spawn(form, 32);

    let logger = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match serde_json::to_string(&event) {
                Ok(text) => tracing::info!("{:<16} {}", event.event_type(), text),
                Err(e) => tracing::warn!("Unprintable event: {}", e),
            }
        }
    });

    let script = vec![
        UserEvent::PopulateTestData,
        UserEvent::Input {
            path: "emailGroup.confirmEmail".to_string(),
            value: json!("jonny@mail.com"),
        },
        UserEvent::SetNotification(NotificationMode::Text),
        UserEvent::Input {
            path: "rating".to_string(),
            value: json!(12),
        },
        UserEvent::AddAddress,
        UserEvent::Blur {
            path: "emailGroup.email".to_string(),
        },
        UserEvent::Input {
            path: "emailGroup.email".to_string(),
            value: json!("Jonny@Mail"),
        },
        UserEvent::Save,
    ];

    for event in script {
        tracing::info!("> {:?}", event);
        handle
            .send(event)
            .await
            .map_err(|e| anyhow::anyhow!("Session stopped before {:?}", e))?;
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    // Let the debounced email message land
    tokio::time::sleep(debounce + Duration::from_millis(100)).await;

    drop(handle);
    let form = session.await?;
    tracing::info!("Email message: {:?}", form.email_message());
    tracing::info!("Invalid paths: {:?}", form.invalid_paths());
    form.unmount();

    // Unmounting dropped the event bus, which ends the logger
    logger.await?;
    Ok(())
}
