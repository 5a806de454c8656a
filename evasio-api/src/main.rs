use std::net::SocketAddr;
use std::sync::Arc;

use evasio_api::{app, state::{AppState, Repositories}};
use evasio_notify::{Notifier, ResendMailer};
use evasio_pay::StripeGateway;
use evasio_store::form_repo::AirtableFormRepository;
use evasio_store::giftcard_repo::AirtableGiftCardRepository;
use evasio_store::participant_repo::AirtableParticipantRepository;
use evasio_store::trip_repo::AirtableTripRepository;
use evasio_store::AirtableClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evasio_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = evasio_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Evasio API on port {}", config.server.port);

    let base_url = config.app.base_url.clone();

    let repos = match (&config.airtable.api_key, &config.airtable.base_id) {
        (Some(api_key), Some(base_id)) => {
            let client = Arc::new(AirtableClient::new(api_key.clone(), base_id.clone()));
            Some(Arc::new(Repositories {
                trips: Arc::new(AirtableTripRepository::new(client.clone())),
                participants: Arc::new(AirtableParticipantRepository::new(client.clone())),
                forms: Arc::new(AirtableFormRepository::new(client.clone())),
                gift_cards: Arc::new(AirtableGiftCardRepository::new(client)),
            }))
        }
        _ => {
            tracing::warn!("record store not configured; data endpoints will refuse requests");
            None
        }
    };

    let payments = config.stripe.secret_key.clone().map(|secret_key| {
        let success_url = config
            .stripe
            .success_url
            .clone()
            .unwrap_or_else(|| format!("{}/checkout/success", base_url));
        let cancel_url = config
            .stripe
            .cancel_url
            .clone()
            .unwrap_or_else(|| format!("{}/checkout/cancelled", base_url));
        Arc::new(StripeGateway::new(secret_key, success_url, cancel_url))
    });
    if payments.is_none() {
        tracing::warn!("payment provider not configured; checkout endpoints will refuse requests");
    }

    let notifier = config.resend.api_key.clone().map(|api_key| {
        let from = config
            .resend
            .from
            .clone()
            .unwrap_or_else(|| "Evasio <trips@evasio.example>".to_string());
        Arc::new(Notifier::new(
            Arc::new(ResendMailer::new(api_key)),
            from,
            base_url.clone(),
        ))
    });
    if notifier.is_none() {
        tracing::warn!("email provider not configured; notifications will refuse requests");
    }

    let app_state = AppState {
        repos,
        payments,
        notifier,
        webhook_secret: config.stripe.webhook_secret.clone(),
        base_url,
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
