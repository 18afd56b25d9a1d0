// File: crates/meetbot_gcal/src/auth.rs
use crate::service::GcalServiceError;
use google_calendar3::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator},
    CalendarHub,
};
use meetbot_config::GcalConfig;
use std::path::Path;
use tracing::info;

type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = CalendarHub<Connector>;

/// Builds a Calendar hub authenticated as the configured service account.
pub async fn create_calendar_hub(config: &GcalConfig) -> Result<HubType, GcalServiceError> {
    let key_path = config
        .key_path
        .as_deref()
        .ok_or_else(|| GcalServiceError::Auth("Missing key_path in GcalConfig".to_string()))?;

    let sa_key = read_service_account_key(Path::new(key_path))
        .await
        .map_err(|e| GcalServiceError::Auth(format!("{}: {}", key_path, e)))?;

    let auth = ServiceAccountAuthenticator::builder(sa_key)
        .build()
        .await
        .map_err(|e| GcalServiceError::Auth(e.to_string()))?;

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()
        .map_err(|e| GcalServiceError::Auth(e.to_string()))?
        .https_or_http()
        .enable_http1()
        .build();

    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);
    info!("Google Calendar hub ready (key {})", key_path);

    Ok(CalendarHub::new(client, auth))
}
