//! Application services container.
//!
//! Holds the tokio runtime, the weather coordinator and the channel its
//! state changes arrive on. Created once at startup from the loaded config.

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use skycheck_core::WeatherConfig;
use skycheck_weather::{build_client, ApiCredentials, Endpoints};
use tokio::task::JoinHandle;

use crate::models::weather_model::WeatherModel;
use crate::services::weather_service::{request_submit, WeatherCommand, WeatherServiceMessage};

pub struct AppServices {
    /// Tokio runtime for async operations
    runtime: tokio::runtime::Runtime,

    weather_model: Arc<WeatherModel>,

    /// Weather service channel receiver, until a consumer takes it
    weather_service_rx: Mutex<Option<mpsc::Receiver<WeatherServiceMessage>>>,
}

impl AppServices {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("skycheck-tokio")
            .build()
            .context("Failed to create tokio runtime")?;

        let client = build_client(Duration::from_secs(config.request_timeout_secs))
            .context("Failed to create HTTP client")?;
        let endpoints = Endpoints::new(&config.geocode_url, &config.weather_url);
        let credentials = ApiCredentials::new(&config.geocode_api_key, &config.weather_api_key);

        let weather_model = Arc::new(WeatherModel::new(client, &endpoints, &credentials));
        let weather_service_rx = Mutex::new(Some(weather_model.subscribe()));
        tracing::info!("Weather service initialized");

        Ok(Self {
            runtime,
            weather_model,
            weather_service_rx,
        })
    }

    pub fn runtime(&self) -> tokio::runtime::Handle {
        self.runtime.handle().clone()
    }

    pub fn weather_model(&self) -> Arc<WeatherModel> {
        self.weather_model.clone()
    }

    /// Spawn `command` on the runtime and return immediately.
    pub fn dispatch(&self, command: WeatherCommand) -> JoinHandle<()> {
        request_submit(self.runtime.handle(), self.weather_model.clone(), command)
    }

    /// Hand the weather service channel to a dedicated consumer.
    ///
    /// Afterwards the `*_weather_message` methods always return `None`.
    pub fn take_weather_receiver(&self) -> Option<mpsc::Receiver<WeatherServiceMessage>> {
        self.weather_service_rx.lock().take()
    }

    /// Try to receive a message from the weather service channel (non-blocking).
    pub fn try_recv_weather_message(&self) -> Option<WeatherServiceMessage> {
        self.weather_service_rx.lock().as_ref()?.try_recv().ok()
    }

    /// Wait up to `timeout` for the next weather service message.
    pub fn recv_weather_message_timeout(&self, timeout: Duration) -> Option<WeatherServiceMessage> {
        self.weather_service_rx
            .lock()
            .as_ref()?
            .recv_timeout(timeout)
            .ok()
    }

    /// Stop the runtime, giving in-flight lookups a moment to finish.
    pub fn shutdown(self) {
        tracing::info!("Shutting down services");
        self.runtime.shutdown_timeout(Duration::from_secs(2));
    }
}
