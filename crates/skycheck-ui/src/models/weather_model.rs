use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;

use parking_lot::{Mutex, RwLock};
use reqwest::Client;
use skycheck_core::AppError;
use skycheck_weather::{
    ApiCredentials, Endpoints, GeocodeResolver, LocationQuery, WeatherFetcher, WeatherSnapshot,
};

use crate::services::weather_service::{
    run_lookup, LookupFailure, WeatherCommand, WeatherServiceMessage,
};

/// What the presentation layer shows. Every transition replaces the whole value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Loading,
    Success(WeatherSnapshot),
    Failed(String),
}

impl PipelineState {
    /// `Success` and `Failed` end a run
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Success(_) | PipelineState::Failed(_))
    }
}

/// Coordinates the geocode and weather stages and owns the lookup state.
///
/// Every submission takes a new run id. A finishing run only writes its
/// outcome while its id is still the latest issued; results of superseded
/// runs are dropped.
pub struct WeatherModel {
    geocoder: GeocodeResolver,
    fetcher: WeatherFetcher,
    state: RwLock<PipelineState>,
    latest_run: AtomicU64,
    subscribers: Mutex<Vec<mpsc::Sender<WeatherServiceMessage>>>,
}

impl WeatherModel {
    pub fn new(client: Client, endpoints: &Endpoints, credentials: &ApiCredentials) -> Self {
        let geocoder = GeocodeResolver::new(
            client.clone(),
            &endpoints.geocode_url,
            &credentials.geocode_api_key,
        );
        let fetcher = WeatherFetcher::new(
            client,
            &endpoints.weather_url,
            &credentials.weather_api_key,
        );
        Self::from_stages(geocoder, fetcher)
    }

    pub fn from_stages(geocoder: GeocodeResolver, fetcher: WeatherFetcher) -> Self {
        Self {
            geocoder,
            fetcher,
            state: RwLock::new(PipelineState::Idle),
            latest_run: AtomicU64::new(0),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state.read().clone()
    }

    pub fn is_loading(&self) -> bool {
        matches!(*self.state.read(), PipelineState::Loading)
    }

    /// Id of the most recently started run (0 before the first submission)
    pub fn latest_run(&self) -> u64 {
        self.latest_run.load(Ordering::SeqCst)
    }

    /// Receive a `StateChanged` message for every transition from now on
    pub fn subscribe(&self) -> mpsc::Receiver<WeatherServiceMessage> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.lock().push(tx);
        rx
    }

    pub async fn handle(&self, command: WeatherCommand) {
        match command {
            WeatherCommand::Submit(query) => {
                self.submit(query).await;
            }
        }
    }

    /// Run one lookup to completion and return its run id.
    ///
    /// Empty input fails immediately without touching the network.
    pub async fn submit(&self, query: impl Into<String>) -> u64 {
        let run_id = self.latest_run.fetch_add(1, Ordering::SeqCst) + 1;

        let query = match LocationQuery::new(query) {
            Ok(q) => q,
            Err(e) => {
                self.finish(run_id, Err(e.into()));
                return run_id;
            }
        };

        tracing::info!("Lookup run {} started for '{}'", run_id, query);
        self.transition(run_id, PipelineState::Loading);

        let outcome = run_lookup(&self.geocoder, &self.fetcher, &query).await;
        self.finish(run_id, outcome);
        run_id
    }

    fn finish(&self, run_id: u64, outcome: Result<WeatherSnapshot, LookupFailure>) {
        let next = match outcome {
            Ok(snapshot) => PipelineState::Success(snapshot),
            Err(failure) => {
                tracing::warn!("Lookup run {} failed: {}", run_id, failure);
                PipelineState::Failed(AppError::from(failure).user_message().to_string())
            }
        };
        self.transition(run_id, next);
    }

    /// Replace the state if `run_id` is still current. Returns whether it was applied.
    fn transition(&self, run_id: u64, next: PipelineState) -> bool {
        let mut state = self.state.write();

        let latest = self.latest_run.load(Ordering::SeqCst);
        if run_id != latest {
            tracing::debug!(
                "Discarding {:?} from stale run {} (latest is {})",
                next,
                run_id,
                latest
            );
            return false;
        }

        *state = next.clone();
        // Published under the state lock so subscribers see transitions in order
        self.publish(WeatherServiceMessage::StateChanged(next));
        true
    }

    fn publish(&self, message: WeatherServiceMessage) {
        self.subscribers
            .lock()
            .retain(|tx| tx.send(message.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Port 1 refuses connections, so any accidental request fails fast
    fn offline_model() -> WeatherModel {
        let endpoints = Endpoints::new("http://127.0.0.1:1/geocode", "http://127.0.0.1:1/weather");
        let credentials = ApiCredentials::new("geo-key", "owm-key");
        WeatherModel::new(Client::new(), &endpoints, &credentials)
    }

    fn snapshot(name: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            name: name.to_string(),
            description: "overcast clouds".to_string(),
            temperature: 12.0,
            humidity: 80.0,
            wind_speed: 4.0,
        }
    }

    #[test]
    fn starts_idle() {
        let model = offline_model();
        assert_eq!(model.state(), PipelineState::Idle);
        assert!(!model.is_loading());
        assert_eq!(model.latest_run(), 0);
    }

    #[tokio::test]
    async fn empty_query_fails_without_loading() {
        let model = offline_model();
        let rx = model.subscribe();

        let run_id = model.submit("").await;

        assert_eq!(run_id, 1);
        assert_eq!(
            model.state(),
            PipelineState::Failed("Please enter a location.".to_string())
        );
        let messages: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            messages,
            vec![WeatherServiceMessage::StateChanged(PipelineState::Failed(
                "Please enter a location.".to_string()
            ))]
        );
    }

    #[tokio::test]
    async fn unreachable_geocoder_fails_with_location_message() {
        let model = offline_model();

        model.handle(WeatherCommand::Submit("London".to_string())).await;

        assert_eq!(
            model.state(),
            PipelineState::Failed(
                "Failed to retrieve location. Please enter a valid location.".to_string()
            )
        );
        assert!(!model.is_loading());
    }

    #[test]
    fn stale_run_is_discarded() {
        let model = offline_model();
        let first = model.latest_run.fetch_add(1, Ordering::SeqCst) + 1;
        let second = model.latest_run.fetch_add(1, Ordering::SeqCst) + 1;

        assert!(model.transition(second, PipelineState::Success(snapshot("Leeds"))));
        assert!(!model.transition(first, PipelineState::Success(snapshot("York"))));

        assert_eq!(model.state(), PipelineState::Success(snapshot("Leeds")));
    }

    #[test]
    fn failure_replaces_previous_success() {
        let model = offline_model();
        let run = model.latest_run.fetch_add(1, Ordering::SeqCst) + 1;
        model.transition(run, PipelineState::Success(snapshot("Leeds")));

        let run = model.latest_run.fetch_add(1, Ordering::SeqCst) + 1;
        model.finish(
            run,
            Err(LookupFailure::WeatherFetch(
                skycheck_weather::WeatherFetchError::Status(500),
            )),
        );

        assert_eq!(
            model.state(),
            PipelineState::Failed("Failed to fetch weather data. Please try again.".to_string())
        );
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let model = offline_model();
        let kept = model.subscribe();
        drop(model.subscribe());

        let run = model.latest_run.fetch_add(1, Ordering::SeqCst) + 1;
        model.transition(run, PipelineState::Loading);

        assert_eq!(model.subscribers.lock().len(), 1);
        assert_eq!(
            kept.try_recv().ok(),
            Some(WeatherServiceMessage::StateChanged(PipelineState::Loading))
        );
    }

    #[test]
    fn terminal_states() {
        assert!(!PipelineState::Idle.is_terminal());
        assert!(!PipelineState::Loading.is_terminal());
        assert!(PipelineState::Failed("x".into()).is_terminal());
        assert!(PipelineState::Success(snapshot("Leeds")).is_terminal());
    }
}
