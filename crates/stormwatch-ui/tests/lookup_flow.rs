//! Lookup flow tests against an in-process weather source.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use stormwatch_services::{
    KeyValueStore, LastPositionStore, MemoryStore, SavedPosition, FAVORITES_KEY, LAST_CITY_KEY,
};
use stormwatch_ui::{LocationStatus, LookupSettings, WeatherModel};
use stormwatch_weather::{
    Condition, Coordinates, FixedLocation, ForecastEntry, LocationQuery, UnsupportedLocation,
    WeatherError, WeatherSnapshot, WeatherSource,
};

const CITY_ERROR: &str = "City not found. Please try again.";
const COORDS_ERROR: &str = "Location not found. Please try again.";
const FORECAST_ERROR: &str = "Unable to fetch forecast data. Please try again.";

const OSLO: Coordinates = Coordinates {
    latitude: 59.91,
    longitude: 10.75,
};

#[derive(Default)]
struct FakeSource {
    /// Keyed by the lower-cased query text
    known: HashMap<String, WeatherSnapshot>,
    forecast_fails: bool,
    series_len: usize,
    calls: Mutex<Vec<String>>,
}

impl FakeSource {
    fn with_cities(names: &[&str]) -> Self {
        let known = names
            .iter()
            .map(|name| (name.to_lowercase(), snapshot(name)))
            .collect();
        Self {
            known,
            series_len: 24,
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

fn snapshot(city: &str) -> WeatherSnapshot {
    WeatherSnapshot {
        city: city.to_string(),
        condition: Condition {
            label: "Clear".into(),
            description: "clear sky".into(),
            icon: "01d".into(),
        },
        temperature: 70.0,
        temp_min: 65.0,
        temp_max: 75.0,
    }
}

fn series(len: usize) -> Vec<ForecastEntry> {
    (0..len)
        .map(|i| ForecastEntry {
            timestamp: format!("2026-10-{:02} {:02}:00:00", 16 + i / 8, (i % 8) * 3),
            condition: Condition::default(),
            temperature: Some(i as f64),
        })
        .collect()
}

#[async_trait]
impl WeatherSource for FakeSource {
    async fn current(&self, query: &LocationQuery) -> Result<WeatherSnapshot, WeatherError> {
        self.calls.lock().push(format!("current:{}", query));
        self.known
            .get(&query.to_string().to_lowercase())
            .cloned()
            .ok_or_else(|| WeatherError::LocationNotFound(query.to_string()))
    }

    async fn forecast(&self, query: &LocationQuery) -> Result<Vec<ForecastEntry>, WeatherError> {
        self.calls.lock().push(format!("forecast:{}", query));
        if self.forecast_fails {
            return Err(WeatherError::ServiceUnavailable(503));
        }
        Ok(series(self.series_len))
    }
}

fn model(source: &Arc<FakeSource>, store: &Arc<MemoryStore>) -> WeatherModel {
    WeatherModel::new(source.clone(), store.clone(), LookupSettings::default())
}

#[tokio::test]
async fn successful_lookup_fills_view() {
    let source = Arc::new(FakeSource::with_cities(&["Lima"]));
    let store = Arc::new(MemoryStore::new());
    let mut model = model(&source, &store);

    model.set_query("  Lima ");
    model.search().await;

    let view = model.view();
    assert_eq!(view.weather.as_ref().map(|w| w.city.as_str()), Some("Lima"));
    assert_eq!(view.error, None);

    let full = series(24);
    assert_eq!(
        view.forecast.as_deref(),
        Some(&[full[0].clone(), full[8].clone(), full[16].clone()][..])
    );
    assert_eq!(source.calls(), vec!["current:Lima", "forecast:Lima"]);
    assert_eq!(store.get(LAST_CITY_KEY).unwrap().as_deref(), Some("Lima"));
}

#[tokio::test]
async fn conditions_failure_skips_forecast() {
    let source = Arc::new(FakeSource::with_cities(&["Lima"]));
    let store = Arc::new(MemoryStore::new());
    let mut model = model(&source, &store);

    model.search_city("Atlantis").await;

    assert_eq!(model.view().error.as_deref(), Some(CITY_ERROR));
    assert!(model.view().weather.is_none());
    assert!(model.view().forecast.is_none());
    assert_eq!(source.calls(), vec!["current:Atlantis"]);
    assert_eq!(store.get(LAST_CITY_KEY).unwrap(), None);
}

#[tokio::test]
async fn conditions_failure_keeps_previous_display() {
    let source = Arc::new(FakeSource::with_cities(&["Lima"]));
    let store = Arc::new(MemoryStore::new());
    let mut model = model(&source, &store);

    model.search_city("Lima").await;
    model.search_city("Atlantis").await;

    let view = model.view();
    assert_eq!(view.error.as_deref(), Some(CITY_ERROR));
    assert_eq!(view.weather.as_ref().map(|w| w.city.as_str()), Some("Lima"));
    assert_eq!(view.forecast.as_ref().map(Vec::len), Some(3));
}

#[tokio::test]
async fn forecast_failure_keeps_conditions() {
    let source = Arc::new(FakeSource {
        forecast_fails: true,
        ..FakeSource::with_cities(&["Oslo"])
    });
    let store = Arc::new(MemoryStore::new());
    let mut model = model(&source, &store);

    model.search_city("Oslo").await;

    let view = model.view();
    assert_eq!(view.weather.as_ref().map(|w| w.city.as_str()), Some("Oslo"));
    assert_eq!(view.error.as_deref(), Some(FORECAST_ERROR));
    assert!(view.forecast.is_none());
    // Recorded as soon as conditions arrived
    assert_eq!(store.get(LAST_CITY_KEY).unwrap().as_deref(), Some("Oslo"));
}

#[tokio::test]
async fn empty_forecast_is_not_an_error() {
    let source = Arc::new(FakeSource {
        series_len: 0,
        ..FakeSource::with_cities(&["Oslo"])
    });
    let store = Arc::new(MemoryStore::new());
    let mut model = model(&source, &store);

    model.search_city("Oslo").await;

    assert_eq!(model.view().error, None);
    assert_eq!(model.view().forecast.as_ref().map(Vec::len), Some(0));
}

#[tokio::test]
async fn blank_search_is_ignored() {
    let source = Arc::new(FakeSource::with_cities(&["Lima"]));
    let store = Arc::new(MemoryStore::new());
    let mut model = model(&source, &store);

    model.set_query("   ");
    model.search().await;

    assert!(source.calls().is_empty());
    assert_eq!(model.view().error, None);
}

#[tokio::test]
async fn displayed_city_is_not_fetched_again() {
    let source = Arc::new(FakeSource::with_cities(&["Lima"]));
    let store = Arc::new(MemoryStore::new());
    let mut model = model(&source, &store);

    model.search_city("Lima").await;
    model.search_city("LIMA ").await;

    assert_eq!(source.calls().len(), 2);
}

#[tokio::test]
async fn locate_looks_up_coordinates() {
    let mut source = FakeSource::with_cities(&[]);
    source
        .known
        .insert(LocationQuery::Coordinates(OSLO).to_string(), snapshot("Oslo"));
    let source = Arc::new(source);
    let store = Arc::new(MemoryStore::new());
    let mut model = model(&source, &store);

    model.locate(&FixedLocation(OSLO)).await;

    let view = model.view();
    assert_eq!(view.location, LocationStatus::Idle);
    assert_eq!(view.query, "Oslo");
    assert_eq!(view.weather.as_ref().map(|w| w.city.as_str()), Some("Oslo"));
    assert_eq!(
        source.calls(),
        vec!["current:59.9100, 10.7500", "forecast:59.9100, 10.7500"]
    );
}

#[tokio::test]
async fn locate_unknown_coordinates_uses_location_message() {
    let source = Arc::new(FakeSource::with_cities(&[]));
    let store = Arc::new(MemoryStore::new());
    let mut model = model(&source, &store);

    model.locate(&FixedLocation(OSLO)).await;

    assert_eq!(model.view().error.as_deref(), Some(COORDS_ERROR));
    assert_eq!(source.calls().len(), 1);
}

#[tokio::test]
async fn locate_unsupported_leaves_weather_alone() {
    let source = Arc::new(FakeSource::with_cities(&["Lima"]));
    let store = Arc::new(MemoryStore::new());
    let mut model = model(&source, &store);

    model.search_city("Lima").await;
    model.locate(&UnsupportedLocation).await;

    let view = model.view();
    assert_eq!(
        view.location,
        LocationStatus::Failed("Geolocation is not supported on this system.".into())
    );
    assert_eq!(view.error, None);
    assert_eq!(view.weather.as_ref().map(|w| w.city.as_str()), Some("Lima"));
    assert_eq!(source.calls().len(), 2);
}

fn source_knowing_oslo_coordinates() -> Arc<FakeSource> {
    let mut source = FakeSource::with_cities(&[]);
    source
        .known
        .insert(LocationQuery::Coordinates(OSLO).to_string(), snapshot("Oslo"));
    Arc::new(source)
}

fn saved_oslo(saved_at: i64) -> SavedPosition {
    SavedPosition {
        latitude: OSLO.latitude,
        longitude: OSLO.longitude,
        saved_at,
    }
}

#[tokio::test]
async fn locate_saves_position() {
    let source = source_knowing_oslo_coordinates();
    let store = Arc::new(MemoryStore::new());
    let mut model = model(&source, &store);

    model.locate(&FixedLocation(OSLO)).await;

    let saved = LastPositionStore::new(store.clone()).get().unwrap();
    assert_eq!((saved.latitude, saved.longitude), (OSLO.latitude, OSLO.longitude));
    assert!(saved.is_fresh(chrono::Utc::now().timestamp(), 300));
}

#[tokio::test]
async fn locate_reuses_recent_saved_position() {
    let source = source_knowing_oslo_coordinates();
    let store = Arc::new(MemoryStore::new());
    LastPositionStore::new(store.clone())
        .set(&saved_oslo(chrono::Utc::now().timestamp() - 60))
        .unwrap();
    let mut model = model(&source, &store);

    // A provider that can't answer is never asked
    model.locate(&UnsupportedLocation).await;

    assert_eq!(model.view().location, LocationStatus::Idle);
    assert_eq!(
        model.view().weather.as_ref().map(|w| w.city.as_str()),
        Some("Oslo")
    );
}

#[tokio::test]
async fn locate_ignores_expired_saved_position() {
    let source = source_knowing_oslo_coordinates();
    let store = Arc::new(MemoryStore::new());
    LastPositionStore::new(store.clone())
        .set(&saved_oslo(chrono::Utc::now().timestamp() - 3600))
        .unwrap();
    let mut model = model(&source, &store);

    model.locate(&UnsupportedLocation).await;

    assert!(matches!(model.view().location, LocationStatus::Failed(_)));
    assert!(model.view().weather.is_none());
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn explicit_coordinates_skip_saved_position() {
    let source = source_knowing_oslo_coordinates();
    let store = Arc::new(MemoryStore::new());
    let elsewhere = SavedPosition {
        latitude: -12.05,
        longitude: -77.04,
        saved_at: chrono::Utc::now().timestamp(),
    };
    LastPositionStore::new(store.clone()).set(&elsewhere).unwrap();
    let mut model = model(&source, &store);

    model.search_coordinates(OSLO).await;

    assert_eq!(
        model.view().weather.as_ref().map(|w| w.city.as_str()),
        Some("Oslo")
    );
    assert_eq!(
        LastPositionStore::new(store.clone()).get(),
        Some(elsewhere)
    );
}

#[tokio::test]
async fn restore_last_searches_recorded_city() {
    let source = Arc::new(FakeSource::with_cities(&["Seoul"]));
    let store = Arc::new(MemoryStore::with_values([(LAST_CITY_KEY, "Seoul")]));
    let mut model = model(&source, &store);

    assert!(model.restore_last().await);
    assert_eq!(
        model.view().weather.as_ref().map(|w| w.city.as_str()),
        Some("Seoul")
    );

    let empty = Arc::new(MemoryStore::new());
    let mut fresh = WeatherModel::new(source.clone(), empty, LookupSettings::default());
    assert!(!fresh.restore_last().await);
}

#[tokio::test]
async fn default_city() {
    let source = Arc::new(FakeSource::with_cities(&["New York"]));
    let store = Arc::new(MemoryStore::new());
    let mut model = model(&source, &store);

    model.use_default_city().await;

    assert_eq!(
        model.view().weather.as_ref().map(|w| w.city.as_str()),
        Some("New York")
    );
}

#[tokio::test]
async fn favorites_flow() {
    let source = Arc::new(FakeSource::with_cities(&["Lima", "Oslo"]));
    let store = Arc::new(MemoryStore::with_values([(FAVORITES_KEY, "not json")]));
    let mut model = model(&source, &store);

    assert!(model.view().favorites.is_empty());

    // Nothing displayed yet: nothing to add
    model.add_current_to_favorites();
    assert!(model.view().favorites.is_empty());

    model.search_city("Lima").await;
    assert!(!model.is_current_favorite());
    model.add_current_to_favorites();
    model.add_current_to_favorites();
    assert!(model.is_current_favorite());

    model.search_city("Oslo").await;
    model.add_current_to_favorites();
    assert_eq!(model.view().favorites, vec!["Lima".to_string(), "Oslo".to_string()]);

    model.remove_favorite("Lima");
    model.remove_favorite("Lima");
    assert_eq!(model.view().favorites, vec!["Oslo".to_string()]);
    assert_eq!(store.get(FAVORITES_KEY).unwrap().as_deref(), Some(r#"["Oslo"]"#));
}

#[tokio::test]
async fn select_favorite_closes_panel() {
    let source = Arc::new(FakeSource::with_cities(&["Lima"]));
    let store = Arc::new(MemoryStore::new());
    let mut model = model(&source, &store);

    model.toggle_favorites();
    assert!(model.view().show_favorites);

    model.select_favorite("Lima").await;

    assert!(!model.view().show_favorites);
    assert_eq!(model.view().query, "Lima");
    assert_eq!(
        model.view().weather.as_ref().map(|w| w.city.as_str()),
        Some("Lima")
    );
}
