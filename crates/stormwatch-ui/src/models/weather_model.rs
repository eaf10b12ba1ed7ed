//! Weather display state and the lookup flow that fills it.
//!
//! A lookup asks the source for current conditions, then (only if that
//! succeeded) for the forecast of the same location, which is reduced to one
//! entry per day. Failures only ever touch `error`; whatever was displayed
//! before stays on screen.

use std::sync::Arc;

use chrono::Utc;
use stormwatch_core::AppError;
use stormwatch_services::{
    FavoritesStore, KeyValueStore, LastLocationStore, LastPositionStore, SavedPosition,
};
use stormwatch_weather::{
    normalize, request_position, Coordinates, ForecastEntry, GeolocationOptions,
    LocationProvider, LocationQuery, WeatherSnapshot, WeatherSource, DEFAULT_SAMPLES_PER_DAY,
};

use crate::error_mapping::{conditions_error, forecast_error, location_error, storage_error};

/// Progress of the one-shot geolocation request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LocationStatus {
    #[default]
    Idle,
    Locating,
    Failed(String),
}

/// Everything the presentation layer renders
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeatherView {
    /// Search box text
    pub query: String,
    pub weather: Option<WeatherSnapshot>,
    /// One entry per day
    pub forecast: Option<Vec<ForecastEntry>>,
    /// Lookup error shown next to the weather
    pub error: Option<String>,
    pub location: LocationStatus,
    pub favorites: Vec<String>,
    pub show_favorites: bool,
    pub clock: String,
}

#[derive(Debug, Clone)]
pub struct LookupSettings {
    pub samples_per_day: usize,
    pub default_city: String,
    pub geolocation: GeolocationOptions,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            samples_per_day: DEFAULT_SAMPLES_PER_DAY,
            default_city: "New York".to_string(),
            geolocation: GeolocationOptions::default(),
        }
    }
}

pub struct WeatherModel {
    source: Arc<dyn WeatherSource>,
    favorites: FavoritesStore,
    last_location: LastLocationStore,
    last_position: LastPositionStore,
    settings: LookupSettings,
    view: WeatherView,
}

impl WeatherModel {
    pub fn new(
        source: Arc<dyn WeatherSource>,
        store: Arc<dyn KeyValueStore>,
        settings: LookupSettings,
    ) -> Self {
        let favorites = FavoritesStore::new(store.clone());
        let last_location = LastLocationStore::new(store.clone());
        let last_position = LastPositionStore::new(store);
        let view = WeatherView {
            favorites: favorites.list(),
            ..WeatherView::default()
        };

        Self {
            source,
            favorites,
            last_location,
            last_position,
            settings,
            view,
        }
    }

    pub fn view(&self) -> &WeatherView {
        &self.view
    }

    pub fn set_query(&mut self, query: &str) {
        self.view.query = query.to_string();
    }

    pub fn set_clock(&mut self, text: String) {
        self.view.clock = text;
    }

    pub fn toggle_favorites(&mut self) {
        self.view.show_favorites = !self.view.show_favorites;
    }

    /// Look up whatever is in the search box.
    pub async fn search(&mut self) {
        let query = self.view.query.clone();
        self.search_city(&query).await;
    }

    /// Look up `city` by name.
    ///
    /// Blank input is ignored, as is the city already on display
    /// (compared case-insensitively).
    pub async fn search_city(&mut self, city: &str) {
        let trimmed = city.trim();
        if trimmed.is_empty() {
            return;
        }

        if let Some(current) = &self.view.weather {
            if current.city.to_lowercase() == trimmed.to_lowercase() {
                tracing::debug!("{} is already displayed, skipping lookup", current.city);
                return;
            }
        }

        self.lookup(LocationQuery::city(trimmed)).await;
    }

    /// Pick a city from the favorites list.
    pub async fn select_favorite(&mut self, city: &str) {
        self.set_query(city);
        self.view.show_favorites = false;
        self.search_city(city).await;
    }

    pub async fn use_default_city(&mut self) {
        let city = self.settings.default_city.clone();
        self.search_city(&city).await;
    }

    /// Look up the last viewed city, if one was recorded.
    ///
    /// Returns `true` when a lookup was started.
    pub async fn restore_last(&mut self) -> bool {
        match self.last_location.get() {
            Some(city) => {
                tracing::info!("Restoring last viewed city: {}", city);
                self.search_city(&city).await;
                true
            }
            None => false,
        }
    }

    /// Look up the current position.
    ///
    /// A saved fix younger than `maximum_age` is reused; otherwise `provider`
    /// is asked and its answer saved. A geolocation failure sets `location` to
    /// `Failed` and leaves the displayed weather alone.
    pub async fn locate(&mut self, provider: &dyn LocationProvider) {
        self.view.location = LocationStatus::Locating;

        let options = self.settings.geolocation;
        let coords = match self.fresh_saved_position() {
            Some(coords) => {
                tracing::debug!("Reusing saved position {}", coords);
                coords
            }
            None => match request_position(provider, &options).await {
                Ok(coords) => {
                    tracing::info!("Got location: {}", coords);
                    self.save_position(coords);
                    coords
                }
                Err(e) => {
                    let err = location_error(e);
                    tracing::warn!("Geolocation failed: {}", err);
                    self.view.location = LocationStatus::Failed(err.user_message().to_string());
                    return;
                }
            },
        };

        self.lookup(LocationQuery::Coordinates(coords)).await;
        self.view.location = LocationStatus::Idle;
    }

    /// Look up explicit coordinates, bypassing geolocation and the saved fix.
    pub async fn search_coordinates(&mut self, coords: Coordinates) {
        self.lookup(LocationQuery::Coordinates(coords)).await;
    }

    pub fn is_current_favorite(&self) -> bool {
        self.view
            .weather
            .as_ref()
            .is_some_and(|w| self.view.favorites.iter().any(|c| c == &w.city))
    }

    /// Bookmark the displayed city.
    pub fn add_current_to_favorites(&mut self) {
        let Some(city) = self.view.weather.as_ref().map(|w| w.city.clone()) else {
            return;
        };
        if let Err(e) = self.favorites.add(&city) {
            let err: AppError = storage_error(e);
            tracing::error!("Failed to save favorite {}: {}", city, err);
        }
        self.view.favorites = self.favorites.list();
    }

    pub fn remove_favorite(&mut self, city: &str) {
        if let Err(e) = self.favorites.remove(city) {
            let err: AppError = storage_error(e);
            tracing::error!("Failed to remove favorite {}: {}", city, err);
        }
        self.view.favorites = self.favorites.list();
    }

    fn fresh_saved_position(&self) -> Option<Coordinates> {
        let max_age = self.settings.geolocation.maximum_age.as_secs();
        self.last_position
            .get()
            .filter(|p| p.is_fresh(Utc::now().timestamp(), max_age))
            .map(|p| Coordinates {
                latitude: p.latitude,
                longitude: p.longitude,
            })
    }

    fn save_position(&self, coords: Coordinates) {
        let position = SavedPosition {
            latitude: coords.latitude,
            longitude: coords.longitude,
            saved_at: Utc::now().timestamp(),
        };
        if let Err(e) = self.last_position.set(&position) {
            tracing::warn!("Failed to save position: {}", storage_error(e));
        }
    }

    async fn lookup(&mut self, query: LocationQuery) {
        let snapshot = match self.source.current(&query).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                let err = conditions_error(&query, e);
                tracing::error!("Failed to fetch current weather: {}", err);
                self.view.error = Some(err.user_message().to_string());
                return;
            }
        };

        tracing::info!(
            "Current weather for {}: {}",
            snapshot.city,
            snapshot.condition.label
        );

        if let Err(e) = self.last_location.set(&snapshot.city) {
            tracing::warn!("Failed to record last city: {}", storage_error(e));
        }
        if matches!(query, LocationQuery::Coordinates(_)) {
            self.view.query = snapshot.city.clone();
        }
        self.view.weather = Some(snapshot);
        self.view.error = None;

        match self.source.forecast(&query).await {
            Ok(series) => {
                let daily = normalize(&series, self.settings.samples_per_day);
                tracing::debug!("Forecast: {} samples -> {} days", series.len(), daily.len());
                self.view.forecast = Some(daily);
                self.view.error = None;
            }
            Err(e) => {
                let err = forecast_error(&query, e);
                tracing::error!("Failed to fetch forecast: {}", err);
                // Don't show the previous city's outlook under the new one
                self.view.forecast = None;
                self.view.error = Some(err.user_message().to_string());
            }
        }
    }
}
