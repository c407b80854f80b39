use crate::application::qr_service::QrDefaults;
use crate::domain::camera::CameraSettings;
use crate::domain::geo::LatLng;
use crate::domain::route::RandomizeParams;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub simulation: SimulationSettings,
    pub map: MapSettings,
    pub routes: RouteSettings,
    pub qr: QrSettings,
    pub allocation: AllocationSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulationSettings {
    pub enabled: bool,
    pub interval_secs: u64,
    pub jitter_degrees: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MapSettings {
    pub default_lat: f64,
    pub default_lng: f64,
    pub default_zoom: u8,
    pub salesperson_zoom: u8,
    pub geofence_zoom: u8,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RouteSettings {
    pub eta_spacing_minutes: i64,
    pub duration_factor: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct QrSettings {
    pub batch_prefix: String,
    pub default_type: String,
    pub unit_price: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AllocationSettings {
    pub price_per_coconut: f64,
}

impl AppConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.simulation.interval_secs.max(1))
    }

    pub fn camera_settings(&self) -> CameraSettings {
        CameraSettings {
            default_center: LatLng::new(self.map.default_lat, self.map.default_lng),
            default_zoom: self.map.default_zoom,
            salesperson_zoom: self.map.salesperson_zoom,
            geofence_zoom: self.map.geofence_zoom,
        }
    }

    pub fn randomize_params(&self) -> RandomizeParams {
        RandomizeParams {
            eta_spacing: chrono::Duration::minutes(self.routes.eta_spacing_minutes),
            duration_factor: self.routes.duration_factor,
        }
    }

    pub fn qr_defaults(&self) -> QrDefaults {
        QrDefaults {
            batch_prefix: self.qr.batch_prefix.clone(),
            coconut_type: self.qr.default_type.clone(),
            unit_price: self.qr.unit_price,
        }
    }

    /// Rejects values that would panic or misbehave at runtime
    pub fn validate(&self) -> anyhow::Result<()> {
        let jitter = self.simulation.jitter_degrees;
        anyhow::ensure!(
            jitter.is_finite() && jitter >= 0.0,
            "simulation.jitter_degrees must be a finite number >= 0, got {}",
            jitter
        );

        let factor = self.routes.duration_factor;
        anyhow::ensure!(
            factor.is_finite() && factor >= 0.0,
            "routes.duration_factor must be a finite number >= 0, got {}",
            factor
        );

        let price = self.allocation.price_per_coconut;
        anyhow::ensure!(
            price.is_finite() && price > 0.0,
            "allocation.price_per_coconut must be a finite number > 0, got {}",
            price
        );

        Ok(())
    }
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    load_app_config_from("config/app")
}

/// Built-in defaults, then the optional file at `path`, then `FST__*` env vars
pub fn load_app_config_from(path: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("simulation.enabled", true)?
        .set_default("simulation.interval_secs", 5)?
        .set_default("simulation.jitter_degrees", 0.0005)?
        .set_default("map.default_lat", 40.725037)?
        .set_default("map.default_lng", -73.995974)?
        .set_default("map.default_zoom", 13)?
        .set_default("map.salesperson_zoom", 16)?
        .set_default("map.geofence_zoom", 15)?
        .set_default("routes.eta_spacing_minutes", 15)?
        .set_default("routes.duration_factor", 0.8)?
        .set_default("qr.batch_prefix", "COCO")?
        .set_default("qr.default_type", "regular")?
        .set_default("qr.unit_price", 5.99)?
        .set_default("allocation.price_per_coconut", 5.0)?
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix("FST")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
