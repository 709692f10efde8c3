use std::sync::Arc;

use wayfind_service::{SearchBackend, WayfindService};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<WayfindService>,
}
impl AppState {
	pub fn new(config: wayfind_config::Config) -> color_eyre::Result<Self> {
		let service = WayfindService::new(config)?;

		Ok(Self { service: Arc::new(service) })
	}

	pub fn with_backend(config: wayfind_config::Config, backend: Arc<dyn SearchBackend>) -> Self {
		Self { service: Arc::new(WayfindService::with_backend(config, backend)) }
	}
}
