use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Cannot read wayfind config {path:?}.")]
	ReadConfig { path: PathBuf, source: std::io::Error },
	#[error("Invalid TOML in wayfind config {path:?}.")]
	ParseConfig { path: PathBuf, source: toml::de::Error },
	#[error(
		"backend.api_base must start with http:// or https://. Got {url:?} from the config file or WAYFIND_BACKEND_URL."
	)]
	BackendUrl { url: String },
	#[error("Invalid wayfind config: {message}")]
	Validation { message: String },
}
