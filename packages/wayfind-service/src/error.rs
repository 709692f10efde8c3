pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Backend error: {message}")]
	Backend { message: String },
}
impl From<wayfind_providers::Error> for Error {
	fn from(err: wayfind_providers::Error) -> Self {
		match err {
			wayfind_providers::Error::InvalidConfig { message } => Self::InvalidRequest { message },
			other => Self::Backend { message: other.to_string() },
		}
	}
}
