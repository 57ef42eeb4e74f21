use tracing::Subscriber;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Default, Debug, Clone)]
pub struct Builder {
	log_level: Option<String>,
}

pub fn builder() -> Builder {
	Builder::default()
}

impl Builder {
	/// Set the log level on the builder
	pub fn with_log_level(mut self, log_level: &str) -> Self {
		self.log_level = Some(log_level.to_string());
		self
	}

	/// Build a tracing dispatcher with the fmt subscriber
	pub fn build(self) -> Box<dyn Subscriber + Send + Sync + 'static> {
		let filter = match self.log_level.as_deref() {
			Some("none") => EnvFilter::new("off"),
			Some(level) => EnvFilter::builder()
				.parse_lossy(format!("error,nomad_gql={level},nomad_gql_core={level}")),
			None => EnvFilter::from_default_env(),
		};
		let registry = tracing_subscriber::registry().with(
			tracing_subscriber::fmt::layer()
				.compact()
				.with_ansi(true)
				.with_span_events(FmtSpan::NONE)
				.with_writer(std::io::stderr)
				.with_filter(filter)
				.boxed(),
		);
		Box::new(registry)
	}

	/// Initialise the global tracing subscriber
	pub fn init(self) {
		self.build().init()
	}
}
