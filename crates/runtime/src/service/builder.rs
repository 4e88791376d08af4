use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};
use crate::source::ProgressSource;

use super::ProgressService;

/// Builder for [`ProgressService`]. A data source is required; the clock
/// defaults to [`SystemClock`].
pub struct ServiceBuilder {
    config: ServiceConfig,
    source: Option<Arc<dyn ProgressSource>>,
    clock: Option<Arc<dyn Clock>>,
}

impl ServiceBuilder {
    pub(super) fn new() -> Self {
        Self {
            config: ServiceConfig::default(),
            source: None,
            clock: None,
        }
    }

    /// Override service configuration
    pub fn config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required data source
    pub fn source(mut self, source: Arc<dyn ProgressSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the time source (optional)
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<ProgressService> {
        let source = self.source.ok_or(ServiceError::MissingSource)?;
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        Ok(ProgressService::from_parts(source, clock, self.config))
    }
}
