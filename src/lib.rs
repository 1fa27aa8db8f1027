//! Scenario Service
//!
//! Small HTTP service that answers thermostat readings with a fixed
//! heating scenario.
//!
//! ## Routes
//!
//! - `GET /` - keep scenario
//! - `POST /scenario` - keep or heat, depending on `test_value`
//! - `POST /echo/:item` - same as `/scenario`
//!
//! Errors (404, 405, 500) share one envelope: `{"error": "true", "msg": "..."}`.

pub mod config;
pub mod error;
pub mod routes;
pub mod scenario;

pub use config::{Config, ConfigError, Profile};
pub use error::{ApiError, ErrorEnvelope};
pub use routes::router;
pub use scenario::{Scenario, ScenarioResponse};
