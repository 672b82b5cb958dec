pub mod client;
pub mod config;
pub mod db;
pub mod dtos;
pub mod error;
pub mod handler;
pub mod mail;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
pub mod utils;

#[cfg(test)]
mod test_support;

use config::Config;
use service::registration_service::AgencyRegistrationService;

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub registration_service: AgencyRegistrationService,
}

impl AppState {
    pub fn new(env: Config, registration_service: AgencyRegistrationService) -> Self {
        Self {
            env,
            registration_service,
        }
    }
}
