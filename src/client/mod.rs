pub mod accounts;
pub mod api_client;
pub mod error;
pub mod jobs;
pub mod transactions;

pub use api_client::ApiClient;
pub use error::ClientError;
