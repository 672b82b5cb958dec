pub mod accountdb;
pub mod db;

pub use db::DBClient;
