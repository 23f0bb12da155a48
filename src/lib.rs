pub mod analytics;
pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod inventory;
pub mod message_broker;
pub mod query;
pub mod scheduler;
pub mod shop;
pub mod store;
