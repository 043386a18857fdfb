pub mod auth;
pub mod config;
pub mod domain;
pub mod errors;
pub mod feed;
pub mod feed_store;
pub mod handlers;
pub mod http_api;
pub mod models;
pub mod routes;
pub mod startup;
