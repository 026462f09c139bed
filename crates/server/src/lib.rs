pub mod activity;
pub mod auth;
pub mod config;
pub mod db;
pub mod error_convert;
pub mod health;
pub mod ids;
pub mod integrity;
pub mod ledger;
pub mod openapi;
pub mod pinning;
pub mod repo;
pub mod rest;
pub mod telemetry;
