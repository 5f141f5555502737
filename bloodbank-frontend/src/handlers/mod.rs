pub mod account;
pub mod admin;
pub mod app;
pub mod auth;
pub mod donor;
pub mod hospital;
pub mod metrics;
