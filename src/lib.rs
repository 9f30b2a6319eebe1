pub mod app;
pub mod config;
pub mod cronjob;
pub mod events;
pub mod reconstruct;
pub mod schedule;
pub mod shared;
