pub mod activity;
pub mod catalog;
pub mod config;
pub mod dates;
pub mod seed;
