pub mod bridge;
pub mod catalog;
pub mod checklist;
pub mod clock;
pub mod locale;
pub mod models;
pub mod service;
pub mod shopping;
pub mod store;
pub mod week;
