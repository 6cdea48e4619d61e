pub mod form;
pub mod manager;
pub mod modal;
pub mod models;
pub mod notification;
pub mod store;
pub mod sync;
pub mod ui;
