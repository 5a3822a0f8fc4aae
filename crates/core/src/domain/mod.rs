pub mod event;
pub mod history;
pub mod market;
pub mod preference;
pub mod property;
