pub mod modal;
pub mod not_found;
