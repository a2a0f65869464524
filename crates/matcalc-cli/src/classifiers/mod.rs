pub mod classify;
pub mod create;
pub mod train;
