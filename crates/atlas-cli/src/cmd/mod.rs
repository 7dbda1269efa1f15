pub mod board;
pub mod check;
pub mod create;
pub mod guide;
pub mod list;
pub mod show;
pub mod update;
