//! API request handlers

mod compare;
mod dashboard;
mod db;
mod exports;
mod health;
mod meta;
mod pages;
mod reports;
mod search;

pub use compare::*;
pub use dashboard::*;
pub use db::*;
pub use exports::*;
pub use health::*;
pub use meta::*;
pub use pages::*;
pub use reports::*;
pub use search::*;
