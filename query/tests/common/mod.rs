#![allow(dead_code)]

mod search;
pub use search::*;

pub use cantus_query::*;
pub use log::*;
pub use std::sync::Arc;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
