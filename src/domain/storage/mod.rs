//! Storage-facing domain types shared by every repository

mod page;
mod probe;

pub use page::{Page, PAGE_SIZE};
pub use probe::StoreProbe;
