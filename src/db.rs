pub mod notion;

pub use notion::{Notion, WatchRecord};
