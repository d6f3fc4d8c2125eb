pub mod alert;
pub mod quote;

pub use alert::{AlertRecord, Direction, NewAlert, TriggeredAlert};
pub use quote::{PriceMap, PriceQuote};
