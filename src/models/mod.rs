mod discrepancy;
mod reading;
mod weather;

pub use discrepancy::*;
pub use reading::*;
pub use weather::*;
