mod sheet;

pub use sheet::CitySheet;
