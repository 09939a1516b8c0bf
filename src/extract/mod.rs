pub mod csv;

pub use csv::LeitorCsv;
