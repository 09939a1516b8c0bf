pub mod csv;
pub mod memory;

pub use csv::EscritorCsv;
pub use memory::CarregadorMemoria;
