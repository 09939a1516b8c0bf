pub mod hierarquia;

pub use hierarquia::MontadorHierarquia;
