pub mod doc;
pub mod theme;
