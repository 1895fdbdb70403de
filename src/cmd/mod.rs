pub mod extract;
pub mod output;
pub mod probe;
pub mod scan;
