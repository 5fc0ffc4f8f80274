pub mod polyfit;

pub use polyfit::{Polynomial, polyfit};
