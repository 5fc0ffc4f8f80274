pub mod imodpoly;

pub use imodpoly::{BaselineConfig, BaselineFit, MatrixCorrection, correct_matrix, subtract_baseline};
