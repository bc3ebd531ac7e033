pub mod error;
pub mod eval;
pub mod games;
pub mod solvers;
pub mod strategy;

pub use error::{
    LeducError,
    LeducResult,
};
pub use solvers::chance_sampling::train;
