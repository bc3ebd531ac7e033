pub mod chance_sampling;
