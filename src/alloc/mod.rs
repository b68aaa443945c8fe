pub mod rng;
pub mod shim;
pub mod upstream;
