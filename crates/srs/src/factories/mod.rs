pub mod crs_factory;
pub mod derived_bn254_crs_factory;
pub mod file_bn254_crs_factory;
pub mod mem_bn254_crs_factory;

pub use crs_factory::{Bn254Crs, Bn254CrsFactory};
pub use derived_bn254_crs_factory::DerivedBn254CrsFactory;
pub use file_bn254_crs_factory::FileBn254CrsFactory;
pub use mem_bn254_crs_factory::{MemBn254Crs, MemBn254CrsFactory};
