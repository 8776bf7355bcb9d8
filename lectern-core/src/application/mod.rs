//! Application layer: the unit-of-work façade and the services that
//! orchestrate ports into the platform's operations.

pub mod services;
pub mod unit_of_work;
