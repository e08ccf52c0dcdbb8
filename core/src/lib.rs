//! Nave-Mãe console core: tenant registry, records stores, cross-tenant
//! metrics, the tenant access policy and the scenario harness.

pub mod config;
pub mod error;
pub mod fixture;
pub mod gate;
pub mod harness;
pub mod metrics;
pub mod name_generator;
pub mod policy;
pub mod records;
pub mod report;
pub mod rng;
pub mod store;
pub mod synthetic;
pub mod types;
