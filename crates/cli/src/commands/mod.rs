//! Menu command handlers

pub mod account;
pub mod customer;
pub mod storage;
