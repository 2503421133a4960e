//! Business services spanning several tables

pub mod order;
