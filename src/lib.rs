pub mod classifier;
pub mod config;
pub mod context;
pub mod currency;
pub mod distance;
pub mod error;
pub mod form;
pub mod localize;
pub mod mutation;
pub mod navigation;
pub mod participants;
pub mod policy;
pub mod receipt;
pub mod resolver;
pub mod service;
pub mod transaction;
pub mod utils;
pub mod validator;
