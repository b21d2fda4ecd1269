pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::{AppError, ErrorResponse, Result};
pub use services::{
    FetchOrchestrator, InMemoryPathStore, PathAssembler, PathGenerator, QueryGenerator,
    RankingEngine,
};
