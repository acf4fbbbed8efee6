pub mod config_model;
pub mod dto;
