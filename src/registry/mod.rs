//! Registry module for Docker registry interactions
//!
//! This module provides credential handling and client logic for the Docker
//! Registry HTTP API v2 endpoints used to list and delete images.

pub mod auth;
pub mod client;
pub mod operations;
pub mod token_manager;

pub use auth::{
    CredentialProvider, CredentialRequest, HttpCredentialProvider, Permission,
    RegistryCredential, StaticCredentialProvider,
};
pub use client::{RegistryClient, RegistryClientBuilder};
pub use token_manager::CredentialManager;
