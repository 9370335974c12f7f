//! Founder Onboarding API Library
//!
//! Backend for a founder-onboarding flow: company profile, document uploads,
//! notifications, support chat, an investability score, and mocked identity,
//! bank-data and cap-table integrations.
//!
//! # Modules
//!
//! - `api`: HTTP-facing handlers and routing.
//! - `core`: Scoring, validation, models and errors.
//! - `integrations`: Third-party capability traits and their mock providers.
//! - `config`: Configuration management.
//! - `db`: Database connection, pool and migrations.
//! - `db_storage`: Database storage operations.
//! - `demo`: Sample payloads for demo mode.
//! - `errors`: Error handling types.
//! - `files_handler`: Upload and listing of documents.
//! - `handlers`: Application state and onboarding handlers.
//! - `integrations_handler`: Provider-backed handlers.
//! - `models`: Core data models.
//! - `routes`: Router construction.
//! - `scoring`: Investability scoring.
//! - `user_context`: Caller identity extraction.
//! - `validation`: Request and upload validation.

pub mod api;
pub mod core;
pub mod integrations;

pub mod config;
pub mod db;
pub mod db_storage;
pub mod demo;
pub mod errors;
pub mod files_handler;
pub mod handlers;
pub mod integrations_handler;
pub mod models;
pub mod routes;
pub mod scoring;
pub mod user_context;
pub mod validation;
