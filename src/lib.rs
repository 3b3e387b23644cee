//! Tint Funnel API Library
//!
//! Lead-capture backend for the window-tint SaaS marketing site: form
//! handlers that score and attribute leads, then forward them to the CRM,
//! automation, scheduling, notification and search services.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `dispatcher`: Concurrent automation fan-out with all-settle semantics.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers and shared state.
//! - `integrations`: External service adapters (HubSpot, Zapier, Calendly, Slack, SMS, search).
//! - `models`: Lead, integration and request/response models.
//! - `routes`: Router assembly and HTTP middleware.
//! - `scoring`: Lead scoring.
//! - `utm`: UTM attribution from referer URLs.
//! - `webhook_handler`: Chat-widget webhook handler.

pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod handlers;
pub mod integrations;
pub mod models;
pub mod routes;
pub mod scoring;
pub mod utm;
pub mod webhook_handler;
