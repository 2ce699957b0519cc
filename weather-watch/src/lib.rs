//! Multi-station rain and freeze decision engine.
//!
//! Answers "is it raining, or about to freeze, here?" by consulting
//! several nearby weather stations and combining their observations
//! into one decision with an explainable confidence score, rather than
//! trusting a single point forecast.

pub mod classify;
pub mod domain;
pub mod engine;
pub mod http;
pub mod observations;
pub mod settings;
pub mod stations;
pub mod web;
