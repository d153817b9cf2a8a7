//! # Furniture Recommender
//!
//! Asks a Gemini vision model on Vertex AI which of four chairs suits a living room,
//! and serves the answer from a small web page.
//!
//! ## Overview
//!
//! A request flows through:
//! - **PromptBuilder** - Binds the scene images into the fixed instruction template
//! - **Request transform** - Prompt + generation config to the `generateContent` wire format
//! - **Provider** - Vertex AI client yielding response fragments (streamed or unary)
//! - **ResponseAggregator** - Joins fragment text in arrival order, tolerating fragments without text
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use furniture_recommender::{AppConfig, Recommender, scene::Scene};
//!
//! # async fn run() -> furniture_recommender::Result<()> {
//! let config = AppConfig::from_env()?;
//! config.validate()?;
//!
//! let recommender = Recommender::from_config(&config)?;
//! let prompt = Scene::living_room().prompt()?;
//! let recommendation = recommender.recommend(&prompt, &config.generation).await?;
//! println!("{}", recommendation.response);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Configuration loading and validation
//! - [`error`] - Error types and handling
//! - [`prompt`] - Prompt content items and the template builder
//! - [`streaming`] - Fragment parsing and aggregation
//! - [`transform`] - Wire request construction and validation
//! - [`handler`] - HTTP routes

pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod metrics;
pub mod models;
pub mod prompt;
pub mod provider;
pub mod recommend;
pub mod scene;
pub mod streaming;
pub mod transform;

pub use config::AppConfig;
pub use error::{RecommenderError, Result};
pub use prompt::{ContentItem, ImageRef, Prompt, PromptBuilder};
pub use recommend::{Recommendation, Recommender};
pub use streaming::{AggregatedResponse, ResponseAggregator, ResponseFragment};
