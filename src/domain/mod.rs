//! Domain layer containing business entities and the click pipeline.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click tracking event model
//! - [`click_queue`] - Bounded queue between handlers and workers
//! - [`click_worker`] - Background worker pool persisting clicks
//!
//! # Click Processing Flow
//!
//! 1. HTTP handler resolves the short code
//! 2. [`click_event::ClickEvent`] is handed to the click ingestor
//! 3. The event is queued without waiting, or dropped if the queue is full
//! 4. A [`click_worker::ClickWorkerPool`] worker persists it via [`repositories::ClickRepository`]

pub mod click_event;
pub mod click_queue;
pub mod click_worker;
pub mod entities;
pub mod repositories;
