//! # drumsweep Core Library
//!
//! Drives a LAMMPS rotating-drum simulation through a parameter sweep over the
//! drum's rotation period. The physics lives entirely inside the engine; this
//! crate only decides which commands are sent, in which order, and what happens
//! when the engine refuses one.
//!
//! ## Layout
//!
//! - **[`core`]: The Vocabulary.** Typed engine commands and the filename
//!   templates that interpolate the sweep value.
//!
//! - **[`engine`]: The Collaborator.** The [`engine::Engine`] trait plus its
//!   implementations: a live `lmp` child process, an input-script writer, and an
//!   in-memory recorder. Also holds the sweep configuration, its errors and the
//!   progress reporting hooks.
//!
//! - **[`workflows`]: The Public API.** The sweep itself: plan the command
//!   sequence for every period and execute it against an engine.

pub mod core;
pub mod engine;
pub mod workflows;
