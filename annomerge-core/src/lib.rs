// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

//! Core merge engine for combining Label Studio exports and image archives
//! contributed by several team members into one deduplicated dataset.

pub mod an;
pub mod config;
pub mod constant;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod ut;
