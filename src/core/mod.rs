// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! CPU-agnostic primitives: errors, word formatting, the operation table,
//! instruction encoding, line scanning, and the word memory spaces.

pub mod encoder;
pub mod error;
pub mod memspace;
pub mod optable;
pub mod scanner;
pub mod word;
