// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: landmark points and trajectory samples.

pub mod landmark;
pub mod sample;
