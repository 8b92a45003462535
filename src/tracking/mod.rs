// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation state: the click cycle, the recorded series and the loop
//! that drives them from frames and input events.

pub mod cycle;
pub mod driver;
pub mod recorder;
pub mod session;
