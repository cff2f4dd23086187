// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod card;
pub mod doctor;
pub mod exporter;
pub mod fixed;
pub mod goals;
pub mod month;
pub mod session;
pub mod settings;
pub mod sync;
pub mod year;
