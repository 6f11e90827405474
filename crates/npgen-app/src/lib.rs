// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod catalog;
pub mod digits;
pub mod model;
pub mod state;

pub use catalog::*;
pub use digits::*;
pub use model::*;
pub use state::*;
