// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod fetch;
pub mod filters;
pub mod forms;
pub mod ids;
pub mod model;
pub mod pager;
pub mod screen;
pub mod state;

pub use fetch::*;
pub use filters::*;
pub use forms::*;
pub use ids::*;
pub use model::*;
pub use pager::*;
pub use screen::*;
pub use state::*;
