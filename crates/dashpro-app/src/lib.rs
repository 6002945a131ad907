// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod container;
pub mod ids;
pub mod layout;
pub mod list_view;
pub mod model;
pub mod pipeline;
pub mod prefs;
pub mod search;
pub mod state;
pub mod theme;
pub mod timer;
pub mod viewport;

pub use container::*;
pub use ids::*;
pub use layout::*;
pub use list_view::*;
pub use model::*;
pub use pipeline::*;
pub use prefs::*;
pub use search::*;
pub use state::*;
pub use theme::*;
pub use timer::*;
pub use viewport::*;
