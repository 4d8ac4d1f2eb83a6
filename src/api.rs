//! HTTP surface for the skill webhook

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::skill::ProductionSkill;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub skill: Arc<ProductionSkill>,
}

impl AppState {
    pub fn new(skill: ProductionSkill) -> Self {
        Self {
            skill: Arc::new(skill),
        }
    }
}
