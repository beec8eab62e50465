//! Research: never leave the labs idle.

use crate::error::AiError;
use crate::strategy::{Intents, Strategy, StrategyContext};

/// Starts the first available technology when nothing is being researched.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResearchStrategy;

impl Strategy for ResearchStrategy {
    fn name(&self) -> &'static str {
        "research"
    }

    fn run(&self, ctx: &StrategyContext<'_>, intents: &mut Intents) -> Result<(), AiError> {
        let research = &ctx.snapshot.research;
        if research.current.is_some() {
            return Ok(());
        }
        if let Some(tech) = research.available.first() {
            intents.start_research(tech.as_str());
        }
        Ok(())
    }
}
