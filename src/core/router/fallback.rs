//! Static fallback strategies
//!
//! Applied by callers when routing is exhausted; the router itself never
//! invents a response.

use crate::core::types::UseCase;

/// Terminal strategy producing text when every candidate failed
pub trait StaticFallback: Send + Sync {
    fn respond(&self, use_case: UseCase, prompt: &str) -> String;
}

/// Canned prose per use case
#[derive(Debug, Clone, Default)]
pub struct CannedFallback;

impl CannedFallback {
    pub fn new() -> Self {
        Self
    }
}

impl StaticFallback for CannedFallback {
    fn respond(&self, use_case: UseCase, _prompt: &str) -> String {
        let text = match use_case {
            UseCase::Chatbot => {
                "I'm having trouble reaching our AI services right now. Please try again in a few minutes."
            }
            UseCase::Assessment => {
                "Your responses have been saved. A detailed assessment could not be generated at this moment; please check back shortly."
            }
            UseCase::Search => {
                "Search assistance is temporarily unavailable. Try refining your query or searching again in a moment."
            }
            UseCase::Analysis => {
                "The analysis could not be completed because our AI services are temporarily unavailable. Please retry later."
            }
            UseCase::CreativeVision => {
                "Start by naming the feeling you want people to leave with, then collect three images that carry it. Build your vision from what those images share."
            }
            UseCase::CreativeWriting => {
                "Begin with a single concrete moment: where you are, what you notice, and what changes. Write it plainly first, then revise for rhythm and detail."
            }
            UseCase::CreativeSocial => {
                "Share one honest story behind your work, add a clear call to action, and invite your audience to respond with their own experience."
            }
            UseCase::General => {
                "Our AI services are temporarily unavailable. Please try again shortly."
            }
        };
        text.to_string()
    }
}
