//! One request/response turn against the generative model.
//!
//! offline check → code verification → prompt assembly → model call
//! (search enabled) → reply normalization.
//!
//! Every failure path degrades to a fixed reply; nothing here returns an
//! error to the caller and nothing is retried.

use std::rc::Rc;

use clarity_types::{
    config::ClarityConfig,
    message::{Attachment, Message, Sender},
    reply::HealthReply,
};

use crate::lookup::{verify_code, VerifiedFact};
use crate::normalize::normalize_reply;
use crate::ports::*;
use crate::prompt::compose_prompt;

pub struct Orchestrator {
    config: ClarityConfig,
    model: Rc<dyn GenerativeModelPort>,
    registry: Rc<dyn CodeRegistryPort>,
    connectivity: Rc<dyn ConnectivityPort>,
}

/// Reply plus the registry fact it was grounded in, if any
#[derive(Debug, Clone)]
pub struct Orchestrated {
    pub reply: HealthReply,
    pub fact: Option<VerifiedFact>,
}

impl Orchestrator {
    pub fn new(
        config: ClarityConfig,
        model: Rc<dyn GenerativeModelPort>,
        registry: Rc<dyn CodeRegistryPort>,
        connectivity: Rc<dyn ConnectivityPort>,
    ) -> Self {
        Self {
            config,
            model,
            registry,
            connectivity,
        }
    }

    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }

    pub async fn respond(
        &self,
        user_text: &str,
        history: &[Message],
        attachment: Option<&Attachment>,
    ) -> HealthReply {
        self.orchestrate(user_text, history, attachment).await.reply
    }

    pub async fn orchestrate(
        &self,
        user_text: &str,
        history: &[Message],
        attachment: Option<&Attachment>,
    ) -> Orchestrated {
        if !self.connectivity.is_online() {
            log::info!("Offline, skipping model call");
            return Orchestrated {
                reply: HealthReply::offline(),
                fact: None,
            };
        }

        // OCR text from an uploaded bill is never a code
        let fact = match attachment {
            Some(_) => None,
            None => verify_code(user_text, self.registry.as_ref()).await,
        };

        let mut parts = vec![Part::Text(compose_prompt(user_text, fact.as_ref()))];
        if let Some(att) = attachment {
            parts.push(Part::InlineData(att.clone()));
        }

        let req = GenerateRequest {
            model: self.config.model.model.clone(),
            system_instruction: Some(self.config.system_instruction.clone()),
            history: history_turns(history),
            parts,
            enable_search: true,
        };

        let reply = match self.model.generate(req).await {
            Ok(raw) => normalize_reply(&raw),
            Err(e) => {
                log::error!("Model call failed: {}", e);
                HealthReply::unavailable()
            }
        };

        Orchestrated { reply, fact }
    }
}

/// Prior messages as role-tagged text turns. Placeholders and messages
/// without text are left out.
pub fn history_turns(messages: &[Message]) -> Vec<Turn> {
    messages
        .iter()
        .filter(|m| !m.is_thinking && !m.text.is_empty())
        .map(|m| Turn {
            role: match m.sender {
                Sender::User => TurnRole::User,
                Sender::Ai => TurnRole::Model,
            },
            parts: vec![Part::Text(m.text.clone())],
        })
        .collect()
}
