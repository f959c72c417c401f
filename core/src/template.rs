//! Predefined messages for quick composition.
//!
//! The catalog is static and immutable. Parents pick a template in the UI
//! and the dispatcher sends the descriptor it produces.

use crate::descriptor::MessageDescriptor;
use crate::error::{Error, Result};

/// An immutable catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub id: &'static str,
    pub title: &'static str,
    pub body: &'static str,
    pub icon: &'static str,
}

impl Template {
    /// Prefill a descriptor. The template id becomes the tag, so sending the
    /// same template twice replaces the earlier native notification.
    pub fn to_descriptor(&self) -> MessageDescriptor {
        MessageDescriptor::new(self.title, self.body)
            .with_tag(self.id)
            .with_icon(self.icon)
            .with_data("templateId", self.id)
    }
}

const CATALOG: &[Template] = &[
    Template {
        id: "reminder",
        title: "⏰ Lembrete",
        body: "Complete suas tarefas",
        icon: "⏰",
    },
    Template {
        id: "homework",
        title: "📚 Hora da lição",
        body: "Está na hora de fazer a lição de casa",
        icon: "📚",
    },
    Template {
        id: "tidy_room",
        title: "🧹 Arrumar o quarto",
        body: "Não esqueça de arrumar o seu quarto",
        icon: "🧹",
    },
    Template {
        id: "dinner",
        title: "🍽️ Jantar pronto",
        body: "O jantar está na mesa, venha comer!",
        icon: "🍽️",
    },
    Template {
        id: "bedtime",
        title: "🌙 Hora de dormir",
        body: "Escove os dentes e vá para a cama",
        icon: "🌙",
    },
    Template {
        id: "well_done",
        title: "⭐ Muito bem!",
        body: "Você completou todas as tarefas de hoje",
        icon: "⭐",
    },
    Template {
        id: "help_needed",
        title: "🙋 Preciso de ajuda",
        body: "Pode vir me ajudar com uma tarefa?",
        icon: "🙋",
    },
];

/// Every template, in display order.
pub fn all() -> &'static [Template] {
    CATALOG
}

/// Look up a template by id.
///
/// # Errors
///
/// Returns `Error::UnknownTemplate` if no entry has this id.
pub fn find(id: &str) -> Result<&'static Template> {
    CATALOG
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| Error::UnknownTemplate { id: id.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_template_is_a_valid_descriptor() {
        for template in all() {
            assert_eq!(
                template.to_descriptor().validate(),
                Ok(()),
                "template {} fails validation",
                template.id
            );
        }
    }

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = all().iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), all().len());
    }

    #[test]
    fn find_known_and_unknown() {
        assert_eq!(find("reminder").map(|t| t.title), Ok("⏰ Lembrete"));
        assert_eq!(
            find("nope"),
            Err(Error::UnknownTemplate { id: "nope".into() })
        );
    }

    #[test]
    fn descriptor_is_tagged_with_template_id() {
        let d = find("bedtime").unwrap().to_descriptor();
        assert_eq!(d.tag.as_deref(), Some("bedtime"));
        assert_eq!(d.require_interaction, None);
        assert_eq!(d.data.get("templateId").map(String::as_str), Some("bedtime"));
    }
}
