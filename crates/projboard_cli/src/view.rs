//! Plain-text rendering of the in-memory element tree.

use projboard_core::{ElementSnapshot, MemoryRenderSink, ProjectStatus};
use std::fmt::Write;

const SHORT_ID_CHARS: usize = 8;

/// Renders both lists as text, cards in their rendered order.
pub fn render_board(sink: &MemoryRenderSink) -> String {
    let mut out = String::new();
    for kind in [ProjectStatus::Active, ProjectStatus::Finished] {
        let section_id = format!("{}-projects", kind.as_str());
        let Some(section) = sink.element_by_id(&section_id) else {
            continue;
        };
        let heading = section
            .find("h2")
            .map(|h2| h2.text.clone())
            .unwrap_or_default();
        let _ = writeln!(out, "== {heading} ==");

        let cards = section
            .find("ul")
            .map(|ul| ul.children.clone())
            .unwrap_or_default();
        if cards.is_empty() {
            let _ = writeln!(out, "  (empty)");
        }
        for card in &cards {
            render_card(&mut out, card);
        }
    }
    out
}

fn render_card(out: &mut String, card: &ElementSnapshot) {
    let text_of = |selector: &str| {
        card.find(selector)
            .map(|element| element.text.clone())
            .unwrap_or_default()
    };
    let id = card.id.as_deref().unwrap_or("?");
    let short: String = id.chars().take(SHORT_ID_CHARS).collect();
    let _ = writeln!(out, "  [{short}] {} - {}", text_of("h2"), text_of("h3"));
    let _ = writeln!(out, "      {}", text_of("p"));
}

#[cfg(test)]
mod tests {
    use super::render_board;
    use projboard_core::{
        BoardController, FormRules, MemoryForm, MemoryRenderSink, ProjectStore, RenderSink,
    };
    use std::rc::Rc;

    #[test]
    fn renders_headings_cards_and_empty_lists() {
        let store = Rc::new(ProjectStore::new());
        let sink = Rc::new(MemoryRenderSink::with_board_templates());
        let _board = BoardController::mount(
            Rc::clone(&store),
            Rc::clone(&sink) as Rc<dyn RenderSink>,
            Rc::new(MemoryForm::new()),
            FormRules::default(),
        )
        .unwrap();
        let id = store.add_project("Build API", "Write REST endpoints", 1);

        let text = render_board(&sink);
        let short: String = id.to_string().chars().take(8).collect();
        assert!(text.contains("== ACTIVE PROJECTS =="));
        assert!(text.contains(&format!("[{short}] Build API - 1 person assigned")));
        assert!(text.contains("      Write REST endpoints"));
        assert!(text.contains("== FINISHED PROJECTS ==\n  (empty)"));
    }
}
