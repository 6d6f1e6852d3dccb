//! Plain-text rendering of command outcomes.

use std::fmt::Write as _;

use kindred_graph::PersonCard;
use kindred_types::Gender;

use crate::commands::Outcome;

const UNNAMED: &str = "(unnamed)";

/// Render an outcome for the terminal. The result has no trailing newline.
pub fn render(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Added(card) => format!("Added {}", detailed(card)),
        Outcome::Card(card) => detailed(card),
        Outcome::Cards(cards) if cards.is_empty() => String::from("No family members yet."),
        Outcome::Cards(cards) => cards.iter().map(headline).collect::<Vec<_>>().join("\n"),
        Outcome::Candidates(listed) if listed.is_empty() => String::from("No candidates."),
        Outcome::Candidates(listed) => listed
            .iter()
            .map(|(id, name)| format!("{} ({id})", display_name(name)))
            .collect::<Vec<_>>()
            .join("\n"),
        Outcome::Message(message) => message.clone(),
    }
}

fn display_name(name: &str) -> &str {
    if name.is_empty() { UNNAMED } else { name }
}

/// `Name [Gender] (id)`; the gender tag is omitted when unspecified.
fn headline(card: &PersonCard) -> String {
    let mut line = display_name(&card.name).to_owned();
    if card.gender != Gender::Unspecified {
        let _ = write!(line, " [{}]", card.gender);
    }
    let _ = write!(line, " ({})", card.id);
    line
}

fn detailed(card: &PersonCard) -> String {
    card.details
        .iter()
        .chain(&card.relationships)
        .fold(headline(card), |mut out, line| {
            let _ = write!(out, "\n  {line}");
            out
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindred_types::PersonId;

    fn card(name: &str, gender: Gender) -> PersonCard {
        PersonCard {
            id: PersonId::from("p1"),
            name: name.to_owned(),
            gender,
            details: vec![String::from("Born: 1900")],
            relationships: vec![String::from("Father: John Smith")],
        }
    }

    #[test]
    fn card_lists_details_then_relationships() {
        let text = render(&Outcome::Card(card("Ann Smith", Gender::Female)));
        assert_eq!(
            text,
            "Ann Smith [Female] (p1)\n  Born: 1900\n  Father: John Smith"
        );
    }

    #[test]
    fn unnamed_and_ungendered() {
        let mut bare = card("", Gender::Unspecified);
        bare.details.clear();
        bare.relationships.clear();
        assert_eq!(render(&Outcome::Card(bare.clone())), "(unnamed) (p1)");
        assert_eq!(render(&Outcome::Added(bare)), "Added (unnamed) (p1)");
    }

    #[test]
    fn empty_lists_have_messages() {
        assert_eq!(render(&Outcome::Cards(Vec::new())), "No family members yet.");
        assert_eq!(render(&Outcome::Candidates(Vec::new())), "No candidates.");
    }

    #[test]
    fn roster_is_one_line_per_person() {
        let text = render(&Outcome::Cards(vec![
            card("Ann Smith", Gender::Female),
            card("Bob Smith", Gender::Male),
        ]));
        assert_eq!(text, "Ann Smith [Female] (p1)\nBob Smith [Male] (p1)");
    }
}
