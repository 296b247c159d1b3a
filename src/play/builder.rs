// src/play/builder.rs

//! Question set builder.
//!
//! Turns a game's content into the ordered, shuffled list of questions a
//! session walks through. Never fails: every `GameContent` yields a (possibly
//! empty) sequence.

use std::collections::HashSet;

use crate::{
    config::QUIZ_OPTION_COUNT,
    models::{
        game::{Categories, GameContent, TermPair},
        question::QuestionItem,
    },
    utils::rng::GameRng,
};

/// Builds a freshly shuffled question sequence for one session.
pub fn build(content: &GameContent, rng: &mut GameRng) -> Vec<QuestionItem> {
    match content {
        GameContent::Memory(pairs) | GameContent::Sequence(pairs) => {
            let mut items: Vec<QuestionItem> =
                pairs.iter().cloned().map(QuestionItem::Pair).collect();
            rng.shuffle(&mut items);
            items
        }
        GameContent::Quiz(pairs) => build_quiz(pairs, rng),
        GameContent::Dragdrop(categories) | GameContent::Classification(categories) => {
            let mut items = flatten_categories(categories);
            rng.shuffle(&mut items);
            items
        }
    }
}

/// The answer buttons offered for non-quiz questions.
///
/// Memory offers the definitions in session order, sequence in authored
/// order, category games offer the category names. Quiz questions carry their
/// own options, so this is empty for quizzes.
pub fn answer_choices(content: &GameContent, items: &[QuestionItem]) -> Vec<String> {
    match content {
        GameContent::Memory(_) => items
            .iter()
            .map(|item| item.correct_value().to_string())
            .collect(),
        GameContent::Sequence(pairs) => pairs.iter().map(|p| p.definition.clone()).collect(),
        GameContent::Dragdrop(categories) | GameContent::Classification(categories) => {
            categories.keys().cloned().collect()
        }
        GameContent::Quiz(_) => Vec::new(),
    }
}

fn build_quiz(pairs: &[TermPair], rng: &mut GameRng) -> Vec<QuestionItem> {
    let mut questions: Vec<QuestionItem> = pairs
        .iter()
        .map(|pair| {
            let correct = &pair.definition;

            // Distinct definitions other than the correct one, in authored order.
            let mut seen = HashSet::new();
            let mut wrong: Vec<String> = pairs
                .iter()
                .map(|p| &p.definition)
                .filter(|d| *d != correct && seen.insert(d.as_str()))
                .cloned()
                .collect();
            rng.shuffle(&mut wrong);
            wrong.truncate(QUIZ_OPTION_COUNT - 1);

            let mut options = Vec::with_capacity(wrong.len() + 1);
            options.push(correct.clone());
            options.extend(wrong);
            rng.shuffle(&mut options);

            QuestionItem::Choice {
                question: pair.term.clone(),
                correct_answer: correct.clone(),
                options,
            }
        })
        .collect();

    rng.shuffle(&mut questions);
    questions
}

fn flatten_categories(categories: &Categories) -> Vec<QuestionItem> {
    categories
        .iter()
        .flat_map(|(category, items)| {
            items.iter().map(move |item| QuestionItem::Categorize {
                item: item.clone(),
                correct_category: category.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(term: &str, definition: &str) -> TermPair {
        TermPair {
            term: term.to_string(),
            definition: definition.to_string(),
        }
    }

    fn capitals() -> Vec<TermPair> {
        vec![
            pair("France", "Paris"),
            pair("Italy", "Rome"),
            pair("Spain", "Madrid"),
            pair("Germany", "Berlin"),
            pair("Portugal", "Lisbon"),
            pair("Austria", "Vienna"),
        ]
    }

    #[test]
    fn quiz_options_contain_correct_answer_once() {
        for seed in 0..25 {
            let items = build(&GameContent::Quiz(capitals()), &mut GameRng::new(seed));
            assert_eq!(items.len(), 6);
            for item in &items {
                let QuestionItem::Choice {
                    correct_answer,
                    options,
                    ..
                } = item
                else {
                    panic!("quiz produced a non-choice item");
                };
                assert_eq!(options.len(), QUIZ_OPTION_COUNT);
                assert_eq!(options.iter().filter(|o| *o == correct_answer).count(), 1);
            }
        }
    }

    #[test]
    fn quiz_correct_answer_is_the_terms_definition() {
        let items = build(&GameContent::Quiz(capitals()), &mut GameRng::new(11));
        for item in items {
            if let QuestionItem::Choice {
                question,
                correct_answer,
                ..
            } = item
            {
                let source = capitals().into_iter().find(|p| p.term == question).unwrap();
                assert_eq!(source.definition, correct_answer);
            }
        }
    }

    #[test]
    fn quiz_with_duplicate_definitions_has_fewer_distinct_options() {
        let pairs = vec![
            pair("a", "same"),
            pair("b", "same"),
            pair("c", "other"),
            pair("d", "same"),
        ];
        let items = build(&GameContent::Quiz(pairs), &mut GameRng::new(5));
        for item in items {
            let QuestionItem::Choice {
                correct_answer,
                options,
                ..
            } = item
            else {
                panic!("expected choice");
            };
            assert_eq!(options.len(), 2);
            let distinct: HashSet<&String> = options.iter().collect();
            assert_eq!(distinct.len(), options.len());
            assert_eq!(options.iter().filter(|o| **o == correct_answer).count(), 1);
        }
    }

    #[test]
    fn quiz_with_single_distinct_definition_offers_only_the_answer() {
        let pairs = vec![pair("a", "x"), pair("b", "x"), pair("c", "x")];
        let items = build(&GameContent::Quiz(pairs), &mut GameRng::new(1));
        for item in items {
            if let QuestionItem::Choice { options, .. } = item {
                assert_eq!(options, vec!["x".to_string()]);
            }
        }
    }

    #[test]
    fn quiz_with_three_pairs_has_three_options() {
        let pairs = vec![pair("a", "1"), pair("b", "2"), pair("c", "3")];
        let items = build(&GameContent::Quiz(pairs), &mut GameRng::new(2));
        for item in items {
            if let QuestionItem::Choice { options, .. } = item {
                assert_eq!(options.len(), 3);
            }
        }
    }

    #[test]
    fn memory_is_a_permutation_of_the_pairs() {
        let items = build(&GameContent::Memory(capitals()), &mut GameRng::new(9));
        let mut terms: Vec<&str> = items.iter().map(|i| i.prompt()).collect();
        terms.sort_unstable();
        let mut expected: Vec<String> = capitals().into_iter().map(|p| p.term).collect();
        expected.sort_unstable();
        assert_eq!(terms, expected);
        assert!(items.iter().all(|i| matches!(i, QuestionItem::Pair(_))));
    }

    #[test]
    fn classification_flattens_every_item() {
        let categories = Categories::from([
            ("A".to_string(), vec!["x".to_string(), "y".to_string()]),
            ("B".to_string(), vec!["z".to_string()]),
        ]);
        for seed in 0..10 {
            let items = build(
                &GameContent::Classification(categories.clone()),
                &mut GameRng::new(seed),
            );
            assert_eq!(items.len(), 3);
            for item in &items {
                let QuestionItem::Categorize {
                    item,
                    correct_category,
                } = item
                else {
                    panic!("expected categorize");
                };
                let expected = if item == "z" { "B" } else { "A" };
                assert_eq!(correct_category, expected);
            }
        }
    }

    #[test]
    fn answer_choices_per_type() {
        let categories = Categories::from([
            ("Fruit".to_string(), vec!["Apple".to_string()]),
            ("Veg".to_string(), vec!["Leek".to_string()]),
        ]);
        let content = GameContent::Dragdrop(categories);
        let items = build(&content, &mut GameRng::new(0));
        assert_eq!(answer_choices(&content, &items), vec!["Fruit", "Veg"]);

        let content = GameContent::Sequence(capitals());
        let items = build(&content, &mut GameRng::new(0));
        let choices = answer_choices(&content, &items);
        assert_eq!(choices[0], "Paris");
        assert_eq!(choices.len(), 6);

        let content = GameContent::Memory(capitals());
        let items = build(&content, &mut GameRng::new(0));
        let choices = answer_choices(&content, &items);
        assert_eq!(choices[0], items[0].correct_value());

        let content = GameContent::Quiz(capitals());
        let items = build(&content, &mut GameRng::new(0));
        assert!(answer_choices(&content, &items).is_empty());
    }
}
