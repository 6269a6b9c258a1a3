use std::collections::HashSet;

use super::knowledge::KnowledgeBase;
use super::sections::contains_any;

/// Foods recommended for the conditions mentioned in `text`.
///
/// Lists of every triggered condition are concatenated in table order with
/// duplicates dropped; the general list is used when nothing triggers.
pub fn recommend_foods(knowledge: &KnowledgeBase, text: &str) -> Vec<String> {
    let text_lower = text.to_lowercase();
    let mut seen = HashSet::new();

    let foods: Vec<String> = knowledge
        .diets
        .iter()
        .filter(|entry| contains_any(&text_lower, entry.triggers))
        .flat_map(|entry| entry.foods.iter())
        .filter(|food| seen.insert(**food))
        .map(|food| food.to_string())
        .collect();

    if foods.is_empty() {
        knowledge
            .general_diet
            .iter()
            .map(|food| food.to_string())
            .collect()
    } else {
        foods
    }
}

pub fn format_food_list(foods: &[String]) -> String {
    foods
        .iter()
        .map(|food| format!("• {food}"))
        .collect::<Vec<_>>()
        .join("\n")
}
