//! Recipe scoring
//!
//! Scores recipe text against the hidden ingredient list. Each ingredient
//! that appears anywhere in the text counts once, no matter how often it is
//! repeated. Recipes whose raw score clears the combo threshold earn a
//! one-time bonus.

use tracing::debug;

/// Points awarded per secret ingredient found.
const SECRET_INGREDIENTS: &[(&str, i64)] = &[
    ("saffron", 50),
    ("white truffle", 60),
    ("wagyu", 55),
    ("caviar", 45),
    ("matsutake", 40),
    ("black garlic", 35),
    ("foie gras", 30),
    ("yuzu", 25),
    ("aged balsamic", 20),
    ("smoked paprika", 15),
    ("miso", 15),
    ("tahini", 10),
];

/// Raw score a recipe must exceed to earn the combo bonus.
const COMBO_THRESHOLD: i64 = 200;

/// Bonus points for clearing the combo threshold.
const COMBO_BONUS: i64 = 50;

/// Score recipe content against the secret ingredient list.
///
/// Matching is a case-insensitive substring scan: an ingredient counts once
/// if it appears anywhere, regardless of position or repetition. Empty
/// content scores zero.
pub fn score_recipe(content: &str) -> i64 {
    if content.is_empty() {
        return 0;
    }

    let haystack = content.to_lowercase();
    let mut total = 0i64;

    for &(ingredient, points) in SECRET_INGREDIENTS {
        if haystack.contains(ingredient) {
            debug!(ingredient = %ingredient, points = points, "Secret ingredient found");
            total += points;
        }
    }

    if total > COMBO_THRESHOLD {
        debug!(raw = total, bonus = COMBO_BONUS, "Combo bonus earned");
        total += COMBO_BONUS;
    }

    total
}
