//! The fixed keyword heuristic that stands in for "AI" categorization.

use super::domain::ExpenseCategory;

/// Suggest a category for an expense description.
///
/// The keyword table is fixed; descriptions that match nothing fall back to
/// [ExpenseCategory::Other]. Matching is case-insensitive substring search.
pub fn suggest_category(description: &str) -> ExpenseCategory {
    let description = description.to_lowercase();
    let contains_any =
        |keywords: &[&str]| keywords.iter().any(|keyword| description.contains(keyword));

    if contains_any(&["coffee", "restaurant", "food", "lunch"]) {
        ExpenseCategory::FoodAndDining
    } else if contains_any(&["gas", "uber", "taxi"]) {
        ExpenseCategory::Transportation
    } else if contains_any(&["bill", "electric", "water"]) {
        ExpenseCategory::BillsAndUtilities
    } else {
        ExpenseCategory::Other
    }
}

#[cfg(test)]
mod suggest_tests {
    use crate::expense::ExpenseCategory;

    use super::suggest_category;

    #[test]
    fn food_keywords() {
        assert_eq!(
            suggest_category("Morning coffee"),
            ExpenseCategory::FoodAndDining
        );
        assert_eq!(
            suggest_category("LUNCH with friends"),
            ExpenseCategory::FoodAndDining
        );
        assert_eq!(
            suggest_category("Thai restaurant"),
            ExpenseCategory::FoodAndDining
        );
    }

    #[test]
    fn transport_keywords() {
        assert_eq!(
            suggest_category("Uber to the airport"),
            ExpenseCategory::Transportation
        );
        assert_eq!(suggest_category("gas refill"), ExpenseCategory::Transportation);
    }

    #[test]
    fn utilities_keywords() {
        assert_eq!(
            suggest_category("Electric bill March"),
            ExpenseCategory::BillsAndUtilities
        );
        assert_eq!(
            suggest_category("water charges"),
            ExpenseCategory::BillsAndUtilities
        );
    }

    #[test]
    fn unmatched_descriptions_fall_back_to_other() {
        assert_eq!(suggest_category("Birthday present"), ExpenseCategory::Other);
        assert_eq!(suggest_category(""), ExpenseCategory::Other);
    }

    #[test]
    fn first_matching_group_wins() {
        // "food" outranks "bill" when both appear.
        assert_eq!(
            suggest_category("food court bill"),
            ExpenseCategory::FoodAndDining
        );
    }
}
