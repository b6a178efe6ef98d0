//! Card components for the dashboard's headline totals.

use maud::{Markup, html};

use crate::{
    aggregate::Totals,
    html::CARD_STYLE,
    money::{Currency, format_money},
};

/// Renders the three headline cards: total income, total expenses, and net
/// balance, with an overspending warning when the net is negative.
pub(super) fn totals_cards_view(totals: &Totals) -> Markup {
    let net_style = if totals.is_overspending() {
        "text-2xl font-bold text-red-600 dark:text-red-400"
    } else {
        "text-2xl font-bold text-green-600 dark:text-green-400"
    };

    html! {
        section class="w-full mx-auto mb-8"
        {
            div class="grid grid-cols-1 sm:grid-cols-3 gap-4"
            {
                div class=(CARD_STYLE)
                {
                    p class="text-sm text-gray-500 dark:text-gray-400" { "Total Income" }
                    p class="text-2xl font-bold text-green-600 dark:text-green-400"
                    {
                        (format_money(totals.income, Currency::Usd))
                    }
                }

                div class=(CARD_STYLE)
                {
                    p class="text-sm text-gray-500 dark:text-gray-400" { "Total Expenses" }
                    p class="text-2xl font-bold text-red-600 dark:text-red-400"
                    {
                        (format_money(totals.expenses, Currency::Usd))
                    }
                }

                div class=(CARD_STYLE)
                {
                    p class="text-sm text-gray-500 dark:text-gray-400" { "Net Balance" }
                    p class=(net_style)
                    {
                        (format_money(totals.net(), Currency::Usd))
                    }

                    @if totals.is_overspending() {
                        p class="text-xs text-red-600 dark:text-red-400 mt-1"
                        {
                            "You are spending more than you earn."
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod cards_tests {
    use scraper::Html;

    use crate::aggregate::Totals;

    use super::totals_cards_view;

    #[test]
    fn shows_formatted_totals() {
        let totals = Totals {
            income: 1000.0,
            expenses: 135.98,
        };

        let html = Html::parse_fragment(&totals_cards_view(&totals).into_string());
        let text = html.root_element().text().collect::<String>();

        assert!(text.contains("$1,000.00"));
        assert!(text.contains("$135.98"));
        assert!(text.contains("$864.02"));
        assert!(!text.contains("spending more than you earn"));
    }

    #[test]
    fn warns_when_overspending() {
        let totals = Totals {
            income: 0.0,
            expenses: 50.0,
        };

        let html = Html::parse_fragment(&totals_cards_view(&totals).into_string());
        let text = html.root_element().text().collect::<String>();

        assert!(text.contains("-$50.00"));
        assert!(text.contains("spending more than you earn"));
    }
}
