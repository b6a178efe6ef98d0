//! Shared form fields for the expense create and edit pages.

use maud::{Markup, html};
use time::Date;

use crate::{
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    money::Currency,
};

use super::domain::ExpenseCategory;

/// The category select value that asks the keyword heuristic to pick.
pub(super) const AUTO_CATEGORY_VALUE: &str = "auto";

pub(super) struct ExpenseFormDefaults<'a> {
    pub amount: Option<f64>,
    pub date: Date,
    pub description: Option<&'a str>,
    pub category: Option<&'a ExpenseCategory>,
    pub currency: Currency,
    /// Offer the "Suggest automatically" category option. Only the create
    /// form does; edits keep the user's explicit choice.
    pub offer_auto_category: bool,
}

pub(super) fn expense_form_fields(defaults: &ExpenseFormDefaults<'_>) -> Markup {
    let amount_str = defaults.amount.map(|amount| format!("{amount:.2}"));

    html! {
        div class="grid grid-cols-2 gap-4"
        {
            div
            {
                label
                    for="amount"
                    class=(FORM_LABEL_STYLE)
                {
                    "Amount"
                }

                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    required
                    value=[amount_str.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label
                    for="currency"
                    class=(FORM_LABEL_STYLE)
                {
                    "Currency"
                }

                select
                    name="currency"
                    id="currency"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for currency in Currency::ALL {
                        option
                            value=(currency.code())
                            selected[currency == defaults.currency]
                        {
                            (currency.symbol()) " " (currency.name())
                        }
                    }
                }
            }
        }

        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Description"
            }

            input
                name="description"
                id="description"
                type="text"
                placeholder="What did you spend on?"
                required
                value=[defaults.description]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="category"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            select
                name="category"
                id="category"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @if defaults.offer_auto_category {
                    option value=(AUTO_CATEGORY_VALUE) { "Suggest automatically" }
                }

                @for category in &ExpenseCategory::FIXED {
                    option
                        value=(category.label())
                        selected[Some(category) == defaults.category]
                    {
                        (category.label())
                    }
                }
            }
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
