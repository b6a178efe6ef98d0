//! Shared form fields for the income create and edit pages.

use maud::{Markup, html};
use time::Date;

use crate::{
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    money::Currency,
};

use super::domain::IncomeCategory;

pub(super) struct IncomeFormDefaults<'a> {
    pub amount: Option<f64>,
    pub date: Date,
    pub description: Option<&'a str>,
    pub category: Option<&'a IncomeCategory>,
    pub currency: Currency,
}

pub(super) fn income_form_fields(defaults: &IncomeFormDefaults<'_>) -> Markup {
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
                placeholder="Where did the money come from?"
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
                @for category in &IncomeCategory::FIXED {
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
