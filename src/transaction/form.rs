//! The form fields shared by the create and edit transaction pages, and the
//! data those forms submit.

use maud::{Markup, html};
use serde::{Deserialize, Deserializer};
use time::Date;

use crate::{
    Error,
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    transaction::core::{TransactionPayload, TransactionType, parse_date},
};

/// The values to prefill the transaction form with.
pub struct TransactionFormDefaults<'a> {
    pub type_: TransactionType,
    pub amount: Option<f64>,
    pub date: Option<Date>,
    pub description: Option<&'a str>,
    pub category: Option<&'a str>,
    pub autofocus_amount: bool,
}

pub fn transaction_form_fields(defaults: &TransactionFormDefaults<'_>) -> Markup {
    let amount_str = defaults.amount.map(|amount| format!("{:.2}", amount.abs()));
    let date_str = defaults.date.map(|date| date.to_string());

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                @for type_ in [TransactionType::Expense, TransactionType::Income] {
                    @let id = format!("transaction-type-{}", type_.form_value());

                    div class="flex items-center gap-3"
                    {
                        input
                            name="type_"
                            id=(id)
                            type="radio"
                            value=(type_.form_value())
                            checked[type_ == defaults.type_]
                            required
                            tabindex="0"
                            class=(FORM_RADIO_INPUT_STYLE);

                        label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (type_.label()) }
                    }
                }
            }
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            // w-full needed to ensure input takes the full width when prefilled with a value
            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    placeholder="0.00"
                    min="0.01"
                    required
                    value=[amount_str.as_deref()]
                    autofocus[defaults.autofocus_amount]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id="date"
                type="date"
                value=[date_str.as_deref()]
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Description"
                value=[defaults.description]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="category" class=(FORM_LABEL_STYLE) { "Category" }

            input
                name="category"
                id="category"
                type="text"
                placeholder="Uncategorized"
                value=[defaults.category]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

/// The data submitted by the create and edit transaction forms.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionForm {
    /// Whether the money was earned or spent, "income" or "expense".
    pub type_: TransactionType,
    /// The value of the transaction in dollars.
    pub amount: f64,
    /// The date when the transaction occurred.
    #[serde(default, deserialize_with = "form_date")]
    pub date: Option<Date>,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: String,
    /// The category typed in by the user, if any.
    #[serde(default)]
    pub category: Option<String>,
}

impl TransactionForm {
    /// The request body for the finance API.
    ///
    /// The amount is always sent as a positive number, the type decides the
    /// direction of the money. Blank categories are sent as `null`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidAmount] if the amount is not a finite number.
    pub fn into_payload(self) -> Result<TransactionPayload, Error> {
        if !self.amount.is_finite() {
            return Err(Error::InvalidAmount(self.amount));
        }

        let category = self
            .category
            .map(|category| category.trim().to_owned())
            .filter(|category| !category.is_empty());

        Ok(TransactionPayload {
            description: self.description.trim().to_owned(),
            amount: self.amount.abs(),
            transaction_date: self.date,
            category,
            type_: self.type_,
        })
    }
}

fn form_date<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .as_deref()
        .and_then(parse_date))
}
