//! The filtered, paginated transactions page.

use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    account::{Account, get_accounts},
    category::{Category, get_categories},
    endpoints::{self, format_endpoint},
    flash::take_flash,
    html::{currency, page, select_input},
    money::parse_amount,
    pagination::{PaginationIndicator, create_pagination_indicators},
    transaction::{
        TransactionKind,
        form::DATE_FORMAT,
        query::{TransactionFilter, TransactionPageData, query_transactions},
    },
    user::UserID,
};

/// The query string parameters accepted by the transactions page.
///
/// Invalid values are ignored rather than rejected, so a stale or hand-edited
/// URL still renders the page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionListQuery {
    /// Filter by "credit" or "debit".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Filter by category ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    /// Filter by account ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Inclusive start date, `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Inclusive end date, `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Minimum amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<String>,
    /// Maximum amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<String>,
    /// 1-based page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
}

impl TransactionListQuery {
    fn to_filter(&self) -> TransactionFilter {
        let non_empty = |value: &Option<String>| -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };

        TransactionFilter {
            kind: non_empty(&self.kind).and_then(|kind| TransactionKind::parse(&kind)),
            category_id: non_empty(&self.category_id).and_then(|id| id.parse().ok()),
            account_id: non_empty(&self.account_id).and_then(|id| id.parse().ok()),
            start_date: non_empty(&self.start_date)
                .and_then(|date| Date::parse(&date, DATE_FORMAT).ok()),
            end_date: non_empty(&self.end_date)
                .and_then(|date| Date::parse(&date, DATE_FORMAT).ok()),
            min_amount: non_empty(&self.min_amount).and_then(|amount| parse_amount(&amount).ok()),
            max_amount: non_empty(&self.max_amount).and_then(|amount| parse_amount(&amount).ok()),
        }
    }

    fn page_url(&self, target_page: u64) -> String {
        let mut query = self.clone();
        query.page = Some(target_page.to_string());

        match serde_urlencoded::to_string(&query) {
            Ok(query_string) => format!("{}?{}", endpoints::TRANSACTIONS_VIEW, query_string),
            Err(_) => endpoints::TRANSACTIONS_VIEW.to_owned(),
        }
    }
}

/// Display one page of the user's transactions, filtered by the query string.
pub async fn get_transactions_page(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Query(query): Query<TransactionListQuery>,
) -> Response {
    let filter = query.to_filter();
    let page_number = query
        .page
        .as_deref()
        .and_then(|page| page.parse().ok())
        .unwrap_or(state.pagination_config.default_page);

    let (page_data, categories, accounts) = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        let page_data = match query_transactions(
            &filter,
            page_number,
            state.pagination_config.default_page_size,
            user_id,
            &connection,
        ) {
            Ok(page_data) => page_data,
            Err(error) => return error.into_response(),
        };

        let categories = match get_categories(user_id, &connection) {
            Ok(categories) => categories,
            Err(error) => return error.into_response(),
        };

        let accounts = match get_accounts(user_id, &connection) {
            Ok(accounts) => accounts,
            Err(error) => return error.into_response(),
        };

        (page_data, categories, accounts)
    };

    let (jar, flash) = take_flash(jar);

    let content = html! {
        div class="page-actions"
        {
            a href=(endpoints::NEW_TRANSACTION_VIEW) class="button" { "New transaction" }
            a href=(endpoints::IMPORT_VIEW) { "Import CSV" }
            a href=(endpoints::EXPORT_CSV) { "Export CSV" }
            a href=(endpoints::EXPORT_PDF) { "Export PDF" }
        }

        (filter_form(&query, &categories, &accounts))
        (transactions_table(&page_data))
        (pagination_row(&query, &page_data, state.pagination_config.max_pages))
    };

    (
        jar,
        page("Transactions", endpoints::TRANSACTIONS_VIEW, &flash, &[], &content),
    )
        .into_response()
}

fn filter_form(
    query: &TransactionListQuery,
    categories: &[Category],
    accounts: &[Account],
) -> Markup {
    let category_options: Vec<(String, String)> = categories
        .iter()
        .map(|category| (category.id.to_string(), category.name.clone()))
        .collect();
    let account_options: Vec<(String, String)> = accounts
        .iter()
        .map(|account| (account.id.to_string(), account.name.clone()))
        .collect();
    let kind_options = [
        ("credit".to_owned(), "Income".to_owned()),
        ("debit".to_owned(), "Expense".to_owned()),
    ];

    let value_of = |value: &Option<String>| value.clone().unwrap_or_default();

    html! {
        form method="get" action=(endpoints::TRANSACTIONS_VIEW) class="filter-form"
        {
            (select_input("Type", "kind", &kind_options, query.kind.as_deref(), Some("All")))
            (select_input(
                "Category",
                "category_id",
                &category_options,
                query.category_id.as_deref(),
                Some("All"),
            ))
            (select_input(
                "Account",
                "account_id",
                &account_options,
                query.account_id.as_deref(),
                Some("All"),
            ))

            div class="field"
            {
                label for="start_date" { "From" }
                input type="date" id="start_date" name="start_date" value=(value_of(&query.start_date));
            }
            div class="field"
            {
                label for="end_date" { "To" }
                input type="date" id="end_date" name="end_date" value=(value_of(&query.end_date));
            }
            div class="field"
            {
                label for="min_amount" { "Min amount" }
                input type="text" id="min_amount" name="min_amount" value=(value_of(&query.min_amount));
            }
            div class="field"
            {
                label for="max_amount" { "Max amount" }
                input type="text" id="max_amount" name="max_amount" value=(value_of(&query.max_amount));
            }

            button type="submit" class="button" { "Filter" }
            a href=(endpoints::TRANSACTIONS_VIEW) { "Clear" }
        }
    }
}

fn transactions_table(page_data: &TransactionPageData) -> Markup {
    html! {
        @if page_data.rows.is_empty() {
            p { "No transactions found." }
        } @else {
            table class="data-table"
            {
                thead
                {
                    tr
                    {
                        th { "Date" }
                        th { "Description" }
                        th { "Type" }
                        th { "Category" }
                        th { "Account" }
                        th class="amount" { "Amount" }
                        th { "" }
                    }
                }
                tbody
                {
                    @for row in &page_data.rows {
                        @let transaction = &row.transaction;
                        tr
                        {
                            td { (transaction.date) }
                            td { (transaction.description) }
                            td { (transaction.kind.label()) }
                            td { (row.category_name.as_deref().unwrap_or("-")) }
                            td { (row.account_name.as_deref().unwrap_or("-")) }
                            td class="amount" { (currency(transaction.kind.signed(transaction.amount))) }
                            td class="row-actions"
                            {
                                a href=(format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id)) { "Edit" }
                                form method="post" action=(format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id))
                                {
                                    button type="submit" class="link-button danger" { "Delete" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn pagination_row(
    query: &TransactionListQuery,
    page_data: &TransactionPageData,
    max_pages: u64,
) -> Markup {
    if page_data.page_count <= 1 {
        return html! {};
    }

    let indicators = create_pagination_indicators(page_data.page, page_data.page_count, max_pages);

    html! {
        nav class="pagination"
        {
            @for indicator in &indicators {
                @match indicator {
                    PaginationIndicator::BackButton(page) => {
                        a href=(query.page_url(*page)) { "Previous" }
                    }
                    PaginationIndicator::Page(page) => {
                        a href=(query.page_url(*page)) { (page) }
                    }
                    PaginationIndicator::CurrPage(page) => {
                        span class="current-page" { (page) }
                    }
                    PaginationIndicator::Ellipsis => {
                        span { "..." }
                    }
                    PaginationIndicator::NextButton(page) => {
                        a href=(query.page_url(*page)) { "Next" }
                    }
                }
            }
        }
    }
}
