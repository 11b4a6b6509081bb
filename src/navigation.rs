//! This file defines the templates and a convenience function for creating the navigation bar.

use maud::{Markup, html};

use crate::endpoints;

/// Template for a link in the navigation bar.
///
/// It will change appearance if `is_current` is set to `true`. Only one link
/// should be set as active at any one time.
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let class = if self.is_current {
            "nav-link nav-link-active"
        } else {
            "nav-link"
        };

        html!( a href=(self.url) class=(class) { (self.title) } )
    }
}

/// Get the navigation bar.
///
/// If a link matches `active_endpoint`, then that link will be marked as
/// active and displayed differently in the HTML.
pub fn nav_bar(active_endpoint: &str) -> Markup {
    let entries = [
        (endpoints::DASHBOARD_VIEW, "Dashboard"),
        (endpoints::TRANSACTIONS_VIEW, "Transactions"),
        (endpoints::CATEGORIES_VIEW, "Categories"),
        (endpoints::ACCOUNTS_VIEW, "Accounts"),
        (endpoints::GOALS_VIEW, "Goals"),
        (endpoints::SCORE_VIEW, "Score"),
        (endpoints::IMPORT_VIEW, "Import"),
    ];

    let links = entries.map(|(url, title)| Link {
        url,
        title,
        is_current: active_endpoint == url,
    });

    html! {
        nav class="nav-bar"
        {
            span class="nav-brand" { "Dinheiro" }

            @for link in links {
                (link.into_html())
            }

            form class="nav-log-out" method="post" action=(endpoints::LOG_OUT)
            {
                button type="submit" class="link-button" { "Log out" }
            }
        }
    }
}
