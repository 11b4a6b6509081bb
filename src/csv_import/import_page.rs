//! The CSV upload page.

use axum::response::{IntoResponse, Response};
use axum_extra::extract::PrivateCookieJar;
use maud::html;

use crate::{endpoints, flash::take_flash, html::page};

/// Display the CSV import form.
pub async fn get_import_page(jar: PrivateCookieJar) -> Response {
    let (jar, flash) = take_flash(jar);

    let content = html! {
        form method="post" action=(endpoints::IMPORT_VIEW) enctype="multipart/form-data" class="entity-form"
        {
            div class="field"
            {
                label for="file" { "CSV file" }
                input type="file" id="file" name="file" accept=".csv,text/csv";
            }

            button type="submit" class="button" { "Import" }
        }

        section class="import-help"
        {
            h2 { "Expected format" }
            p
            {
                "A header row with the columns date, description, type and amount "
                "(category and account are optional). Comma and semicolon delimiters "
                "are both accepted, as are the Portuguese column names data, descricao, "
                "tipo, valor, categoria and conta."
            }
            p { "Rows that cannot be parsed are skipped; the rest are imported together." }
        }
    };

    (
        jar,
        page("Import Transactions", endpoints::IMPORT_VIEW, &flash, &[], &content),
    )
        .into_response()
}
