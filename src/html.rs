//! Shared maud templates and formatting helpers used across pages.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, PreEscaped, html};
use numfmt::{Formatter, Precision};

use crate::{
    flash::{Flash, flash_banner},
    navigation::nav_bar,
};

/// An extra element to include in a page's `<head>`.
pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
}

/// The outermost HTML document shell.
pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Dinheiro" }
                link href="/static/main.css" rel="stylesheet";

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::ScriptLink(path) => script src=(path) {}
                    }
                }
            }

            body
            {
                (content)
            }
        }
    }
}

/// A page with the navigation bar and flash banner, for logged-in users.
pub fn page(
    title: &str,
    active_endpoint: &str,
    flash: &Option<Flash>,
    head_elements: &[HeadElement],
    content: &Markup,
) -> Markup {
    let body = html! {
        (nav_bar(active_endpoint))

        main class="page"
        {
            (flash_banner(flash))
            h1 { (title) }
            (content)
        }
    };

    base(title, head_elements, &body)
}

/// A centered page without navigation, for the log-in and registration forms.
pub fn auth_page(title: &str, flash: &Option<Flash>, content: &Markup) -> Markup {
    let body = html! {
        main class="page page-narrow"
        {
            (flash_banner(flash))
            h1 { (title) }
            (content)
        }
    };

    base(title, &[], &body)
}

/// A labelled text input.
pub fn text_input(label: &str, name: &str, input_type: &str, value: &str) -> Markup {
    html! {
        div class="field"
        {
            label for=(name) { (label) }
            input type=(input_type) id=(name) name=(name) value=(value);
        }
    }
}

/// A labelled select element. `selected` is compared against each option value.
pub fn select_input(
    label: &str,
    name: &str,
    options: &[(String, String)],
    selected: Option<&str>,
    empty_option: Option<&str>,
) -> Markup {
    html! {
        div class="field"
        {
            label for=(name) { (label) }
            select id=(name) name=(name)
            {
                @if let Some(placeholder) = empty_option {
                    option value="" { (placeholder) }
                }
                @for (value, text) in options {
                    option value=(value) selected[selected == Some(value.as_str())] { (text) }
                }
            }
        }
    }
}

/// An inline validation error shown above a form.
pub fn form_error(message: Option<&str>) -> Markup {
    html! {
        @if let Some(message) = message {
            p class="form-error" { (message) }
        }
    }
}

/// Format an amount as a currency string, e.g. "$1,234.50".
pub fn currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    let mut formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "$0.00".to_owned()
    };

    // numfmt omits the last trailing zero, so we must add it ourselves
    // For example, "12.30" is rendered as "12.3" so we append "0".
    if formatted_string.as_bytes()[formatted_string.len() - 3] != b'.' {
        formatted_string = format!("{formatted_string}0");
    }

    formatted_string
}

#[cfg(test)]
mod currency_tests {
    use super::currency;

    #[test]
    fn formats_positive_amounts() {
        assert_eq!(currency(1234.5), "$1,234.50");
        assert_eq!(currency(12.3), "$12.30");
    }

    #[test]
    fn formats_negative_amounts() {
        assert_eq!(currency(-42.0), "-$42.00");
    }

    #[test]
    fn formats_zero() {
        assert_eq!(currency(0.0), "$0.00");
    }
}
