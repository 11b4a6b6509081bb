//! Score rules: per-category monthly spending limits with a warning
//! threshold, shown as a monthly traffic-light report.

mod core;
mod create;
mod delete;
mod edit;
mod page;

pub use self::core::{
    ScoreRule, ScoreRuleId, ScoreStatus, classify_spending, create_score_rule_table,
    delete_score_rule, get_active_rules_with_categories, get_score_rule, update_score_rule,
    upsert_score_rule,
};
pub use self::create::{create_score_rule_endpoint, get_new_score_rule_page};
pub use self::delete::delete_score_rule_endpoint;
pub use self::edit::{get_edit_score_rule_page, update_score_rule_endpoint};
pub use self::page::get_score_page;
