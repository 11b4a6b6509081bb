//! Goals are monthly targets: an overall spending cap, a net-savings target,
//! or a per-category spending cap, optionally pinned to a specific month.

mod core;
mod create;
mod delete;
mod edit;
mod list;

pub use self::core::{
    Goal, GoalId, GoalKind, GoalRow, NewGoal, create_goal, create_goal_table, delete_goal, get_goal,
    get_goal_rows, get_goals_for_month, update_goal,
};
pub use self::create::{create_goal_endpoint, get_new_goal_page};
pub use self::delete::delete_goal_endpoint;
pub use self::edit::{get_edit_goal_page, update_goal_endpoint};
pub use self::list::get_goals_page;
