//! Operator-facing texts.

use tracer_core::TrackedTarget;

pub const GREETING: &str = "👋 Hello";
pub const MENU_LIST: &str = "📝 List";
pub const MENU_CLEAR: &str = "♻️ Clear List";
/// Leading tokens the menu buttons send.
pub const MENU_LIST_ALIAS: &str = "📝";
pub const MENU_CLEAR_ALIAS: &str = "♻️";

pub const NO_ARGUMENTS: &str = "ℹ️ No arguments";
pub const UNKNOWN_COMMAND: &str = "ℹ️ Unknown command";
pub const ERROR_OCCURRED: &str = "❌ Error occurred";

pub const LIST_EMPTY: &str = "📝 Tracing list is empty";
pub const CLEAR_EMPTY: &str = "ℹ️ Tracing list is empty";
pub const CLEARED: &str = "✅ Tracing list cleared";

pub const USER_IS_ONLINE: &str = "ℹ️ User is online";
pub const USER_ADDED_AGAIN: &str = "✅ User added again";
pub const ALREADY_ADDED: &str = "ℹ️ Already added";

pub const REPEAT_BUTTON: &str = "🔄 Repeat";
pub const REPEATED_BUTTON: &str = "ℹ️ Repeated";

/// `<label> (<first> <last>)`
pub fn describe(target: &TrackedTarget) -> String {
    format!(
        "{} ({} {})",
        target.label(),
        target.first_name,
        target.last_name
    )
}

pub fn added(target: &TrackedTarget) -> String {
    format!("✅ {} Added", describe(target))
}

pub fn already_added(target: &TrackedTarget) -> String {
    format!("ℹ️ {} Already added", describe(target))
}

/// Also the notification text when a tracked target shows up.
pub fn online(target: &TrackedTarget) -> String {
    format!("✉️ {} Online", describe(target))
}

pub fn not_found(arg: &str) -> String {
    format!("❌ {} Not found", arg)
}

pub fn removed(target: &TrackedTarget) -> String {
    format!("✅ {} Removed", describe(target))
}

pub fn not_in_list(arg: &str) -> String {
    format!("❌ {} Not found in tracing list", arg)
}

/// Numbered list in insertion order, or the empty-list text.
pub fn tracing_list(targets: &[TrackedTarget]) -> String {
    if targets.is_empty() {
        return LIST_EMPTY.to_string();
    }
    let mut text = String::from("📝 Tracing list\n\n");
    for (i, target) in targets.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, describe(target)));
    }
    text
}
