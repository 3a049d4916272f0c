//! Human-readable summary of a successful bridge call

use application::BridgeOutcome;

/// Render the success report printed to stdout
pub fn render(outcome: &BridgeOutcome) -> String {
    let mut out = String::from("Library call succeeded.\n");
    out.push_str(&format!(
        "- Message ID: {}\n",
        outcome.message_id.as_deref().unwrap_or("<none>")
    ));
    out.push_str(&format!(
        "- Login required: {}\n",
        if outcome.requires_qr { "yes" } else { "no" }
    ));

    if !outcome.last_messages.is_empty() {
        out.push_str("- Session messages:\n");
        for (index, message) in outcome.last_messages.iter().enumerate() {
            out.push_str(&format!("  {}) {message}\n", index + 1));
        }
    }

    out
}
