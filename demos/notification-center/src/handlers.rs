//! Action effects registered by the demo
//!
//! Each handler just waits a moment and logs, standing in for a mailer,
//! calendar or gradebook call.

use std::time::Duration;

use edu_notify::{ActionContext, ActionError, ActionRegistry};

/// Simulated latency of every demo effect.
pub const EFFECT_LATENCY: Duration = Duration::from_millis(800);

async fn simulate(ctx: &ActionContext) {
    tokio::time::sleep(EFFECT_LATENCY).await;
    tracing::info!(
        record = %ctx.record,
        action = %ctx.action,
        kind = ?ctx.record_kind,
        "Demo effect done"
    );
}

pub fn register_demo_actions(registry: &mut ActionRegistry) {
    for action in [
        "view_student",
        "contact_parent",
        "schedule_meeting",
        "open_lesson",
        "acknowledge",
    ] {
        registry.register(action, |ctx: ActionContext| async move {
            simulate(&ctx).await;
            Ok::<(), ActionError>(())
        });
    }

    // Always fails, to show the error affordance
    registry.register("retry_sync", |ctx: ActionContext| async move {
        simulate(&ctx).await;
        Err::<(), ActionError>(ActionError::failed("gradebook is still unreachable"))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers_every_seeded_action() {
        let mut registry = ActionRegistry::new();
        register_demo_actions(&mut registry);
        for action in crate::seed::ACTION_IDS {
            assert!(registry.contains(action), "missing handler for {action}");
        }
    }
}
