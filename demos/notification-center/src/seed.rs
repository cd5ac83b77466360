//! Records present when the demo starts

use chrono::{Duration, Utc};
use edu_notify::{
    ActionDescriptor, Attachment, AttachmentKind, ButtonVariant, Category, MessageInput,
    MessageKind, MessageMetadata, Middleware, NotificationCenter, NotificationInput,
    NotificationMetadata, Priority, Sender, SenderKind, StoreAction,
};

/// Every action id used by seeded records.
pub const ACTION_IDS: [&str; 6] = [
    "view_student",
    "contact_parent",
    "schedule_meeting",
    "open_lesson",
    "acknowledge",
    "retry_sync",
];

pub fn seed_notifications() -> Vec<NotificationInput> {
    vec![
        NotificationInput::new(
            Category::System,
            Priority::Low,
            "Nightly backup complete",
            "All gradebooks were backed up successfully.",
        ),
        NotificationInput::new(
            Category::Content,
            Priority::Medium,
            "Lesson plan shared",
            "Ms. Okafor shared \"Photosynthesis, week 3\" with your department.",
        )
        .with_action(ActionDescriptor::new("open_lesson", "Open lesson"))
        .with_metadata(NotificationMetadata {
            content_id: Some("lesson-311".into()),
            content_title: Some("Photosynthesis, week 3".into()),
            ..Default::default()
        }),
        NotificationInput::new(
            Category::Class,
            Priority::Medium,
            "Quiz results are in",
            "Biology 9B averaged 78% on the cell structure quiz.",
        ),
        NotificationInput::new(
            Category::Ai,
            Priority::High,
            "Engagement dip detected",
            "Participation in Algebra 10A fell 30% over the last two weeks.",
        ),
        NotificationInput::new(
            Category::Student,
            Priority::High,
            "Repeated absences",
            "Jonah Reyes has missed four classes this month.",
        )
        .action_required()
        .with_action(ActionDescriptor::new("view_student", "View student"))
        .with_action(
            ActionDescriptor::new("contact_parent", "Contact parent")
                .variant(ButtonVariant::Secondary),
        )
        .with_metadata(NotificationMetadata {
            subject_id: Some("stu-2231".into()),
            subject_name: Some("Jonah Reyes".into()),
            ..Default::default()
        }),
    ]
}

pub fn seed_messages() -> Vec<MessageInput> {
    let now = Utc::now();
    vec![
        MessageInput::new(
            MessageKind::Error,
            Priority::High,
            "Gradebook sync failed",
            "Grades entered since 07:30 have not reached the district system.",
        )
        .from_sender(Sender::new(SenderKind::System, "Sync service"))
        .with_details("Upstream returned 503 three times in a row.")
        .with_action(
            ActionDescriptor::new("retry_sync", "Retry sync").variant(ButtonVariant::Danger),
        )
        .with_action(ActionDescriptor::new("acknowledge", "Acknowledge")),
        MessageInput::new(
            MessageKind::StudentAlert,
            Priority::High,
            "Student at risk",
            "Maya Chen's grades and attendance both dropped this term.",
        )
        .from_sender(Sender::new(SenderKind::Ai, "Insights"))
        .with_metadata(MessageMetadata {
            student_id: Some("stu-1187".into()),
            student_name: Some("Maya Chen".into()),
            class_name: Some("Algebra 10A".into()),
            risk_score: Some(0.82),
            deadline: Some(now + Duration::days(3)),
            ..Default::default()
        })
        .with_attachment(Attachment {
            id: "att-1".into(),
            name: "progress-report.pdf".into(),
            kind: AttachmentKind::File,
            locator: "reports/stu-1187/progress-report.pdf".into(),
            size: Some(48_213),
        })
        .requires_response()
        .with_action(ActionDescriptor::new("contact_parent", "Contact parent"))
        .with_action(
            ActionDescriptor::new("schedule_meeting", "Schedule meeting")
                .variant(ButtonVariant::Secondary),
        ),
    ]
}

/// Add the seed records, oldest first.
pub fn seed<M: Middleware<StoreAction>>(center: &mut NotificationCenter<M>) {
    for input in seed_notifications() {
        center.add_notification(input);
    }
    for input in seed_messages() {
        center.add_message(input);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_actions_are_known() {
        let notification_actions = seed_notifications().into_iter().flat_map(|n| n.actions);
        let message_actions = seed_messages().into_iter().flat_map(|m| m.actions);
        for action in notification_actions.chain(message_actions) {
            assert!(ACTION_IDS.contains(&action.id.as_str()), "{}", action.id);
        }
    }
}
