//! Notification and message records
//!
//! Records are owned by the store and handed to views as immutable snapshots.
//! Producers build a [`NotificationInput`] or [`MessageInput`]; the store
//! assigns the id and creation time.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier for a stored notification or message.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap an existing identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Origin tag of a notification. Only affects display grouping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    System,
    Ai,
    Student,
    Class,
    Content,
    Alert,
}

impl Category {
    /// Every category, in filter-tab order.
    pub const ALL: [Category; 6] = [
        Category::System,
        Category::Ai,
        Category::Student,
        Category::Class,
        Category::Content,
        Category::Alert,
    ];
}

/// Ordered priority: `Low < Medium < High < Critical`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// High and critical items count as urgent.
    pub fn is_urgent(self) -> bool {
        matches!(self, Priority::High | Priority::Critical)
    }
}

/// Kind of a message, driving icon, colour and modal treatment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Info,
    Warning,
    Error,
    Success,
    Announcement,
    AiInsight,
    StudentAlert,
    SystemUpdate,
}

/// Visual variant of an action button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Danger,
    Success,
}

/// An invokable action attached to a record.
///
/// The descriptor carries only an identifier; the effect itself is
/// registered with the dispatcher's `ActionRegistry` under the same id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub variant: ButtonVariant,
}

impl ActionDescriptor {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            variant: ButtonVariant::default(),
        }
    }

    pub fn variant(mut self, variant: ButtonVariant) -> Self {
        self.variant = variant;
        self
    }
}

/// Display-only context attached to a notification.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationMetadata {
    pub subject_id: Option<String>,
    pub subject_name: Option<String>,
    pub class_id: Option<String>,
    pub class_name: Option<String>,
    pub content_id: Option<String>,
    pub content_title: Option<String>,
}

/// A listable, read/dismiss-tracked event record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: RecordId,
    pub category: Category,
    pub priority: Priority,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
    pub action_required: bool,
    pub actions: Vec<ActionDescriptor>,
    pub metadata: Option<NotificationMetadata>,
}

/// Producer-side fields of a [`Notification`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotificationInput {
    pub category: Category,
    pub priority: Priority,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub action_required: bool,
    #[serde(default)]
    pub actions: Vec<ActionDescriptor>,
    #[serde(default)]
    pub metadata: Option<NotificationMetadata>,
}

impl NotificationInput {
    pub fn new(
        category: Category,
        priority: Priority,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            category,
            priority,
            title: title.into(),
            body: body.into(),
            action_required: false,
            actions: Vec::new(),
            metadata: None,
        }
    }

    pub fn action_required(mut self) -> Self {
        self.action_required = true;
        self
    }

    pub fn with_action(mut self, action: ActionDescriptor) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_metadata(mut self, metadata: NotificationMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub(crate) fn into_record(self, id: RecordId, created_at: DateTime<Utc>) -> Notification {
        Notification {
            id,
            category: self.category,
            priority: self.priority,
            title: self.title,
            body: self.body,
            created_at,
            is_read: false,
            action_required: self.action_required,
            actions: self.actions,
            metadata: self.metadata,
        }
    }
}

/// Who a message comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderKind {
    System,
    Ai,
    Teacher,
    Student,
    Admin,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub kind: SenderKind,
    pub name: String,
}

impl Sender {
    pub fn new(kind: SenderKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

/// Context attached to a message (student at risk, deadlines, ...).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageMetadata {
    pub student_id: Option<String>,
    pub student_name: Option<String>,
    pub class_id: Option<String>,
    pub class_name: Option<String>,
    pub risk_score: Option<f32>,
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    File,
    Link,
    Image,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub name: String,
    pub kind: AttachmentKind,
    /// URL or path of the attachment
    pub locator: String,
    #[serde(default)]
    pub size: Option<u64>,
}

/// A richer, single-focus event record shown in a modal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: RecordId,
    pub kind: MessageKind,
    pub priority: Priority,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub from: Option<Sender>,
    pub details: Option<String>,
    pub metadata: Option<MessageMetadata>,
    pub attachments: Vec<Attachment>,
    pub requires_response: bool,
    pub actions: Vec<ActionDescriptor>,
}

/// Producer-side fields of a [`Message`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MessageInput {
    pub kind: MessageKind,
    pub priority: Priority,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub from: Option<Sender>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub metadata: Option<MessageMetadata>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub requires_response: bool,
    #[serde(default)]
    pub actions: Vec<ActionDescriptor>,
}

impl MessageInput {
    pub fn new(
        kind: MessageKind,
        priority: Priority,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            priority,
            title: title.into(),
            body: body.into(),
            from: None,
            details: None,
            metadata: None,
            attachments: Vec::new(),
            requires_response: false,
            actions: Vec::new(),
        }
    }

    pub fn from_sender(mut self, sender: Sender) -> Self {
        self.from = Some(sender);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_metadata(mut self, metadata: MessageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn with_action(mut self, action: ActionDescriptor) -> Self {
        self.actions.push(action);
        self
    }

    pub fn requires_response(mut self) -> Self {
        self.requires_response = true;
        self
    }

    pub(crate) fn into_record(self, id: RecordId, created_at: DateTime<Utc>) -> Message {
        Message {
            id,
            kind: self.kind,
            priority: self.priority,
            title: self.title,
            body: self.body,
            created_at,
            from: self.from,
            details: self.details,
            metadata: self.metadata,
            attachments: self.attachments,
            requires_response: self.requires_response,
            actions: self.actions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
        assert!(Priority::High < Priority::Critical);
    }

    #[test]
    fn test_urgent_priorities() {
        assert!(!Priority::Low.is_urgent());
        assert!(!Priority::Medium.is_urgent());
        assert!(Priority::High.is_urgent());
        assert!(Priority::Critical.is_urgent());
    }

    #[test]
    fn test_input_deserializes_with_defaults() {
        let input: NotificationInput = serde_json::from_str(
            r#"{"category":"ai","priority":"high","title":"Insight","body":"Quiz scores dropped"}"#,
        )
        .unwrap();

        assert_eq!(input.category, Category::Ai);
        assert_eq!(input.priority, Priority::High);
        assert!(!input.action_required);
        assert!(input.actions.is_empty());
        assert!(input.metadata.is_none());
    }

    #[test]
    fn test_message_kind_tags_are_snake_case() {
        let json = serde_json::to_string(&MessageKind::AiInsight).unwrap();
        assert_eq!(json, "\"ai_insight\"");

        let kind: MessageKind = serde_json::from_str("\"student_alert\"").unwrap();
        assert_eq!(kind, MessageKind::StudentAlert);
    }

    #[test]
    fn test_action_descriptor_variant_defaults_to_primary() {
        let action: ActionDescriptor =
            serde_json::from_str(r#"{"id":"contact","label":"Contact student"}"#).unwrap();
        assert_eq!(action.variant, ButtonVariant::Primary);
    }
}
