//! Display lookup tables
//!
//! Icon, label and colour for each enumerated record attribute. Rendering
//! code only reads these tables; it never branches on kinds itself.

use ratatui::style::Color;

use crate::effect::AlertSeverity;
use crate::model::{AttachmentKind, ButtonVariant, Category, MessageKind, Priority, SenderKind};

/// How an enumerated value is shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayDescriptor {
    pub icon: &'static str,
    pub label: &'static str,
    pub color: Color,
}

impl DisplayDescriptor {
    const fn new(icon: &'static str, label: &'static str, color: Color) -> Self {
        Self { icon, label, color }
    }
}

pub fn category(category: Category) -> DisplayDescriptor {
    match category {
        Category::System => DisplayDescriptor::new("⚙", "System", Color::Gray),
        Category::Ai => DisplayDescriptor::new("✦", "AI", Color::Magenta),
        Category::Student => DisplayDescriptor::new("☺", "Student", Color::Blue),
        Category::Class => DisplayDescriptor::new("▣", "Class", Color::Green),
        Category::Content => DisplayDescriptor::new("▤", "Content", Color::Cyan),
        Category::Alert => DisplayDescriptor::new("⚠", "Alert", Color::Red),
    }
}

pub fn priority(priority: Priority) -> DisplayDescriptor {
    match priority {
        Priority::Low => DisplayDescriptor::new("·", "Low", Color::DarkGray),
        Priority::Medium => DisplayDescriptor::new("•", "Medium", Color::Blue),
        Priority::High => DisplayDescriptor::new("!", "High", Color::Yellow),
        Priority::Critical => DisplayDescriptor::new("‼", "Critical", Color::Red),
    }
}

pub fn message_kind(kind: MessageKind) -> DisplayDescriptor {
    match kind {
        MessageKind::Info => DisplayDescriptor::new("ℹ", "Information", Color::Blue),
        MessageKind::Warning => DisplayDescriptor::new("⚠", "Warning", Color::Yellow),
        MessageKind::Error => DisplayDescriptor::new("✖", "Error", Color::Red),
        MessageKind::Success => DisplayDescriptor::new("✔", "Success", Color::Green),
        MessageKind::Announcement => DisplayDescriptor::new("✉", "Announcement", Color::Cyan),
        MessageKind::AiInsight => DisplayDescriptor::new("✦", "AI Insight", Color::Magenta),
        MessageKind::StudentAlert => DisplayDescriptor::new("☺", "Student Alert", Color::LightRed),
        MessageKind::SystemUpdate => DisplayDescriptor::new("⚙", "System Update", Color::Gray),
    }
}

pub fn button_variant(variant: ButtonVariant) -> DisplayDescriptor {
    match variant {
        ButtonVariant::Primary => DisplayDescriptor::new("", "Primary", Color::Blue),
        ButtonVariant::Secondary => DisplayDescriptor::new("", "Secondary", Color::Gray),
        ButtonVariant::Danger => DisplayDescriptor::new("", "Danger", Color::Red),
        ButtonVariant::Success => DisplayDescriptor::new("", "Success", Color::Green),
    }
}

pub fn sender(kind: SenderKind) -> DisplayDescriptor {
    match kind {
        SenderKind::System => DisplayDescriptor::new("⚙", "System", Color::Gray),
        SenderKind::Ai => DisplayDescriptor::new("✦", "AI Assistant", Color::Magenta),
        SenderKind::Teacher => DisplayDescriptor::new("✎", "Teacher", Color::Green),
        SenderKind::Student => DisplayDescriptor::new("☺", "Student", Color::Blue),
        SenderKind::Admin => DisplayDescriptor::new("★", "Admin", Color::Yellow),
    }
}

pub fn attachment(kind: AttachmentKind) -> DisplayDescriptor {
    match kind {
        AttachmentKind::File => DisplayDescriptor::new("▤", "File", Color::Gray),
        AttachmentKind::Link => DisplayDescriptor::new("↗", "Link", Color::Blue),
        AttachmentKind::Image => DisplayDescriptor::new("▨", "Image", Color::Magenta),
    }
}

pub fn alert_severity(severity: AlertSeverity) -> DisplayDescriptor {
    match severity {
        AlertSeverity::Info => DisplayDescriptor::new("ℹ", "Info", Color::Blue),
        AlertSeverity::Warning => DisplayDescriptor::new("⚠", "Warning", Color::Yellow),
        AlertSeverity::Error => DisplayDescriptor::new("✖", "Error", Color::Red),
    }
}
