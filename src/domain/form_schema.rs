//! Machine-readable description of the form widgets.
//!
//! Clients render the form from a [`FormSchema`]: one section for the coach's
//! personal details and one per [`EventBlock`], each listing its widgets and
//! the actions it offers. Field keys match the JSON keys accepted by the
//! session update endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use super::block::{EventBlock, Role};

/// Page heading shown above the form.
pub const FORM_TITLE: &str = "Results Survey";

/// Short explanation under the heading.
pub const FORM_DESCRIPTION: &str = "Record the sports events and results obtained by coaches.";

/// Kind of input widget and its constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Widget {
    /// Single-line text input.
    Text,
    /// Calendar date input (`YYYY-MM-DD`).
    Date,
    /// Drop-down with a fixed option list; the first option is preselected.
    Select {
        /// Offered values.
        options: Vec<String>,
    },
    /// Radio group with a fixed option list; the first option is preselected.
    Radio {
        /// Offered values.
        options: Vec<String>,
    },
    /// Integer input.
    Number {
        /// Smallest accepted value.
        min: u32,
        /// Increment between values.
        step: u32,
    },
    /// Growing list fed one entry at a time by the add action.
    List,
}

/// One input widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldSchema {
    /// JSON key of the value.
    pub key: &'static str,
    /// Label shown next to the widget.
    pub label: &'static str,
    /// Widget kind.
    pub widget: Widget,
}

/// Button attached to a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ActionSchema {
    /// Stable identifier.
    pub id: &'static str,
    /// Button caption.
    pub label: String,
    /// HTTP method the button triggers.
    pub method: &'static str,
    /// Endpoint path, `{id}` standing for the session ID.
    pub path: String,
}

/// A group of widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SectionSchema {
    /// `personal` or an event block slug.
    pub id: &'static str,
    /// Section heading.
    pub title: &'static str,
    /// Widgets in display order.
    pub fields: Vec<FieldSchema>,
    /// Buttons in display order.
    pub actions: Vec<ActionSchema>,
}

/// Branding image state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BrandingSchema {
    /// Whether the logo can be fetched from `GET /logo`.
    pub logo_available: bool,
    /// Warning to display when the logo is missing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// The whole form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FormSchema {
    /// Page heading.
    pub title: &'static str,
    /// Page description.
    pub description: &'static str,
    /// Branding image state.
    pub branding: BrandingSchema,
    /// Coach details, shared by every submission.
    pub personal: SectionSchema,
    /// Submittable event blocks.
    pub blocks: Vec<SectionSchema>,
}

impl FormSchema {
    /// Describes the form. `logo_path` is only used for the warning text.
    #[must_use]
    pub fn build(logo_available: bool, logo_path: &str) -> Self {
        let branding = BrandingSchema {
            logo_available,
            warning: (!logo_available).then(|| format!("Logo not found at {logo_path}")),
        };
        Self {
            title: FORM_TITLE,
            description: FORM_DESCRIPTION,
            branding,
            personal: personal_section(),
            blocks: EventBlock::ALL.into_iter().map(block_section).collect(),
        }
    }
}

fn personal_section() -> SectionSchema {
    SectionSchema {
        id: "personal",
        title: "Block 1: Personal Information",
        fields: vec![
            text("coach_name", "Full Name"),
            text("identity_document", "Identity Document"),
            text("league", "League"),
        ],
        actions: Vec::new(),
    }
}

fn block_section(block: EventBlock) -> SectionSchema {
    let events = block
        .events()
        .iter()
        .map(|event| event.label().to_string())
        .collect();
    let roles = Role::ALL.iter().map(|role| role.label().to_string()).collect();
    let base = format!("/api/v1/sessions/{{id}}/blocks/{}", block.slug());

    SectionSchema {
        id: block.slug(),
        title: block.title(),
        fields: vec![
            FieldSchema {
                key: "event",
                label: "Event",
                widget: Widget::Select { options: events },
            },
            FieldSchema {
                key: "event_date",
                label: "Event Date",
                widget: Widget::Date,
            },
            text("venue", "Event Venue"),
            text("discipline", "Discipline"),
            FieldSchema {
                key: "role",
                label: "Role",
                widget: Widget::Radio { options: roles },
            },
            count("gold", "Gold Medals"),
            count("silver", "Silver Medals"),
            count("bronze", "Bronze Medals"),
            count("rank_4_to_8", "Places 4-8"),
            FieldSchema {
                key: "athletes",
                label: "Athletes",
                widget: Widget::List,
            },
        ],
        actions: vec![
            ActionSchema {
                id: "add_athlete",
                label: "Add Athlete".to_string(),
                method: "POST",
                path: format!("{base}/athletes"),
            },
            ActionSchema {
                id: "clear_athletes",
                label: "Clear Athlete List".to_string(),
                method: "DELETE",
                path: format!("{base}/athletes"),
            },
            ActionSchema {
                id: "submit",
                label: format!("Save {}", block.title()),
                method: "POST",
                path: format!("{base}/submit"),
            },
        ],
    }
}

const fn text(key: &'static str, label: &'static str) -> FieldSchema {
    FieldSchema {
        key,
        label,
        widget: Widget::Text,
    }
}

const fn count(key: &'static str, label: &'static str) -> FieldSchema {
    FieldSchema {
        key,
        label,
        widget: Widget::Number { min: 0, step: 1 },
    }
}
