//! Static field schemas, one table per resource kind.
//!
//! The tables are the single source of truth for payload shape: the
//! validation layer walks them, and the serde payload types in
//! [`crate::models`] use the same wire names.

/// A constraint on the value of a single field.
#[derive(Debug, Clone, Copy)]
pub enum Constraint {
    /// Free text. `min_len` is checked on the trimmed value, `max_len`
    /// on the raw value, both in characters.
    Text {
        min_len: usize,
        max_len: Option<usize>,
    },
    /// Whole number inside the closed range `min..=max`.
    Integer { min: i64, max: i64 },
    /// One of a fixed set of string values.
    OneOf(&'static [&'static str]),
}

/// One row of a resource's schema table.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Wire name of the field (camelCase).
    pub name: &'static str,
    /// Human-readable name used in failure messages.
    pub label: &'static str,
    /// Must be present on creation.
    pub required: bool,
    /// Message for a missing or blank required value.
    pub required_message: &'static str,
    pub constraint: Constraint,
}

/// The ordered field table of one resource kind.
#[derive(Debug)]
pub struct ResourceSchema {
    pub fields: &'static [FieldRule],
}

impl ResourceSchema {
    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|rule| rule.name == name)
    }
}

pub const TITLE_MAX_LEN: usize = 200;

pub static NOTE_SCHEMA: ResourceSchema = ResourceSchema {
    fields: &[
        FieldRule {
            name: "title",
            label: "Title",
            required: true,
            required_message: "Title is required",
            constraint: Constraint::Text {
                min_len: 1,
                max_len: Some(TITLE_MAX_LEN),
            },
        },
        FieldRule {
            name: "content",
            label: "Content",
            required: true,
            required_message: "Content is required",
            constraint: Constraint::Text {
                min_len: 1,
                max_len: None,
            },
        },
    ],
};

pub static SPELL_SCHEMA: ResourceSchema = ResourceSchema {
    fields: &[
        FieldRule {
            name: "name",
            label: "Spell name",
            required: true,
            required_message: "Spell name is required",
            constraint: Constraint::Text {
                min_len: 1,
                max_len: Some(TITLE_MAX_LEN),
            },
        },
        FieldRule {
            name: "incantation",
            label: "Incantation",
            required: true,
            required_message: "Incantation is required",
            constraint: Constraint::Text {
                min_len: 1,
                max_len: None,
            },
        },
        FieldRule {
            name: "ingredients",
            label: "Ingredients",
            required: true,
            required_message: "Ingredients are required",
            constraint: Constraint::Text {
                min_len: 1,
                max_len: None,
            },
        },
        FieldRule {
            name: "powerLevel",
            label: "Power level",
            required: true,
            required_message: "Power level is required",
            constraint: Constraint::Integer {
                min: crate::models::spell::MIN_POWER_LEVEL as i64,
                max: crate::models::spell::MAX_POWER_LEVEL as i64,
            },
        },
    ],
};

pub static TASK_SCHEMA: ResourceSchema = ResourceSchema {
    fields: &[
        FieldRule {
            name: "title",
            label: "Title",
            required: true,
            required_message: "Title is required",
            constraint: Constraint::Text {
                min_len: 1,
                max_len: Some(TITLE_MAX_LEN),
            },
        },
        FieldRule {
            name: "status",
            label: "Status",
            required: false,
            required_message: "Status is required",
            constraint: Constraint::OneOf(&["pending", "in-progress", "completed"]),
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResourceKind;
    use crate::models::note::CreateNote;
    use crate::models::spell::CreateSpell;
    use crate::models::task::{CreateTask, TaskStatus};

    fn wire_keys(value: serde_json::Value) -> Vec<String> {
        let mut keys: Vec<String> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn schema_keys(kind: ResourceKind) -> Vec<String> {
        let mut keys: Vec<String> = kind
            .schema()
            .fields
            .iter()
            .map(|rule| rule.name.to_string())
            .collect();
        keys.sort();
        keys
    }

    #[test]
    fn schema_names_match_create_payload_wire_names() {
        let note = serde_json::to_value(CreateNote {
            title: "t".into(),
            content: "c".into(),
        })
        .unwrap();
        assert_eq!(wire_keys(note), schema_keys(ResourceKind::Note));

        let spell = serde_json::to_value(CreateSpell {
            name: "n".into(),
            incantation: "i".into(),
            ingredients: "g".into(),
            power_level: 3,
        })
        .unwrap();
        assert_eq!(wire_keys(spell), schema_keys(ResourceKind::Spell));

        let task = serde_json::to_value(CreateTask {
            title: "t".into(),
            status: TaskStatus::Pending,
        })
        .unwrap();
        assert_eq!(wire_keys(task), schema_keys(ResourceKind::Task));
    }

    #[test]
    fn task_status_choices_match_enum() {
        let Some(rule) = TASK_SCHEMA.field("status") else {
            panic!("task schema has no status field");
        };
        let Constraint::OneOf(choices) = rule.constraint else {
            panic!("status should be a OneOf constraint");
        };
        let expected: Vec<&str> = TaskStatus::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(choices, expected.as_slice());
    }
}
