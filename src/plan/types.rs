//! Data types for parsed plan output
//!
//! This module defines the records produced by a single parse pass. All of
//! them are plain values: built once by the parser and owned by the caller.

use serde::{Deserialize, Serialize};

/// Represents the kind of change planned for a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Resource will be created
    Create,
    /// Resource will be updated in-place
    Update,
    /// Resource will be destroyed
    Delete,
    /// Resource will be destroyed and recreated
    Replace,
    /// Resource state was relocated to a new address
    Moved,
    /// Nothing recognisable will happen to the resource
    NoOp,
}

impl ChangeKind {
    /// All kinds, in report order
    pub const ALL: [ChangeKind; 6] = [
        ChangeKind::Create,
        ChangeKind::Update,
        ChangeKind::Replace,
        ChangeKind::Delete,
        ChangeKind::Moved,
        ChangeKind::NoOp,
    ];

    /// Lowercase tag used in the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Create => "create",
            ChangeKind::Update => "update",
            ChangeKind::Delete => "delete",
            ChangeKind::Replace => "replace",
            ChangeKind::Moved => "moved",
            ChangeKind::NoOp => "no-op",
        }
    }

    /// Parse a serialized tag back into a kind
    pub fn from_tag(tag: &str) -> Option<Self> {
        ChangeKind::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }

    /// Get the symbol used to represent this change kind
    pub fn symbol(&self) -> &'static str {
        match self {
            ChangeKind::Create => "+",
            ChangeKind::Update => "~",
            ChangeKind::Delete => "-",
            ChangeKind::Replace => "-/+",
            ChangeKind::Moved => "→",
            ChangeKind::NoOp => " ",
        }
    }

    /// Get the label for this change kind
    pub fn label(&self) -> &'static str {
        match self {
            ChangeKind::Create => "will be created",
            ChangeKind::Update => "will be updated in-place",
            ChangeKind::Delete => "will be destroyed",
            ChangeKind::Replace => "must be replaced",
            ChangeKind::Moved => "has moved",
            ChangeKind::NoOp => "no changes",
        }
    }

    /// Get RGB color tuple for this change kind
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            ChangeKind::Create => (152, 225, 152),  // Pastel mint green
            ChangeKind::Update => (255, 230, 160),  // Pastel cream/yellow
            ChangeKind::Replace => (181, 174, 254), // Pastel lavender
            ChangeKind::Delete => (255, 160, 160),  // Pastel coral
            ChangeKind::Moved => (160, 200, 255),   // Pastel sky blue
            ChangeKind::NoOp => (160, 160, 160),    // Grey
        }
    }
}

/// A single attribute change within a resource block
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttributeChange {
    /// Name of the attribute (e.g., "ami", "instance_type")
    pub name: String,

    /// Value before the change, as rendered in the plan
    pub old_value: Option<String>,

    /// Value after the change, as rendered in the plan
    pub new_value: Option<String>,

    /// Whether the value is redacted as `(sensitive value)`
    pub is_sensitive: bool,

    /// Whether the value is only known after apply
    pub is_computed: bool,

    /// Whether this attribute forces resource replacement
    pub forces_replacement: bool,
}

impl AttributeChange {
    /// Create a new attribute change
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Set the old value
    pub fn with_old_value(mut self, value: &str) -> Self {
        self.old_value = Some(value.to_string());
        self
    }

    /// Set the new value
    pub fn with_new_value(mut self, value: &str) -> Self {
        self.new_value = Some(value.to_string());
        self
    }

    /// Mark as sensitive
    pub fn with_sensitive(mut self, sensitive: bool) -> Self {
        self.is_sensitive = sensitive;
        self
    }

    /// Mark as computed
    pub fn with_computed(mut self, computed: bool) -> Self {
        self.is_computed = computed;
        self
    }

    /// Mark as forcing replacement
    pub fn with_forces_replacement(mut self, forces: bool) -> Self {
        self.forces_replacement = forces;
        self
    }
}

/// A resource change block in the plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceChange {
    /// Full resource address exactly as written in the plan
    /// (e.g., "module.vpc.aws_subnet.main[0]")
    pub resource_address: String,

    /// Resource type (e.g., "aws_instance", "data.aws_ami")
    pub resource_type: String,

    /// Resource name (e.g., "example")
    pub resource_name: String,

    /// Kind of change for this resource
    pub change_kind: ChangeKind,

    pub attributes_added: Vec<AttributeChange>,
    pub attributes_changed: Vec<AttributeChange>,
    pub attributes_deleted: Vec<AttributeChange>,

    /// Attributes annotated with `# forces replacement`, in order
    pub forces_replacement: Vec<String>,

    /// Set when any attribute in the block is sensitive
    pub has_sensitive: bool,

    /// Set when any attribute in the block is computed
    pub has_computed: bool,

    /// Prior address when the resource was relocated
    pub moved_from: Option<String>,
}

impl ResourceChange {
    /// Create an empty resource change, resolving type and name from the address
    pub fn new(address: &str, change_kind: ChangeKind) -> Self {
        let (resource_type, resource_name) = super::address::resolve_address(address);

        Self {
            resource_address: address.to_string(),
            resource_type,
            resource_name,
            change_kind,
            attributes_added: Vec::new(),
            attributes_changed: Vec::new(),
            attributes_deleted: Vec::new(),
            forces_replacement: Vec::new(),
            has_sensitive: false,
            has_computed: false,
            moved_from: None,
        }
    }

    /// Whether this record describes a `data.` lookup rather than a managed resource
    pub fn is_data_source(&self) -> bool {
        self.resource_type.starts_with("data.")
    }

    /// Total number of attribute lines recorded for this resource
    pub fn attribute_count(&self) -> usize {
        self.attributes_added.len() + self.attributes_changed.len() + self.attributes_deleted.len()
    }

    /// Synthetic record marking that this resource was relocated
    pub fn moved_marker(&self) -> Self {
        Self {
            resource_address: self.resource_address.clone(),
            resource_type: self.resource_type.clone(),
            resource_name: self.resource_name.clone(),
            change_kind: ChangeKind::Moved,
            attributes_added: Vec::new(),
            attributes_changed: Vec::new(),
            attributes_deleted: Vec::new(),
            forces_replacement: Vec::new(),
            has_sensitive: false,
            has_computed: false,
            moved_from: self.moved_from.clone(),
        }
    }
}

/// A change to a root module output value
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputChange {
    pub name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub is_sensitive: bool,
}

/// An error or warning block reported by terraform
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Diagnostic {
    /// First `Error:`/`Warning:` line of the block
    pub title: String,

    /// Every non-empty line of the block, joined with newlines
    pub message: String,

    pub file_path: Option<String>,
    pub line_number: Option<u32>,

    pub is_warning: bool,
}

impl Diagnostic {
    /// Build an error diagnostic that did not come from a terraform block
    pub fn error(title: &str, message: &str) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
            ..Default::default()
        }
    }

    /// `path:line` when a location was reported
    pub fn location(&self) -> Option<String> {
        match (&self.file_path, self.line_number) {
            (Some(path), Some(line)) => Some(format!("{}:{}", path, line)),
            (Some(path), None) => Some(path.clone()),
            _ => None,
        }
    }
}

/// Counts taken from the `Plan: X to add, Y to change, Z to destroy.` line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportedCounts {
    pub to_add: usize,
    pub to_change: usize,
    pub to_destroy: usize,
}

/// Aggregate result of parsing one plan
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanSummary {
    pub to_add: usize,
    pub to_change: usize,
    pub to_destroy: usize,
    pub to_replace: usize,

    /// Resource changes in the order they appear in the plan
    pub resource_changes: Vec<ResourceChange>,

    pub output_changes: Vec<OutputChange>,

    pub has_changes: bool,

    pub has_errors: bool,
    pub errors: Vec<Diagnostic>,

    pub has_warnings: bool,
    pub warnings: Vec<Diagnostic>,

    /// Counts stated by terraform itself, when the summary line was present
    pub reported: Option<ReportedCounts>,

    /// Unmodified input text
    pub raw_plan: String,
}

impl PlanSummary {
    /// Summary with no changes, carrying the raw text and any diagnostics
    pub fn empty(raw_plan: &str) -> Self {
        Self {
            raw_plan: raw_plan.to_string(),
            ..Default::default()
        }
    }

    /// Total number of counted changes
    pub fn total_changes(&self) -> usize {
        self.to_add + self.to_change + self.to_destroy + self.to_replace
    }

    /// Resource changes of one kind, in plan order
    pub fn resources_of_kind(&self, kind: ChangeKind) -> impl Iterator<Item = &ResourceChange> {
        self.resource_changes
            .iter()
            .filter(move |r| r.change_kind == kind)
    }
}
