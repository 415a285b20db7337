//! Schema registry
//!
//! Ordered field names with stable role ids starting at [`FIRST_ROLE`].

use crate::record::ItemRecord;
use tracing::debug;

/// Numeric role assigned to a discovered field
pub type Role = u32;

/// Role id given to the first discovered field
pub const FIRST_ROLE: Role = 1;

/// Field names discovered from the collection, frozen once populated
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    /// Field names; the role of `fields[i]` is `FIRST_ROLE + i`
    fields: Vec<String>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate from the first record unless already populated
    ///
    /// Returns `true` when roles were assigned by this call.
    pub fn discover_if_needed(&mut self, records: &[ItemRecord]) -> bool {
        if !self.fields.is_empty() {
            return false;
        }

        let Some(first) = records.first() else {
            return false;
        };

        self.fields = first.keys().map(str::to_string).collect();
        debug!(fields = ?self.fields, "Discovered collection fields");
        !self.fields.is_empty()
    }

    /// Whether roles have been assigned
    pub fn is_frozen(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Number of roles
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no roles are assigned
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in role order
    pub fn field_names(&self) -> &[String] {
        &self.fields
    }

    /// Field name for a role
    pub fn field_for_role(&self, role: Role) -> Option<&str> {
        let index = role.checked_sub(FIRST_ROLE)? as usize;
        self.fields.get(index).map(String::as_str)
    }

    /// Role for a field name
    pub fn role_for_field(&self, field: &str) -> Option<Role> {
        self.fields
            .iter()
            .position(|name| name == field)
            .map(|index| FIRST_ROLE + index as Role)
    }

    /// `(role, field)` pairs in role order
    pub fn roles(&self) -> impl Iterator<Item = (Role, &str)> {
        self.fields
            .iter()
            .enumerate()
            .map(|(index, name)| (FIRST_ROLE + index as Role, name.as_str()))
    }
}
