//! Field group expansion

/// Declared field groups.
///
/// Touching any member of a group touches every member of every group the
/// field belongs to. Ungrouped fields stand alone.
#[derive(Debug, Clone, Default)]
pub(crate) struct FieldGroups {
    groups: Vec<Vec<String>>,
}

impl FieldGroups {
    pub(crate) fn new(groups: Vec<Vec<String>>) -> Self {
        Self { groups }
    }

    /// Returns the fields marked together with `field`, without duplicates.
    pub(crate) fn expand(&self, field: &str) -> Vec<String> {
        let mut fields: Vec<String> = Vec::new();
        for group in self.groups.iter().filter(|g| g.iter().any(|f| f == field)) {
            for member in group {
                if !fields.contains(member) {
                    fields.push(member.clone());
                }
            }
        }
        if fields.is_empty() {
            fields.push(field.to_string());
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(groups: &[&[&str]]) -> FieldGroups {
        FieldGroups::new(
            groups
                .iter()
                .map(|g| g.iter().map(|f| f.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_ungrouped_field_stands_alone() {
        let groups = groups(&[&["password", "password_confirmation"]]);
        assert_eq!(groups.expand("email"), ["email"]);
    }

    #[test]
    fn test_member_expands_to_whole_group() {
        let groups = groups(&[&["password", "password_confirmation"]]);
        assert_eq!(
            groups.expand("password_confirmation"),
            ["password", "password_confirmation"]
        );
    }

    #[test]
    fn test_overlapping_groups_are_merged() {
        let groups = groups(&[&["start", "end"], &["end", "timezone"], &["name"]]);
        assert_eq!(groups.expand("end"), ["start", "end", "timezone"]);
        assert_eq!(groups.expand("start"), ["start", "end"]);
    }
}
