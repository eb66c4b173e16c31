//! Profile provisioning rule.
//!
//! Registration turns the role-specific request fields into a
//! [`ProfileDraft`]. The user store writes the draft in the same transaction
//! as the user row, so a student or teacher is never observable without its
//! profile.

use std::fmt;

use super::profile::PROFILE_FIELD_MAX;
use super::role::Role;

/// Role-specific fields supplied alongside a registration request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleFields {
    pub student_id: Option<i32>,
    pub programme: Option<String>,
    pub teacher_id: Option<i32>,
    pub department: Option<String>,
}

/// Validation failures for role-specific registration fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisioningValidationError {
    /// A field belonging to another role was supplied.
    ForeignField { field: &'static str, role: Role },
    /// A role identifier was zero or negative.
    NonPositiveIdentifier { field: &'static str },
    /// A free-form field exceeded [`PROFILE_FIELD_MAX`].
    FieldTooLong { field: &'static str, max: usize },
}

impl ProvisioningValidationError {
    /// Request field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::ForeignField { field, .. }
            | Self::NonPositiveIdentifier { field }
            | Self::FieldTooLong { field, .. } => field,
        }
    }
}

impl fmt::Display for ProvisioningValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignField { field, role } => {
                write!(f, "{field} is not accepted for {role} registrations")
            }
            Self::NonPositiveIdentifier { field } => {
                write!(f, "{field} must be a positive integer")
            }
            Self::FieldTooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for ProvisioningValidationError {}

/// Profile to create for a newly registered user.
///
/// A `None` identifier asks the store to assign the next value from its
/// per-role sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileDraft {
    Student {
        student_id: Option<i32>,
        programme: Option<String>,
    },
    Teacher {
        teacher_id: Option<i32>,
        department: Option<String>,
    },
}

impl ProfileDraft {
    /// Select the profile to provision for `role`.
    ///
    /// Returns `Ok(None)` for roles that own no profile. Fields meant for a
    /// different role are rejected rather than silently dropped.
    ///
    /// # Examples
    /// ```
    /// use campus_auth::domain::{ProfileDraft, Role, RoleFields};
    ///
    /// let draft = ProfileDraft::for_role(Role::Student, RoleFields::default())
    ///     .expect("valid fields");
    /// assert!(matches!(draft, Some(ProfileDraft::Student { student_id: None, .. })));
    /// assert_eq!(ProfileDraft::for_role(Role::Admin, RoleFields::default()), Ok(None));
    /// ```
    pub fn for_role(
        role: Role,
        fields: RoleFields,
    ) -> Result<Option<Self>, ProvisioningValidationError> {
        let RoleFields {
            student_id,
            programme,
            teacher_id,
            department,
        } = fields;

        match role {
            Role::Student => {
                reject_foreign(
                    role,
                    &[
                        ("teacherId", teacher_id.is_some()),
                        ("department", department.is_some()),
                    ],
                )?;
                Ok(Some(Self::Student {
                    student_id: positive("studentId", student_id)?,
                    programme: free_form("programme", programme)?,
                }))
            }
            Role::Teacher => {
                reject_foreign(
                    role,
                    &[
                        ("studentId", student_id.is_some()),
                        ("programme", programme.is_some()),
                    ],
                )?;
                Ok(Some(Self::Teacher {
                    teacher_id: positive("teacherId", teacher_id)?,
                    department: free_form("department", department)?,
                }))
            }
            Role::Admin => {
                reject_foreign(
                    role,
                    &[
                        ("studentId", student_id.is_some()),
                        ("programme", programme.is_some()),
                        ("teacherId", teacher_id.is_some()),
                        ("department", department.is_some()),
                    ],
                )?;
                Ok(None)
            }
        }
    }

    /// Role whose profile this draft creates.
    pub fn role(&self) -> Role {
        match self {
            Self::Student { .. } => Role::Student,
            Self::Teacher { .. } => Role::Teacher,
        }
    }
}

fn reject_foreign(
    role: Role,
    supplied: &[(&'static str, bool)],
) -> Result<(), ProvisioningValidationError> {
    match supplied.iter().find(|(_, present)| *present) {
        Some((field, _)) => Err(ProvisioningValidationError::ForeignField {
            field: *field,
            role,
        }),
        None => Ok(()),
    }
}

fn positive(
    field: &'static str,
    value: Option<i32>,
) -> Result<Option<i32>, ProvisioningValidationError> {
    match value {
        Some(id) if id <= 0 => Err(ProvisioningValidationError::NonPositiveIdentifier { field }),
        other => Ok(other),
    }
}

/// Trim a free-form field, treating blank input as absent.
fn free_form(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<String>, ProvisioningValidationError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > PROFILE_FIELD_MAX {
        return Err(ProvisioningValidationError::FieldTooLong {
            field,
            max: PROFILE_FIELD_MAX,
        });
    }
    Ok(Some(trimmed.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn student_draft_keeps_supplied_values() {
        let fields = RoleFields {
            student_id: Some(42),
            programme: Some("  Computer Science ".to_owned()),
            ..RoleFields::default()
        };
        let draft = ProfileDraft::for_role(Role::Student, fields).expect("valid fields");
        assert_eq!(
            draft,
            Some(ProfileDraft::Student {
                student_id: Some(42),
                programme: Some("Computer Science".to_owned()),
            })
        );
    }

    #[rstest]
    fn teacher_draft_defers_identifier_to_store() {
        let fields = RoleFields {
            department: Some("   ".to_owned()),
            ..RoleFields::default()
        };
        let draft = ProfileDraft::for_role(Role::Teacher, fields).expect("valid fields");
        assert_eq!(
            draft,
            Some(ProfileDraft::Teacher {
                teacher_id: None,
                department: None,
            })
        );
        assert_eq!(draft.map(|d| d.role()), Some(Role::Teacher));
    }

    #[rstest]
    #[case(Role::Student, RoleFields { teacher_id: Some(1), ..RoleFields::default() }, "teacherId")]
    #[case(Role::Student, RoleFields { department: Some("Maths".into()), ..RoleFields::default() }, "department")]
    #[case(Role::Teacher, RoleFields { programme: Some("Maths".into()), ..RoleFields::default() }, "programme")]
    #[case(Role::Admin, RoleFields { student_id: Some(3), ..RoleFields::default() }, "studentId")]
    fn rejects_fields_of_other_roles(
        #[case] role: Role,
        #[case] fields: RoleFields,
        #[case] expected_field: &str,
    ) {
        let err = ProfileDraft::for_role(role, fields).expect_err("foreign field");
        assert!(matches!(err, ProvisioningValidationError::ForeignField { .. }));
        assert_eq!(err.field(), expected_field);
    }

    #[rstest]
    #[case(0)]
    #[case(-7)]
    fn rejects_non_positive_identifiers(#[case] id: i32) {
        let fields = RoleFields {
            student_id: Some(id),
            ..RoleFields::default()
        };
        assert_eq!(
            ProfileDraft::for_role(Role::Student, fields),
            Err(ProvisioningValidationError::NonPositiveIdentifier { field: "studentId" })
        );
    }

    #[rstest]
    fn rejects_overlong_free_form_fields() {
        let fields = RoleFields {
            department: Some("d".repeat(PROFILE_FIELD_MAX + 1)),
            ..RoleFields::default()
        };
        assert_eq!(
            ProfileDraft::for_role(Role::Teacher, fields),
            Err(ProvisioningValidationError::FieldTooLong {
                field: "department",
                max: PROFILE_FIELD_MAX,
            })
        );
    }

    #[rstest]
    fn admin_gets_no_profile() {
        assert_eq!(
            ProfileDraft::for_role(Role::Admin, RoleFields::default()),
            Ok(None)
        );
    }
}
