//! Access policy evaluation.
//!
//! Every access decision reduces to role membership plus a comparison
//! of the caller's id against a single ownership field on the resource
//! (`owner_id`, `patient_id`, `patient_user_id`). The evaluator is a
//! pure function over those facts; handlers load the resource first, so
//! a missing resource is reported as not-found before ownership is ever
//! examined.
//!
//! Precedence, first match wins:
//! 1. admin: allowed for every action
//! 2. resource-specific ownership match
//! 3. deny

use uuid::Uuid;

use super::user::UserRole;
use crate::errors::AppError;

/// The resolved, authenticated caller attached to a request.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub role: UserRole,
    pub email: String,
    pub full_name: String,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// An action paired with the ownership facts of its target resource.
///
/// Variants carry only what the rule needs; a clinic with no owner on
/// record can never match an ownership rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Edit or delete a clinic
    MutateClinic { owner_id: Option<Uuid> },
    /// Read one appointment (patient-initiated)
    ViewAppointment { patient_id: Uuid },
    /// Cancel (delete) an appointment
    CancelAppointment { patient_id: Uuid },
    /// Transition an appointment to done
    FinalizeAppointment { clinic_owner_id: Option<Uuid> },
    /// Read, upload, or delete an X-ray record
    AccessXray { patient_user_id: Uuid },
    /// Read a patient's procedure history
    ViewPatientHistory { patient_id: Uuid },
    /// List patients across the caller's clinics
    ListClinicPatients,
}

/// Why an action was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// Authenticated, but the ownership rule did not match
    Forbidden,
    /// A declared role requirement was not met
    WrongRole,
}

impl From<Denial> for AppError {
    fn from(_: Denial) -> Self {
        AppError::Forbidden
    }
}

/// Decide whether `identity` may perform `action`.
pub fn authorize(identity: &Identity, action: &Action) -> Result<(), Denial> {
    // Rule 1: admin overrides everything.
    if identity.is_admin() {
        return Ok(());
    }

    // Rule 2: ownership match per resource kind.
    let allowed = match *action {
        Action::MutateClinic { owner_id } => {
            identity.role == UserRole::Owner && owner_id == Some(identity.id)
        }
        Action::ViewAppointment { patient_id } | Action::CancelAppointment { patient_id } => {
            patient_id == identity.id
        }
        Action::FinalizeAppointment { clinic_owner_id } => {
            identity.role == UserRole::Owner && clinic_owner_id == Some(identity.id)
        }
        Action::AccessXray { patient_user_id } => {
            identity.role == UserRole::Patient && patient_user_id == identity.id
        }
        Action::ViewPatientHistory { patient_id } => {
            identity.role == UserRole::Patient && patient_id == identity.id
        }
        Action::ListClinicPatients => identity.role == UserRole::Owner,
    };

    if allowed {
        Ok(())
    } else {
        Err(Denial::Forbidden)
    }
}

/// Degenerate case: no resource, only role membership. `None` means any
/// authenticated caller. Admins always pass.
pub fn require_role(identity: &Identity, required: Option<UserRole>) -> Result<(), Denial> {
    match required {
        None => Ok(()),
        Some(role) if identity.role == role || identity.is_admin() => Ok(()),
        Some(_) => Err(Denial::WrongRole),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: UserRole) -> Identity {
        Identity {
            id: Uuid::new_v4(),
            role,
            email: "someone@example.com".into(),
            full_name: "Someone".into(),
        }
    }

    fn all_actions_for(other: Uuid) -> Vec<Action> {
        vec![
            Action::MutateClinic {
                owner_id: Some(other),
            },
            Action::ViewAppointment { patient_id: other },
            Action::CancelAppointment { patient_id: other },
            Action::FinalizeAppointment {
                clinic_owner_id: Some(other),
            },
            Action::AccessXray {
                patient_user_id: other,
            },
            Action::ViewPatientHistory { patient_id: other },
        ]
    }

    #[test]
    fn admin_is_allowed_everything() {
        let admin = identity(UserRole::Admin);
        for action in all_actions_for(Uuid::new_v4()) {
            assert_eq!(authorize(&admin, &action), Ok(()), "{:?}", action);
        }
        assert_eq!(authorize(&admin, &Action::ListClinicPatients), Ok(()));
    }

    #[test]
    fn non_admin_denied_on_mismatched_ownership() {
        let other = Uuid::new_v4();
        for role in [UserRole::Patient, UserRole::Owner] {
            let caller = identity(role);
            for action in all_actions_for(other) {
                assert_eq!(
                    authorize(&caller, &action),
                    Err(Denial::Forbidden),
                    "{:?} as {:?}",
                    action,
                    role
                );
            }
        }
    }

    #[test]
    fn owner_may_mutate_own_clinic_only() {
        let owner = identity(UserRole::Owner);
        assert_eq!(
            authorize(
                &owner,
                &Action::MutateClinic {
                    owner_id: Some(owner.id)
                }
            ),
            Ok(())
        );
        assert_eq!(
            authorize(&owner, &Action::MutateClinic { owner_id: None }),
            Err(Denial::Forbidden)
        );
    }

    #[test]
    fn patient_matching_ownership_cannot_mutate_clinic() {
        // Ownership match alone is not enough: the role rule also applies.
        let patient = identity(UserRole::Patient);
        assert_eq!(
            authorize(
                &patient,
                &Action::MutateClinic {
                    owner_id: Some(patient.id)
                }
            ),
            Err(Denial::Forbidden)
        );
    }

    #[test]
    fn patient_owns_own_appointments_and_xrays() {
        let patient = identity(UserRole::Patient);
        assert_eq!(
            authorize(
                &patient,
                &Action::ViewAppointment {
                    patient_id: patient.id
                }
            ),
            Ok(())
        );
        assert_eq!(
            authorize(
                &patient,
                &Action::CancelAppointment {
                    patient_id: patient.id
                }
            ),
            Ok(())
        );
        assert_eq!(
            authorize(
                &patient,
                &Action::AccessXray {
                    patient_user_id: patient.id
                }
            ),
            Ok(())
        );
    }

    #[test]
    fn owner_finalizes_only_for_owned_clinic() {
        let owner = identity(UserRole::Owner);
        assert_eq!(
            authorize(
                &owner,
                &Action::FinalizeAppointment {
                    clinic_owner_id: Some(owner.id)
                }
            ),
            Ok(())
        );
        assert_eq!(
            authorize(
                &owner,
                &Action::FinalizeAppointment {
                    clinic_owner_id: Some(Uuid::new_v4())
                }
            ),
            Err(Denial::Forbidden)
        );
    }

    #[test]
    fn owner_role_required_for_patient_listing() {
        assert_eq!(
            authorize(&identity(UserRole::Owner), &Action::ListClinicPatients),
            Ok(())
        );
        assert_eq!(
            authorize(&identity(UserRole::Patient), &Action::ListClinicPatients),
            Err(Denial::Forbidden)
        );
    }

    #[test]
    fn role_requirement_is_degenerate_case() {
        let patient = identity(UserRole::Patient);
        assert_eq!(require_role(&patient, None), Ok(()));
        assert_eq!(require_role(&patient, Some(UserRole::Patient)), Ok(()));
        assert_eq!(
            require_role(&patient, Some(UserRole::Owner)),
            Err(Denial::WrongRole)
        );
        // Admin passes any requirement.
        assert_eq!(
            require_role(&identity(UserRole::Admin), Some(UserRole::Patient)),
            Ok(())
        );
    }
}
