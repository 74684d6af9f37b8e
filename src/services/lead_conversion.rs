use std::sync::Arc;

use crate::errors::DomainError;
use crate::stores::LeadStore;
use crate::types::internal::{LeadStatus, Session};

/// The lead's captured fields, handed forward to pre-populate member
/// creation after a confirmed conversion.
#[derive(Debug, Clone)]
pub struct CapturedLead {
    pub lead_id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

/// The one multi-step workflow in the system.
///
/// Confirming marks the lead CONVERTED and returns its captured fields;
/// creating the member from those fields is a separate, independently
/// failing step the caller drives. Nothing spans the two writes: a
/// CONVERTED lead with no member is an accepted outcome if the second
/// step is abandoned.
pub struct LeadConversionService {
    leads: Arc<LeadStore>,
}

impl LeadConversionService {
    pub fn new(leads: Arc<LeadStore>) -> Self {
        Self { leads }
    }

    /// Confirm the conversion decision. Stamps CONVERTED with a
    /// conversion date and hands back the fields for the member form.
    pub async fn confirm(&self, session: &Session, lead_id: &str) -> Result<CapturedLead, DomainError> {
        let lead = self
            .leads
            .get(lead_id)
            .await?
            .ok_or(DomainError::NotFound("Lead"))?;

        if let Some(status) = LeadStatus::parse(&lead.status) {
            if status.is_terminal() {
                return Err(DomainError::validation(format!(
                    "Lead is already {}",
                    status.as_str()
                )));
            }
        }

        let updated = self
            .leads
            .update_status(session, lead_id, LeadStatus::Converted)
            .await?;

        Ok(CapturedLead {
            lead_id: updated.id,
            name: updated.name,
            phone: updated.phone,
            email: updated.email,
        })
    }

    /// Decline the conversion decision: the lead is LOST.
    pub async fn decline(&self, session: &Session, lead_id: &str) -> Result<(), DomainError> {
        let lead = self
            .leads
            .get(lead_id)
            .await?
            .ok_or(DomainError::NotFound("Lead"))?;

        if let Some(status) = LeadStatus::parse(&lead.status) {
            if status.is_terminal() {
                return Err(DomainError::validation(format!(
                    "Lead is already {}",
                    status.as_str()
                )));
            }
        }

        self.leads
            .update_status(session, lead_id, LeadStatus::Lost)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::stores::{ActivityLogStore, NewLead};
    use crate::types::internal::LeadSource;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup() -> (Arc<LeadStore>, LeadConversionService) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");

        let activity = Arc::new(ActivityLogStore::new(db.clone()));
        let leads = Arc::new(LeadStore::new(db, activity));
        let service = LeadConversionService::new(leads.clone());
        (leads, service)
    }

    fn staff_session() -> Session {
        Session {
            user_id: "staff-1".to_string(),
            name: "Front Desk".to_string(),
            email: "desk@gym.test".to_string(),
            role: Role::Receptionist,
            permissions: Vec::new(),
            avatar: None,
        }
    }

    async fn seed_lead(leads: &LeadStore, session: &Session, name: &str) -> String {
        leads
            .create(
                session,
                NewLead {
                    name: name.to_string(),
                    phone: "9998887777".to_string(),
                    email: Some("jane@example.com".to_string()),
                    source: LeadSource::WalkIn,
                    interested_plan: None,
                    notes: None,
                    follow_up_date: None,
                },
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn confirm_converts_and_hands_captured_fields_forward() {
        let (leads, service) = setup().await;
        let session = staff_session();
        let lead_id = seed_lead(&leads, &session, "Jane Doe").await;

        let captured = service.confirm(&session, &lead_id).await.unwrap();

        assert_eq!(captured.name, "Jane Doe");
        assert_eq!(captured.phone, "9998887777");
        assert_eq!(captured.email.as_deref(), Some("jane@example.com"));

        // Status is CONVERTED with a stamp, independent of whether a
        // member is ever created from the captured fields.
        let stored = leads.get(&lead_id).await.unwrap().unwrap();
        assert_eq!(stored.status, "CONVERTED");
        assert!(stored.converted_date.is_some());
    }

    #[tokio::test]
    async fn decline_marks_lost_without_conversion_stamp() {
        let (leads, service) = setup().await;
        let session = staff_session();
        let lead_id = seed_lead(&leads, &session, "No Show").await;

        service.decline(&session, &lead_id).await.unwrap();

        let stored = leads.get(&lead_id).await.unwrap().unwrap();
        assert_eq!(stored.status, "LOST");
        assert!(stored.converted_date.is_none());
    }

    #[tokio::test]
    async fn resolved_lead_cannot_be_decided_again() {
        let (leads, service) = setup().await;
        let session = staff_session();
        let lead_id = seed_lead(&leads, &session, "Jane Doe").await;

        service.confirm(&session, &lead_id).await.unwrap();

        let again = service.confirm(&session, &lead_id).await;
        assert!(matches!(again, Err(DomainError::Validation(_))));
        let decline = service.decline(&session, &lead_id).await;
        assert!(matches!(decline, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn missing_lead_is_not_found() {
        let (_leads, service) = setup().await;
        let result = service.confirm(&staff_session(), "missing").await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }
}
