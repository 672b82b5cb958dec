// service/team_assignment_service.rs
use std::collections::BTreeMap;

use thiserror::Error;

use crate::{
    client::ApiClient,
    dtos::{jobdtos::AssignEmployeesDto, responsedtos::CommandResponse},
    models::teammodel::{AgencyEmployee, SkillSlot, SlotAssignment, UnmetSlot},
    service::error::ServiceError,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    #[error("Skill slot {0} is not part of this job")]
    UnknownSlot(i64),

    #[error("Employee {0} is not on the agency roster")]
    UnknownEmployee(i64),

    #[error("{name} is not an active employee")]
    InactiveEmployee { employee_id: i64, name: String },

    #[error("{name} does not have the {specialization} specialization")]
    NotQualified {
        employee_id: i64,
        name: String,
        specialization: String,
    },

    #[error("{name} is already assigned to another skill slot ({skill_slot_id})")]
    AlreadyAssigned {
        employee_id: i64,
        name: String,
        skill_slot_id: i64,
    },

    #[error("{specialization} already has all {workers_needed} workers selected")]
    SlotFull {
        skill_slot_id: i64,
        specialization: String,
        workers_needed: u32,
    },

    #[error("Employee {0} is not selected for any skill slot")]
    NotSelected(i64),

    #[error("Select at least one employee")]
    NoSelection,

    #[error("Not every skill slot is fully staffed: {}", list_unmet(.0))]
    Unmet(Vec<UnmetSlot>),
}

fn list_unmet(slots: &[UnmetSlot]) -> String {
    slots
        .iter()
        .map(|slot| slot.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Local selection state for staffing an agency team job.
///
/// An employee sits in at most one slot, and no slot holds more than it
/// needs. The primary contact is always one of the selected employees.
#[derive(Debug, Clone)]
pub struct TeamAssignment {
    job_id: i64,
    slots: Vec<SkillSlot>,
    employees: Vec<AgencyEmployee>,
    selections: BTreeMap<i64, Vec<i64>>,
    selection_order: Vec<i64>,
    primary_contact: Option<i64>,
}

impl TeamAssignment {
    pub fn new(job_id: i64, slots: Vec<SkillSlot>, employees: Vec<AgencyEmployee>) -> Self {
        let selections = slots
            .iter()
            .map(|slot| (slot.skill_slot_id, Vec::new()))
            .collect();

        Self {
            job_id,
            slots,
            employees,
            selections,
            selection_order: Vec::new(),
            primary_contact: None,
        }
    }

    pub fn job_id(&self) -> i64 {
        self.job_id
    }

    pub fn slots(&self) -> &[SkillSlot] {
        &self.slots
    }

    pub fn selected(&self, skill_slot_id: i64) -> &[i64] {
        self.selections
            .get(&skill_slot_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn slot_of(&self, employee_id: i64) -> Option<i64> {
        self.selections
            .iter()
            .find(|(_, ids)| ids.contains(&employee_id))
            .map(|(slot_id, _)| *slot_id)
    }

    pub fn primary_contact(&self) -> Option<i64> {
        self.primary_contact
    }

    fn slot(&self, skill_slot_id: i64) -> Result<&SkillSlot, AssignmentError> {
        self.slots
            .iter()
            .find(|slot| slot.skill_slot_id == skill_slot_id)
            .ok_or(AssignmentError::UnknownSlot(skill_slot_id))
    }

    fn employee(&self, employee_id: i64) -> Result<&AgencyEmployee, AssignmentError> {
        self.employees
            .iter()
            .find(|e| e.employee_id == employee_id)
            .ok_or(AssignmentError::UnknownEmployee(employee_id))
    }

    /// Employees who can be picked for a slot: active, qualified, and not
    /// already taken by a different slot.
    pub fn eligible_employees(
        &self,
        skill_slot_id: i64,
    ) -> Result<Vec<&AgencyEmployee>, AssignmentError> {
        let slot = self.slot(skill_slot_id)?;

        Ok(self
            .employees
            .iter()
            .filter(|e| e.is_active && e.has_specialization(&slot.specialization_name))
            .filter(|e| match self.slot_of(e.employee_id) {
                Some(other) => other == skill_slot_id,
                None => true,
            })
            .collect())
    }

    pub fn select(&mut self, skill_slot_id: i64, employee_id: i64) -> Result<(), AssignmentError> {
        let slot = self.slot(skill_slot_id)?;
        let employee = self.employee(employee_id)?;

        if let Some(current) = self.slot_of(employee_id) {
            if current == skill_slot_id {
                return Ok(());
            }
            return Err(AssignmentError::AlreadyAssigned {
                employee_id,
                name: employee.name.clone(),
                skill_slot_id: current,
            });
        }

        if !employee.is_active {
            return Err(AssignmentError::InactiveEmployee {
                employee_id,
                name: employee.name.clone(),
            });
        }

        if !employee.has_specialization(&slot.specialization_name) {
            return Err(AssignmentError::NotQualified {
                employee_id,
                name: employee.name.clone(),
                specialization: slot.specialization_name.clone(),
            });
        }

        if self.selected(skill_slot_id).len() as u32 >= slot.workers_needed {
            return Err(AssignmentError::SlotFull {
                skill_slot_id,
                specialization: slot.specialization_name.clone(),
                workers_needed: slot.workers_needed,
            });
        }

        self.selections
            .entry(skill_slot_id)
            .or_default()
            .push(employee_id);
        self.selection_order.push(employee_id);

        if self.primary_contact.is_none() {
            self.primary_contact = Some(employee_id);
        }

        Ok(())
    }

    /// Returns whether the employee was selected in that slot.
    pub fn deselect(&mut self, skill_slot_id: i64, employee_id: i64) -> Result<bool, AssignmentError> {
        self.slot(skill_slot_id)?;

        let Some(ids) = self.selections.get_mut(&skill_slot_id) else {
            return Ok(false);
        };
        let Some(position) = ids.iter().position(|id| *id == employee_id) else {
            return Ok(false);
        };

        ids.remove(position);
        self.selection_order.retain(|id| *id != employee_id);

        if self.primary_contact == Some(employee_id) {
            self.primary_contact = self.selection_order.first().copied();
        }

        Ok(true)
    }

    /// Flips an employee in or out of a slot; returns the new membership.
    pub fn toggle(&mut self, skill_slot_id: i64, employee_id: i64) -> Result<bool, AssignmentError> {
        if self.selected(skill_slot_id).contains(&employee_id) {
            self.deselect(skill_slot_id, employee_id)?;
            Ok(false)
        } else {
            self.select(skill_slot_id, employee_id)?;
            Ok(true)
        }
    }

    pub fn set_primary_contact(&mut self, employee_id: i64) -> Result<(), AssignmentError> {
        if self.slot_of(employee_id).is_none() {
            return Err(AssignmentError::NotSelected(employee_id));
        }
        self.primary_contact = Some(employee_id);
        Ok(())
    }

    pub fn unmet_slots(&self) -> Vec<UnmetSlot> {
        self.slots
            .iter()
            .filter_map(|slot| {
                let selected = self.selected(slot.skill_slot_id).len() as u32;
                (selected != slot.workers_needed).then(|| UnmetSlot {
                    skill_slot_id: slot.skill_slot_id,
                    specialization_name: slot.specialization_name.clone(),
                    selected,
                    workers_needed: slot.workers_needed,
                })
            })
            .collect()
    }

    pub fn submission(&self) -> Result<AssignEmployeesDto, AssignmentError> {
        let unmet = self.unmet_slots();
        if !unmet.is_empty() {
            return Err(AssignmentError::Unmet(unmet));
        }

        let primary_contact_id = self.primary_contact.ok_or(AssignmentError::NoSelection)?;

        let assignments = self
            .slots
            .iter()
            .map(|slot| SlotAssignment {
                skill_slot_id: slot.skill_slot_id,
                employee_ids: self.selected(slot.skill_slot_id).to_vec(),
            })
            .collect();

        Ok(AssignEmployeesDto {
            assignments,
            primary_contact_id,
        })
    }

    pub async fn submit(&self, client: &ApiClient) -> Result<CommandResponse, ServiceError> {
        let body = self.submission()?;

        tracing::info!(
            "Assigning {} employees to job {} (primary contact {})",
            self.selection_order.len(),
            self.job_id,
            body.primary_contact_id
        );

        client
            .assign_team_employees(self.job_id, &body)
            .await
            .map_err(|e| {
                tracing::error!("Team assignment failed for job {}: {}", self.job_id, e);
                e.into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::teammodel::SkillLevel;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn slot(id: i64, name: &str, needed: u32) -> SkillSlot {
        SkillSlot {
            skill_slot_id: id,
            specialization_id: id * 10,
            specialization_name: name.to_string(),
            workers_needed: needed,
            skill_level_required: SkillLevel::Intermediate,
            budget_allocated: None,
            notes: None,
        }
    }

    fn employee(id: i64, name: &str, specializations: &[&str]) -> AgencyEmployee {
        AgencyEmployee {
            employee_id: id,
            name: name.to_string(),
            specializations: specializations.iter().map(|s| s.to_string()).collect(),
            rating: Some(4.5),
            is_active: true,
        }
    }

    fn team() -> TeamAssignment {
        TeamAssignment::new(
            55,
            vec![slot(1, "Plumbing", 2), slot(2, "Electrical", 1)],
            vec![
                employee(10, "Ana", &["Plumbing"]),
                employee(11, "Ben", &["plumbing", "Electrical"]),
                employee(12, "Carlo", &["Electrical"]),
                employee(13, "Dina", &["Carpentry"]),
            ],
        )
    }

    #[test]
    fn eligibility_filters_specialization_and_other_slots() {
        let mut team = team();
        let names = |team: &TeamAssignment, slot| {
            team.eligible_employees(slot)
                .unwrap()
                .iter()
                .map(|e| e.name.clone())
                .collect::<Vec<_>>()
        };

        assert_eq!(names(&team, 1), vec!["Ana", "Ben"]);
        assert_eq!(names(&team, 2), vec!["Ben", "Carlo"]);

        team.select(2, 11).unwrap();
        assert_eq!(names(&team, 1), vec!["Ana"]);
        assert_eq!(names(&team, 2), vec!["Ben", "Carlo"]);
    }

    #[test]
    fn employee_cannot_sit_in_two_slots() {
        let mut team = team();
        team.select(1, 11).unwrap();

        assert_eq!(
            team.select(2, 11),
            Err(AssignmentError::AlreadyAssigned {
                employee_id: 11,
                name: "Ben".to_string(),
                skill_slot_id: 1,
            })
        );
        assert!(team.selected(2).is_empty());
    }

    #[test]
    fn slot_cannot_exceed_workers_needed() {
        let mut team = team();
        team.select(2, 12).unwrap();

        assert!(matches!(
            team.select(2, 11),
            Err(AssignmentError::SlotFull { skill_slot_id: 2, workers_needed: 1, .. })
        ));
        assert!(matches!(
            team.select(1, 13),
            Err(AssignmentError::NotQualified { employee_id: 13, .. })
        ));
    }

    #[test]
    fn submission_blocked_until_every_slot_is_full() {
        let mut team = team();
        team.select(1, 10).unwrap();
        team.select(2, 12).unwrap();

        match team.submission() {
            Err(AssignmentError::Unmet(unmet)) => {
                assert_eq!(unmet.len(), 1);
                assert_eq!(unmet[0].to_string(), "Plumbing: 1/2 selected");
            }
            other => panic!("unexpected {:?}", other),
        }

        team.select(1, 11).unwrap();
        let body = team.submission().unwrap();
        assert_eq!(body.primary_contact_id, 10);
        assert_eq!(
            body.assignments,
            vec![
                SlotAssignment { skill_slot_id: 1, employee_ids: vec![10, 11] },
                SlotAssignment { skill_slot_id: 2, employee_ids: vec![12] },
            ]
        );
    }

    #[test]
    fn primary_contact_follows_selection() {
        let mut team = team();
        assert_eq!(team.primary_contact(), None);

        team.select(1, 10).unwrap();
        team.select(2, 12).unwrap();
        team.select(1, 11).unwrap();
        assert_eq!(team.primary_contact(), Some(10));

        team.set_primary_contact(11).unwrap();
        assert_eq!(team.primary_contact(), Some(11));
        assert_eq!(team.set_primary_contact(13), Err(AssignmentError::NotSelected(13)));

        assert_eq!(team.toggle(1, 11), Ok(false));
        assert_eq!(team.primary_contact(), Some(10));

        team.deselect(1, 10).unwrap();
        assert_eq!(team.primary_contact(), Some(12));

        team.deselect(2, 12).unwrap();
        assert_eq!(team.primary_contact(), None);
    }

    #[tokio::test]
    async fn submit_posts_assignments() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/agency/jobs/55/assign-employees"))
            .and(body_json(json!({
                "assignments": [
                    { "skill_slot_id": 1, "employee_ids": [10, 11] },
                    { "skill_slot_id": 2, "employee_ids": [12] }
                ],
                "primary_contact_id": 10
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        let mut team = team();
        team.select(1, 10).unwrap();
        team.select(1, 11).unwrap();
        team.select(2, 12).unwrap();

        let client = ApiClient::new(server.uri(), None, Duration::from_secs(5)).unwrap();
        let response = team.submit(&client).await.unwrap();
        assert!(response.success);
    }

    #[tokio::test]
    async fn incomplete_team_is_never_posted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let team = team();
        let client = ApiClient::new(server.uri(), None, Duration::from_secs(5)).unwrap();
        let err = team.submit(&client).await.unwrap_err();
        assert!(matches!(err, ServiceError::Assignment(AssignmentError::Unmet(_))));
    }
}
