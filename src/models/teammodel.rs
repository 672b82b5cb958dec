use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkillLevel {
    Entry,
    Intermediate,
    Expert,
}

impl SkillLevel {
    pub fn to_str(&self) -> &str {
        match self {
            SkillLevel::Entry => "entry",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Expert => "expert",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SkillSlot {
    pub skill_slot_id: i64,
    pub specialization_id: i64,
    pub specialization_name: String,
    pub workers_needed: u32,
    pub skill_level_required: SkillLevel,
    pub budget_allocated: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AgencyEmployee {
    pub employee_id: i64,
    pub name: String,
    #[serde(default)]
    pub specializations: Vec<String>,
    pub rating: Option<f64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl AgencyEmployee {
    pub fn has_specialization(&self, specialization: &str) -> bool {
        self.specializations
            .iter()
            .any(|s| s.trim().eq_ignore_ascii_case(specialization.trim()))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SlotAssignment {
    pub skill_slot_id: i64,
    pub employee_ids: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UnmetSlot {
    pub skill_slot_id: i64,
    pub specialization_name: String,
    pub selected: u32,
    pub workers_needed: u32,
}

impl std::fmt::Display for UnmetSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}/{} selected",
            self.specialization_name, self.selected, self.workers_needed
        )
    }
}
