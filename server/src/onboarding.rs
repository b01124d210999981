//! Worker onboarding wizard.
//!
//! Three steps, strictly forward: basic info, skill selection, done. Nothing
//! is written to the store until every required field, including at least one
//! skill, has passed its guard; [`Wizard::submit_skills`] then yields the one
//! complete row for the caller to insert.

use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

use crate::{models::NewWorker, utils::sanitize_phone};

pub const CODE_PREFIX: &str = "Wrk";

const CODE_SUFFIX_LEN: usize = 8;
const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Opaque display code for a new worker. Not checked for collisions against
/// existing rows; treat it as a display convenience, not a uniqueness
/// guarantee.
pub fn generate_worker_code() -> String {
    let mut rng = rand::thread_rng();

    let suffix: String = (0..CODE_SUFFIX_LEN)
        .map(|_| CODE_CHARSET[rng.gen_range(0..CODE_CHARSET.len())] as char)
        .collect();

    format!("{CODE_PREFIX}{suffix}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Basic,
    Skills,
    Complete,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BasicInfo {
    pub full_name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub address: String,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WizardError {
    #[error("Phone, Name & Address are required")]
    MissingBasicInfo,

    #[error("Phone number must be 10 digits")]
    InvalidPhone,

    #[error("Select at least one skill")]
    NoSkillsSelected,

    #[error("Step out of order")]
    OutOfOrder,
}

pub struct Wizard {
    step: Step,
    basic: Option<BasicInfo>,
    worker_code: Option<String>,
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            step: Step::Basic,
            basic: None,
            worker_code: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    /// Code shown on the completion screen, present once `Complete` is
    /// reached.
    pub fn worker_code(&self) -> Option<&str> {
        self.worker_code.as_deref()
    }

    /// First step. Name, phone, and address must be non-empty and the phone
    /// must survive digit-filtering as exactly ten digits. On failure the
    /// wizard stays in `Basic` and nothing is persisted.
    pub fn submit_basic(&mut self, mut info: BasicInfo) -> Result<(), WizardError> {
        if self.step != Step::Basic {
            return Err(WizardError::OutOfOrder);
        }

        if info.full_name.trim().is_empty()
            || info.phone.trim().is_empty()
            || info.address.trim().is_empty()
        {
            return Err(WizardError::MissingBasicInfo);
        }

        let phone = sanitize_phone(&info.phone);
        if phone.len() != 10 {
            return Err(WizardError::InvalidPhone);
        }

        info.phone = phone;
        self.basic = Some(info);
        self.step = Step::Skills;

        Ok(())
    }

    /// Second step. Requires at least one selected skill and yields the
    /// complete worker row; the wizard moves to `Complete` and keeps the
    /// generated code for display.
    pub fn submit_skills(&mut self, skills: Vec<String>) -> Result<NewWorker, WizardError> {
        if self.step != Step::Skills {
            return Err(WizardError::OutOfOrder);
        }

        if skills.is_empty() {
            return Err(WizardError::NoSkillsSelected);
        }

        let basic = self.basic.take().ok_or(WizardError::OutOfOrder)?;
        let code = generate_worker_code();

        self.worker_code = Some(code.clone());
        self.step = Step::Complete;

        Ok(NewWorker {
            worker_code: code,
            full_name: basic.full_name,
            phone: basic.phone,
            email: basic.email.filter(|e| !e.trim().is_empty()),
            address: basic.address,
            categories: skills,
        })
    }

    /// Full reset back to `Basic`, clearing all collected state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic() -> BasicInfo {
        BasicInfo {
            full_name: "Ramesh Kumar".to_string(),
            phone: "98765 43210".to_string(),
            email: None,
            address: "Pune".to_string(),
        }
    }

    #[test]
    fn test_happy_path() {
        let mut wizard = Wizard::new();

        wizard.submit_basic(basic()).unwrap();
        assert_eq!(wizard.step(), Step::Skills);

        let worker = wizard
            .submit_skills(vec!["plumber".to_string(), "driver".to_string()])
            .unwrap();

        assert_eq!(wizard.step(), Step::Complete);
        assert_eq!(worker.phone, "9876543210");
        assert_eq!(worker.categories, vec!["plumber", "driver"]);
        assert_eq!(wizard.worker_code(), Some(worker.worker_code.as_str()));
    }

    #[test]
    fn test_empty_address_blocks_transition() {
        let mut wizard = Wizard::new();
        let info = BasicInfo {
            address: "  ".to_string(),
            ..basic()
        };

        assert_eq!(
            wizard.submit_basic(info),
            Err(WizardError::MissingBasicInfo)
        );
        assert_eq!(wizard.step(), Step::Basic);
    }

    #[test]
    fn test_short_phone_blocks_transition() {
        let mut wizard = Wizard::new();
        let info = BasicInfo {
            phone: "12345".to_string(),
            ..basic()
        };

        assert_eq!(wizard.submit_basic(info), Err(WizardError::InvalidPhone));
        assert_eq!(wizard.step(), Step::Basic);
    }

    #[test]
    fn test_no_skills_blocks_transition() {
        let mut wizard = Wizard::new();
        wizard.submit_basic(basic()).unwrap();

        assert_eq!(
            wizard.submit_skills(Vec::new()),
            Err(WizardError::NoSkillsSelected)
        );
        assert_eq!(wizard.step(), Step::Skills);
    }

    #[test]
    fn test_strictly_forward() {
        let mut wizard = Wizard::new();

        assert_eq!(
            wizard.submit_skills(vec!["cook".to_string()]),
            Err(WizardError::OutOfOrder)
        );

        wizard.submit_basic(basic()).unwrap();
        assert_eq!(wizard.submit_basic(basic()), Err(WizardError::OutOfOrder));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut wizard = Wizard::new();
        wizard.submit_basic(basic()).unwrap();
        wizard.submit_skills(vec!["cook".to_string()]).unwrap();

        wizard.reset();

        assert_eq!(wizard.step(), Step::Basic);
        assert!(wizard.worker_code().is_none());
    }

    #[test]
    fn test_code_shape() {
        let code = generate_worker_code();

        assert!(code.starts_with(CODE_PREFIX));
        assert_eq!(code.len(), CODE_PREFIX.len() + 8);
        assert!(code[CODE_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
