//! # Skill Catalog
//!
//! The static list of service categories the platform recognizes.
//!
//! Onboarding presents these as the multi-select, and the admin dashboard
//! resolves worker category identifiers back to display metadata. Identifiers
//! stored on worker rows are expected to come from this list, but nothing
//! enforces that: unrecognized identifiers degrade to displaying the raw
//! value.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skill {
    pub value: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub rate: &'static str,
}

pub const SKILL_OPTIONS: [Skill; 10] = [
    Skill { value: "plumber", label: "Plumber", icon: "🔧", rate: "₹200-500/hr" },
    Skill { value: "electrician", label: "Electrician", icon: "⚡", rate: "₹250-600/hr" },
    Skill { value: "carpenter", label: "Carpenter", icon: "🔨", rate: "₹300-700/hr" },
    Skill { value: "painter", label: "Painter", icon: "🎨", rate: "₹200-450/hr" },
    Skill { value: "cleaner", label: "Cleaner", icon: "🧹", rate: "₹150-300/hr" },
    Skill { value: "cook", label: "Cook", icon: "🍳", rate: "₹200-400/hr" },
    Skill { value: "driver", label: "Driver", icon: "🚗", rate: "₹300-800/hr" },
    Skill { value: "gardener", label: "Gardener", icon: "🌱", rate: "₹200-400/hr" },
    Skill { value: "ac_technician", label: "AC Technician", icon: "❄️", rate: "₹300-600/hr" },
    Skill { value: "appliance_repair", label: "Appliance Repair", icon: "🛠️", rate: "₹250-500/hr" },
];

pub fn find(value: &str) -> Option<&'static Skill> {
    SKILL_OPTIONS.iter().find(|s| s.value == value)
}

pub fn is_known(value: &str) -> bool {
    find(value).is_some()
}

/// Display label for a skill identifier, falling back to the identifier
/// itself when it is not in the catalog.
pub fn label_for(value: &str) -> &str {
    match find(value) {
        Some(skill) => skill.label,
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_known() {
        let skill = find("plumber").unwrap();
        assert_eq!(skill.label, "Plumber");
        assert_eq!(skill.icon, "🔧");
    }

    #[test]
    fn test_find_unknown() {
        assert!(find("astronaut").is_none());
        assert!(!is_known("astronaut"));
    }

    #[test]
    fn test_label_degrades_to_identifier() {
        assert_eq!(label_for("ac_technician"), "AC Technician");
        assert_eq!(label_for("blacksmith"), "blacksmith");
    }

    #[test]
    fn test_values_are_unique() {
        for (i, a) in SKILL_OPTIONS.iter().enumerate() {
            for b in &SKILL_OPTIONS[i + 1..] {
                assert_ne!(a.value, b.value);
            }
        }
    }
}
