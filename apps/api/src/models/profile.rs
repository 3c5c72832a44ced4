use serde::{Deserialize, Serialize};

/// Contact block shown in every document header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub links: Vec<String>,
}

/// A single position held by the candidate. `start`/`end` are free-form
/// (usually `YYYY-MM`); an empty `end` means the role is current.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub stack: Vec<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub school: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub period: String,
}

/// The candidate's source of truth. Every fact the generated documents state
/// about employers, schools and dates must trace back to this record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub contacts: Contact,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<Role>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_profile_fills_defaults() {
        let profile: Profile = serde_json::from_str(r#"{"name": "Ada Lovelace"}"#).unwrap();
        assert_eq!(profile.name, "Ada Lovelace");
        assert!(profile.experience.is_empty());
        assert_eq!(profile.contacts, Contact::default());
    }

    #[test]
    fn test_role_without_dates_is_current() {
        let role: Role =
            serde_json::from_str(r#"{"title": "Engineer", "company": "Acme Corp"}"#).unwrap();
        assert!(role.end.is_empty());
        assert!(role.bullets.is_empty());
    }

    #[test]
    fn test_role_requires_company() {
        let result: Result<Role, _> = serde_json::from_str(r#"{"title": "Engineer"}"#);
        assert!(result.is_err(), "Role without company must fail deserialization");
    }
}
