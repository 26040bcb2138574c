//! Profiles — role-tagged descriptive payloads attached to actors.
//!
//! An actor's profile shape is decided once by its role tag: Company actors
//! carry a company profile, everyone else a person profile. The variant name
//! doubles as the discriminant stored alongside the JSON payload.

use serde::{Deserialize, Serialize};

use crate::actor::{Actor, Role};

/// The typed profile payload. The variant name serves as the `kind`
/// discriminant stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Profile {
  Person {
    phone:    Option<String>,
    headline: Option<String>,
    location: Option<String>,
  },
  Company {
    company_name: String,
    website:      Option<String>,
    about:        Option<String>,
  },
}

impl Profile {
  /// The discriminant string stored in the `kind` column.
  /// Must match the `rename_all = "snake_case"` serde tags above.
  pub fn discriminant(&self) -> &'static str {
    match self {
      Self::Person { .. } => "person",
      Self::Company { .. } => "company",
    }
  }

  /// A profile kind is valid only for the matching role tag.
  pub fn matches_role(&self, role: Role) -> bool {
    match self {
      Self::Person { .. } => {
        matches!(role, Role::Employee | Role::Employer)
      }
      Self::Company { .. } => matches!(role, Role::Company),
    }
  }

  /// Serialise the inner payload (without the kind tag) for the database
  /// column.
  pub fn to_json(&self) -> crate::Result<serde_json::Value> {
    let full = serde_json::to_value(self)?;
    Ok(full.get("data").cloned().unwrap_or(serde_json::Value::Null))
  }

  /// Deserialise from the discriminant string and JSON payload stored in the
  /// database.
  pub fn from_parts(
    discriminant: &str,
    data: serde_json::Value,
  ) -> crate::Result<Self> {
    let wrapped = serde_json::json!({ "kind": discriminant, "data": data });
    Ok(serde_json::from_value(wrapped)?)
  }
}

/// Resolve the name shown for an actor: a Company actor with a company
/// profile shows its company name, everyone else their own full name.
pub fn display_name(actor: &Actor, profile: Option<&Profile>) -> String {
  if let Some(Profile::Company { company_name, .. }) = profile
    && actor.role == Role::Company
    && !company_name.trim().is_empty()
  {
    return company_name.clone();
  }
  actor.full_name()
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;

  fn actor(role: Role) -> Actor {
    Actor {
      actor_id:   Uuid::new_v4(),
      email:      "a@example.com".into(),
      first_name: "Ada".into(),
      last_name:  "Lovelace".into(),
      role,
      verified:   true,
      created_at: Utc::now(),
    }
  }

  #[test]
  fn payload_round_trip() {
    let profile = Profile::Company {
      company_name: "Acme".into(),
      website:      Some("https://acme.test".into()),
      about:        None,
    };
    let json = profile.to_json().unwrap();
    let back = Profile::from_parts(profile.discriminant(), json).unwrap();
    assert!(
      matches!(back, Profile::Company { company_name, .. } if company_name == "Acme")
    );
  }

  #[test]
  fn kind_matches_role() {
    let person = Profile::Person {
      phone:    None,
      headline: None,
      location: None,
    };
    assert!(person.matches_role(Role::Employee));
    assert!(person.matches_role(Role::Employer));
    assert!(!person.matches_role(Role::Company));

    let company = Profile::Company {
      company_name: "Acme".into(),
      website:      None,
      about:        None,
    };
    assert!(company.matches_role(Role::Company));
    assert!(!company.matches_role(Role::Employee));
  }

  #[test]
  fn display_name_prefers_company_profile() {
    let company_actor = actor(Role::Company);
    let profile = Profile::Company {
      company_name: "Acme Robotics".into(),
      website:      None,
      about:        None,
    };
    assert_eq!(
      display_name(&company_actor, Some(&profile)),
      "Acme Robotics"
    );

    // Blank company name falls back to the actor's own name.
    let blank = Profile::Company {
      company_name: "  ".into(),
      website:      None,
      about:        None,
    };
    assert_eq!(display_name(&company_actor, Some(&blank)), "Ada Lovelace");

    // Person actors always use their own name.
    assert_eq!(display_name(&actor(Role::Employee), None), "Ada Lovelace");
  }
}
