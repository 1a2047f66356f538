use crate::error::StudioError;

/// A named persona whose text becomes the system message for chat requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Role {
    pub name: &'static str,
    pub system_prompt: &'static str,
}

const ROLES: [Role; 5] = [
    Role {
        name: "Film Critic",
        system_prompt: "You are a sharp and insightful film critic with expertise in film analysis and visual storytelling.",
    },
    Role {
        name: "Fashion Consultant",
        system_prompt: "You are an energetic fashion consultant giving trendy and personalized style advice.",
    },
    Role {
        name: "Dance Coach",
        system_prompt: "You are a professional dance coach giving detailed guidance on rhythm, moves, and stage performance.",
    },
    Role {
        name: "Digital Artist",
        system_prompt: "You are a digital artist providing vivid, imaginative prompts for visual art and image creation.",
    },
    Role {
        name: "Creative Writing Mentor",
        system_prompt: "You are a creative writing mentor helping craft emotional, vivid, and expressive writing.",
    },
];

/// The fixed set of personas, defined at compile time.
///
/// Lookup is total over the five known names; anything else is a
/// configuration error, which the closed picker in the UI never produces.
pub struct RoleRegistry {
    roles: &'static [Role],
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self { roles: &ROLES }
    }

    pub fn lookup(&self, name: &str) -> Result<&Role, StudioError> {
        self.roles
            .iter()
            .find(|role| role.name == name)
            .ok_or_else(|| StudioError::UnknownRole(name.to_string()))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.roles.iter().map(|role| role.name).collect()
    }

    pub fn default_role(&self) -> &Role {
        &self.roles[0]
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_role_has_a_distinct_nonempty_prompt() {
        let registry = RoleRegistry::new();
        let names = registry.names();
        assert_eq!(names.len(), 5);

        let mut prompts = HashSet::new();
        for name in names {
            let role = registry.lookup(name).unwrap();
            assert!(!role.system_prompt.trim().is_empty());
            assert!(prompts.insert(role.system_prompt));
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        let registry = RoleRegistry::new();
        let err = registry.lookup("Stand-up Comedian").unwrap_err();
        assert!(matches!(err, StudioError::UnknownRole(_)));
        assert!(err.to_string().contains("Stand-up Comedian"));
    }

    #[test]
    fn default_role_is_in_the_registry() {
        let registry = RoleRegistry::new();
        let default = registry.default_role().name;
        assert!(registry.lookup(default).is_ok());
    }
}
