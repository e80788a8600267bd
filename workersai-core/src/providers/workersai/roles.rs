//! Role mapping between canonical roles and provider role tokens

use crate::protocol::Role;

/// Convert a canonical role to the provider's role token
///
/// Unknown roles map to `"user"` rather than failing; existing callers rely
/// on this.
pub fn to_wire_role(role: &Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Model => "assistant",
        Role::System => "system",
        Role::Tool => "tool",
        Role::Unknown(token) => {
            tracing::warn!("Unknown role '{}' sent as 'user'", token);
            "user"
        }
    }
}

/// Convert a provider role token back to a canonical role
pub fn from_wire_role(token: &str) -> Role {
    match token {
        "user" => Role::User,
        "assistant" => Role::Model,
        "system" => Role::System,
        "tool" => Role::Tool,
        other => Role::Unknown(other.to_string()),
    }
}

/// Label used for a role in a flattened prompt
pub fn prompt_label(role: &Role) -> &'static str {
    match to_wire_role(role) {
        "system" => "System",
        "assistant" => "Assistant",
        _ => "User",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Role::User, "user" ; "user")]
    #[test_case(Role::Model, "assistant" ; "model")]
    #[test_case(Role::System, "system" ; "system")]
    #[test_case(Role::Tool, "tool" ; "tool")]
    #[test_case(Role::Unknown("critic".into()), "user" ; "unknown defaults to user")]
    fn test_to_wire_role(role: Role, expected: &str) {
        assert_eq!(to_wire_role(&role), expected);
    }

    #[test]
    fn test_wire_roles_map_back() {
        for role in [Role::User, Role::Model, Role::System, Role::Tool] {
            assert_eq!(from_wire_role(to_wire_role(&role)), role);
        }
        assert_eq!(from_wire_role("function"), Role::Unknown("function".to_string()));
    }

    #[test]
    fn test_prompt_labels() {
        assert_eq!(prompt_label(&Role::System), "System");
        assert_eq!(prompt_label(&Role::Model), "Assistant");
        assert_eq!(prompt_label(&Role::User), "User");
        assert_eq!(prompt_label(&Role::Unknown("x".into())), "User");
    }
}
