//! Invitation domain models.
//!
//! Invitations are codes a member hands out to admit new users into a
//! circle. Codes are globally unique, generated server-side and never
//! mutated after creation. The redemption flow lives outside this core.

use serde::Serialize;

/// Response for the list-or-issue endpoint: all codes the member holds
/// for the circle, newly issued ones included.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListInvitationsResponse {
    pub invitations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_serialization() {
        let response = ListInvitationsResponse {
            invitations: vec!["ABC123....".to_string(), "XYZ-99.AB-".to_string()],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["invitations"].as_array().unwrap().len(), 2);
    }
}
