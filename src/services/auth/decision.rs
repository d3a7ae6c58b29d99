use serde::Serialize;

/// Principal reported on every Deny. The token's own `sub` is never echoed
/// back unless its signature and claims checked out.
pub const DENY_PRINCIPAL: &str = "user";

pub const POLICY_VERSION: &str = "2012-10-17";
pub const INVOKE_ACTION: &str = "execute-api:Invoke";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// Outcome of one authorization attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    principal_id: String,
    effect: Effect,
    resource: String,
}

impl Decision {
    pub fn allow(principal_id: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            principal_id: principal_id.into(),
            effect: Effect::Allow,
            resource: resource.into(),
        }
    }

    pub fn deny(resource: impl Into<String>) -> Self {
        Self {
            principal_id: DENY_PRINCIPAL.to_string(),
            effect: Effect::Deny,
            resource: resource.into(),
        }
    }

    pub fn principal_id(&self) -> &str {
        &self.principal_id
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn is_allow(&self) -> bool {
        self.effect == Effect::Allow
    }

    /// Gateway-style policy rendering of this decision.
    pub fn policy(&self) -> AuthorizerPolicy {
        AuthorizerPolicy {
            principal_id: self.principal_id.clone(),
            policy_document: PolicyDocument {
                version: POLICY_VERSION,
                statement: vec![PolicyStatement {
                    action: INVOKE_ACTION,
                    effect: self.effect,
                    resource: self.resource.clone(),
                }],
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerPolicy {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: &'static str,
    pub statement: Vec<PolicyStatement>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub action: &'static str,
    pub effect: Effect,
    pub resource: String,
}
