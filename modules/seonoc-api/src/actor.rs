use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use seonoc_common::types::{ActorRef, SeoNetwork, VisibilityMode};
use seonoc_common::NocError;

use crate::error::ApiError;

/// Identity forwarded by the external auth layer. Authentication itself is
/// out of scope; the gateway sets these headers after verifying the JWT.
#[derive(Debug, Clone)]
pub struct Actor {
    pub actor: ActorRef,
    pub role: String,
}

impl Actor {
    pub fn is_super_admin(&self) -> bool {
        self.role == "super_admin"
    }

    /// Restricted networks are writable by their managers and super admins
    /// only.
    pub fn ensure_network_access(&self, network: &SeoNetwork) -> Result<(), NocError> {
        if network.visibility_mode == VisibilityMode::Restricted
            && !self.is_super_admin()
            && !network.manager_ids.contains(&self.actor.user_id)
        {
            return Err(NocError::Authorization(format!(
                "network {} is restricted to its managers",
                network.name
            )));
        }
        Ok(())
    }
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| -> Option<String> {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let email = header("x-actor-email").ok_or_else(|| {
            ApiError(NocError::Authorization(
                "missing actor identity headers".to_string(),
            ))
        })?;
        Ok(Actor {
            actor: ActorRef {
                user_id: header("x-actor-id").unwrap_or_else(|| email.clone()),
                display_name: header("x-actor-name").unwrap_or_default(),
                email,
            },
            role: header("x-actor-role").unwrap_or_else(|| "member".to_string()),
        })
    }
}
