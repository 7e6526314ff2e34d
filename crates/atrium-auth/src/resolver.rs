//! The authentication resolver: request → role-scoped context.
//!
//! Two terminal paths. With a workspace filter, resolution traverses
//! `(u:User)-[:SAME_AS]->(m:Member)-[r:MEMBER_OF]->(w:Workspace)` and the
//! membership edge's `role` property becomes the context role. Without
//! one, resolution checks the global `(u:User)-[:SYSADMIN]->(c:MainConfig)`
//! edge; a user with no such edge is authenticated but unprivileged.

use std::collections::BTreeMap;

use atrium_core::entity::{labels, rels};
use atrium_core::Entity;
use atrium_graph::{parse_node, GraphClient, GraphError};
use atrium_query::{
    crud::{self, MatchOptions},
    CompiledStatement, NodePattern, Path, Props, RelPattern,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::AuthError;
use crate::roles::Role;
use crate::strategy::{select_candidate, AuthRequest, StrategyRegistry, UserFilter};

/// The per-request authorization context. Never persisted; `workspace` is
/// present only when resolution went through a membership edge.
#[derive(Debug, Clone, Serialize)]
pub struct AuthContext {
    pub user: Entity,
    pub role: Role,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<Entity>,
}

/// Resolves inbound actors against the graph.
#[derive(Clone)]
pub struct Authenticator {
    client: GraphClient,
}

impl Authenticator {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    /// Resolve a request through the ordered strategy list.
    ///
    /// The first strategy producing a candidate wins; if that candidate
    /// then fails to authenticate, the failure is terminal — later
    /// strategies are never consulted. A request no strategy claims is a
    /// denial.
    pub async fn authenticate_request(
        &self,
        request: &AuthRequest,
        strategies: &StrategyRegistry,
        workspace_filter: Option<&Props>,
    ) -> Result<Option<AuthContext>, AuthError> {
        match select_candidate(request, strategies).await? {
            Some((strategy, user_filter)) => {
                tracing::debug!(strategy, "Authentication strategy produced a candidate");
                self.authenticate(&user_filter, workspace_filter).await
            }
            None => Err(AuthError::Denied),
        }
    }

    /// Resolve a candidate identity into a context.
    ///
    /// A workspace filter selects the membership path; its absence selects
    /// the sysadmin path, whose `Ok(None)` outcome means "authenticated
    /// but unprivileged" — distinct from an unknown user, which denies.
    pub async fn authenticate(
        &self,
        user_filter: &UserFilter,
        workspace_filter: Option<&Props>,
    ) -> Result<Option<AuthContext>, AuthError> {
        match workspace_filter {
            Some(workspace) => self
                .workspace_context(user_filter, workspace)
                .await
                .map(Some),
            None => self.sysadmin_context(user_filter).await,
        }
    }

    async fn workspace_context(
        &self,
        user_filter: &UserFilter,
        workspace_filter: &Props,
    ) -> Result<AuthContext, AuthError> {
        let statement = membership_statement(user_filter, workspace_filter)?;
        let row = self
            .client
            .query_one(&statement)
            .await?
            .ok_or(AuthError::Denied)?;

        let user = node_entity(&row, "u")?;
        let workspace = node_entity(&row, "w")?;
        let role: String = row
            .get("role")
            .map_err(|e| GraphError::Serialization(format!("membership edge has no role: {e}")))?;

        Ok(AuthContext {
            user,
            role: Role::new(role),
            workspace: Some(workspace),
        })
    }

    async fn sysadmin_context(
        &self,
        user_filter: &UserFilter,
    ) -> Result<Option<AuthContext>, AuthError> {
        // Validates the filter before anything touches the store.
        let statement = sysadmin_statement(user_filter)?;

        // Unknown user and unprivileged user are different outcomes, so the
        // existence check runs first.
        let read = crud::read(
            [labels::USER],
            "u",
            user_filter,
            MatchOptions::returning(),
        )?;
        let user_row = self.client.query_one(&read).await?.ok_or(AuthError::Denied)?;
        let user = node_entity(&user_row, "u")?;
        match self.client.query_one(&statement).await? {
            Some(_) => Ok(Some(AuthContext {
                user,
                role: Role::sysadmin(),
                workspace: None,
            })),
            None => Ok(None),
        }
    }
}

/// Render a labeled node whose properties come from a partial filter,
/// binding each non-absent value as a `$<name>_<key>` parameter.
///
/// An empty filter would match any node, which on an auth path means
/// "any user" — rejected here rather than silently widened.
fn filtered_node(
    name: &str,
    label: &str,
    filter: &Props,
    params: &mut BTreeMap<String, Value>,
) -> Result<NodePattern, AuthError> {
    let mut node = NodePattern::labeled(name, label)?;
    let mut bound = 0usize;
    for (key, value) in filter {
        if value.is_null() {
            continue;
        }
        node = node.with_prop(key)?;
        params.insert(format!("{name}_{key}"), value.clone());
        bound += 1;
    }
    if bound == 0 {
        return Err(AuthError::Denied);
    }
    Ok(node)
}

fn membership_statement(
    user_filter: &Props,
    workspace_filter: &Props,
) -> Result<CompiledStatement, AuthError> {
    let mut params = BTreeMap::new();
    let user = filtered_node("u", labels::USER, user_filter, &mut params)?;
    let workspace = filtered_node("w", labels::WORKSPACE, workspace_filter, &mut params)?;
    let member = NodePattern::labeled("m", labels::MEMBER)?;

    let path = Path::from(user)
        .hop(RelPattern::outgoing(rels::SAME_AS)?, member)
        .hop(
            RelPattern::outgoing(rels::MEMBER_OF)?.named("r")?,
            workspace,
        );

    let text = format!("MATCH {} RETURN u, w, r.role AS role", path.render());
    Ok(CompiledStatement::new(text, params))
}

fn sysadmin_statement(user_filter: &Props) -> Result<CompiledStatement, AuthError> {
    let mut params = BTreeMap::new();
    let user = filtered_node("u", labels::USER, user_filter, &mut params)?;
    let config = NodePattern::labeled("c", labels::MAIN_CONFIG)?;

    let path = Path::from(user).hop(RelPattern::outgoing(rels::SYSADMIN)?, config);

    let text = format!("MATCH {} RETURN u", path.render());
    Ok(CompiledStatement::new(text, params))
}

fn node_entity(row: &neo4rs::Row, column: &str) -> Result<Entity, AuthError> {
    let node: neo4rs::Node = row
        .get(column)
        .map_err(|e| GraphError::Serialization(format!("missing node column `{column}`: {e}")))?;
    Ok(parse_node(&node)?)
}
