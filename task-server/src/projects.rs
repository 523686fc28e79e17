//! Project store and the domain rules the handlers enforce.
//!
//! Every rule violation is a classified `DomainError`, so the routes decide
//! per endpoint (through their `HandlingMode`) whether it becomes a local
//! 500 payload or reaches the global handler.

use std::{collections::HashMap, sync::Arc};

use rest_core::{DomainError, HandlerError, Issue};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

pub const ENTITY: &str = "Project";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateProject {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Query-string filter for the list endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProjectFilter {
    /// Case-insensitive substring of the project name.
    pub name: Option<String>,
    pub archived: Option<bool>,
}

pub type Store = Arc<RwLock<HashMap<Uuid, Project>>>;

pub fn store() -> Store {
    Arc::new(RwLock::new(HashMap::new()))
}

pub async fn list(store: &Store, filter: &ProjectFilter) -> Result<Vec<Project>, HandlerError> {
    let needle = filter.name.as_deref().map(str::to_lowercase);
    let projects = store.read().await;
    let mut matching: Vec<Project> = projects
        .values()
        .filter(|p| filter.archived.is_none_or(|archived| p.archived == archived))
        .filter(|p| needle.as_deref().is_none_or(|n| p.name.to_lowercase().contains(n)))
        .cloned()
        .collect();
    matching.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    Ok(matching)
}

pub async fn get(store: &Store, id: Uuid) -> Result<Project, HandlerError> {
    store
        .read()
        .await
        .get(&id)
        .cloned()
        .ok_or_else(|| DomainError::not_found(ENTITY, id).into())
}

pub async fn create(store: &Store, input: CreateProject) -> Result<Project, HandlerError> {
    let name = validate_name(&input.name)?;
    let project = Project {
        id: Uuid::new_v4(),
        name,
        description: input.description,
        archived: false,
    };
    store.write().await.insert(project.id, project.clone());
    Ok(project)
}

pub async fn update(store: &Store, id: Uuid, input: UpdateProject) -> Result<Project, HandlerError> {
    let name = input.name.as_deref().map(validate_name).transpose()?;
    let mut projects = store.write().await;
    let project = projects.get_mut(&id).ok_or_else(|| DomainError::not_found(ENTITY, id))?;
    if project.archived {
        return Err(archived_is_read_only(id).into());
    }
    if let Some(name) = name {
        project.name = name;
    }
    if let Some(description) = input.description {
        project.description = Some(description);
    }
    Ok(project.clone())
}

pub async fn check_archivable(store: &Store, id: Uuid) -> Result<(), HandlerError> {
    let projects = store.read().await;
    let project = projects.get(&id).ok_or_else(|| DomainError::not_found(ENTITY, id))?;
    if project.archived {
        return Err(already_archived(id).into());
    }
    Ok(())
}

pub async fn archive(store: &Store, id: Uuid) -> Result<(), HandlerError> {
    let mut projects = store.write().await;
    let project = projects.get_mut(&id).ok_or_else(|| DomainError::not_found(ENTITY, id))?;
    if project.archived {
        return Err(already_archived(id).into());
    }
    project.archived = true;
    Ok(())
}

pub async fn restore(store: &Store, id: Uuid) -> Result<(), HandlerError> {
    let mut projects = store.write().await;
    let project = projects.get_mut(&id).ok_or_else(|| DomainError::not_found(ENTITY, id))?;
    if !project.archived {
        return Err(DomainError::logical(format!("project {id} is not archived"))
            .with_issue(Issue::rule("not_archived", "only archived projects can be restored"))
            .into());
    }
    project.archived = false;
    Ok(())
}

/// Archived projects are kept for audit and cannot be deleted.
pub async fn delete(store: &Store, id: Uuid) -> Result<(), HandlerError> {
    let mut projects = store.write().await;
    let project = projects.get(&id).ok_or_else(|| DomainError::not_found(ENTITY, id))?;
    if project.archived {
        return Err(archived_is_read_only(id).into());
    }
    projects.remove(&id);
    Ok(())
}

fn validate_name(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("project is invalid")
            .with_issue(Issue::invalid_value("name", "must not be empty")));
    }
    Ok(name.to_string())
}

fn already_archived(id: Uuid) -> DomainError {
    DomainError::invariant(format!("project {id} is already archived"))
        .with_issue(Issue::rule("already_archived", "a project can only be archived once"))
}

fn archived_is_read_only(id: Uuid) -> DomainError {
    DomainError::invariant(format!("project {id} is archived"))
        .with_issue(Issue::rule("archived_read_only", "archived projects cannot be changed"))
}

#[cfg(test)]
mod tests {
    use rest_core::ErrorKind;

    use super::*;

    async fn seeded(name: &str) -> (Store, Uuid) {
        let store = store();
        let project = create(
            &store,
            CreateProject {
                name: name.to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
        (store, project.id)
    }

    #[tokio::test]
    async fn create_trims_and_rejects_blank_names() {
        let (store, id) = seeded("  Launch ").await;
        assert_eq!(get(&store, id).await.unwrap().name, "Launch");

        let err = create(
            &store,
            CreateProject {
                name: "   ".to_string(),
                description: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn missing_project_is_entity_not_found() {
        let err = get(&store(), Uuid::nil()).await.unwrap_err();
        assert!(err.is_entity_not_found());
    }

    #[tokio::test]
    async fn archive_twice_breaks_invariant() {
        let (store, id) = seeded("Launch").await;
        archive(&store, id).await.unwrap();
        let err = archive(&store, id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invariant);
        assert!(check_archivable(&store, id).await.is_err());
    }

    #[tokio::test]
    async fn restore_requires_archived_project() {
        let (store, id) = seeded("Launch").await;
        assert_eq!(restore(&store, id).await.unwrap_err().kind(), ErrorKind::Logical);
        archive(&store, id).await.unwrap();
        restore(&store, id).await.unwrap();
        assert!(!get(&store, id).await.unwrap().archived);
    }

    #[tokio::test]
    async fn list_filters_by_name_and_archived() {
        let (store, launch) = seeded("Launch").await;
        create(
            &store,
            CreateProject {
                name: "Lunch".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
        archive(&store, launch).await.unwrap();

        let by_name = ProjectFilter {
            name: Some("LAUN".to_string()),
            archived: None,
        };
        assert_eq!(list(&store, &by_name).await.unwrap().len(), 1);

        let active = ProjectFilter {
            name: None,
            archived: Some(false),
        };
        let active = list(&store, &active).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Lunch");
    }

    #[tokio::test]
    async fn archived_project_cannot_be_deleted() {
        let (store, id) = seeded("Launch").await;
        archive(&store, id).await.unwrap();
        assert_eq!(delete(&store, id).await.unwrap_err().kind(), ErrorKind::Invariant);
        restore(&store, id).await.unwrap();
        delete(&store, id).await.unwrap();
        assert!(get(&store, id).await.unwrap_err().is_entity_not_found());
    }
}
