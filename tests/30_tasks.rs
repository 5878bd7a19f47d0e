mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::{id_of, read, TestServer};

struct World {
    server: TestServer,
    ann: String,
    bob: String,
    project: String,
}

async fn world() -> Result<World> {
    let server = TestServer::spawn().await?;
    let ann = server.register("Ann", "ann@x.com", "secret1").await?;
    let bob = server.register("Bob", "bob@x.com", "secret1").await?;
    let project = id_of(&server.create_project(&ann, json!({ "name": "P1" })).await?);
    Ok(World { server, ann, bob, project })
}

#[tokio::test]
async fn create_copies_owner_from_project() -> Result<()> {
    let w = world().await?;
    let (_, project) = read(w.server.get(&format!("/api/projects/{}", w.project), &w.ann).send().await?).await?;

    let task = w.server.create_task(&w.ann, &w.project, json!({ "title": " T1 " })).await?;
    assert_eq!(task["title"], "T1");
    assert_eq!(task["project"], w.project.as_str());
    assert_eq!(task["owner"], project["owner"]);
    assert_eq!(task["status"], "To Do");
    assert_eq!(task["priority"], "medium");
    assert_eq!(task["description"], "");
    assert_eq!(task["note"], "");
    assert!(task["dueDate"].is_null());
    Ok(())
}

#[tokio::test]
async fn create_accepts_optional_fields() -> Result<()> {
    let w = world().await?;
    let task = w
        .server
        .create_task(
            &w.ann,
            &w.project,
            json!({
                "title": "T1",
                "description": "d",
                "note": "n",
                "status": "In Progress",
                "priority": "high",
                "dueDate": "2030-02-01T12:00:00Z"
            }),
        )
        .await?;
    assert_eq!(task["status"], "In Progress");
    assert_eq!(task["priority"], "high");
    assert_eq!(task["note"], "n");
    assert!(task["dueDate"].is_string());
    Ok(())
}

#[tokio::test]
async fn create_validates_title_and_status() -> Result<()> {
    let w = world().await?;
    let path = format!("/api/projects/{}/tasks", w.project);

    let (status, body) = read(w.server.post(&path, &w.ann, json!({ "description": "x" })).send().await?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Task title is required");

    let (status, _) = read(
        w.server
            .post(&path, &w.ann, json!({ "title": "T", "status": "Blocked" }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn collection_routes_check_the_project() -> Result<()> {
    let w = world().await?;
    let path = format!("/api/projects/{}/tasks", w.project);

    let (status, _) = read(w.server.get(&path, &w.bob).send().await?).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = read(w.server.post(&path, &w.bob, json!({ "title": "T" })).send().await?).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let missing = format!("/api/projects/{}/tasks", uuid::Uuid::new_v4());
    let (status, body) = read(w.server.get(&missing, &w.ann).send().await?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Project not found");
    Ok(())
}

#[tokio::test]
async fn list_is_newest_first() -> Result<()> {
    let w = world().await?;
    let first = w.server.create_task(&w.ann, &w.project, json!({ "title": "first" })).await?;
    let second = w.server.create_task(&w.ann, &w.project, json!({ "title": "second" })).await?;

    let (status, list) = read(w.server.get(&format!("/api/projects/{}/tasks", w.project), &w.ann).send().await?).await?;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<String> = list
        .as_array()
        .map(|items| items.iter().map(id_of).collect())
        .unwrap_or_default();
    assert_eq!(ids, vec![id_of(&second), id_of(&first)]);
    Ok(())
}

#[tokio::test]
async fn strangers_task_is_hidden_as_not_found() -> Result<()> {
    let w = world().await?;
    let task = id_of(&w.server.create_task(&w.ann, &w.project, json!({ "title": "T1" })).await?);
    let path = format!("/api/projects/{}/tasks/{}", w.project, task);

    let (status, body) = read(w.server.get(&path, &w.bob).send().await?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Task not found");
    let (status, _) = read(w.server.put(&path, &w.bob, json!({ "title": "mine" })).send().await?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = read(w.server.delete(&path, &w.bob).send().await?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = read(w.server.get(&path, &w.ann).send().await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "T1");
    Ok(())
}

#[tokio::test]
async fn task_is_only_reachable_through_its_own_project() -> Result<()> {
    let w = world().await?;
    let task = id_of(&w.server.create_task(&w.ann, &w.project, json!({ "title": "T1" })).await?);
    let other = id_of(&w.server.create_project(&w.ann, json!({ "name": "P2" })).await?);

    let (status, body) = read(
        w.server
            .get(&format!("/api/projects/{}/tasks/{}", other, task), &w.ann)
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Task not found");
    Ok(())
}

#[tokio::test]
async fn update_is_partial() -> Result<()> {
    let w = world().await?;
    let task = w
        .server
        .create_task(&w.ann, &w.project, json!({ "title": "T1", "description": "keep", "dueDate": "2030-01-01" }))
        .await?;
    let path = format!("/api/projects/{}/tasks/{}", w.project, id_of(&task));

    let (status, updated) = read(
        w.server
            .put(&path, &w.ann, json!({ "status": "Done", "note": "done", "title": null }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "Done");
    assert_eq!(updated["note"], "done");
    assert_eq!(updated["title"], "T1");
    assert_eq!(updated["description"], "keep");
    assert_eq!(updated["owner"], task["owner"]);
    assert_eq!(updated["project"], task["project"]);
    assert_eq!(updated["dueDate"], task["dueDate"]);

    let (_, cleared) = read(w.server.put(&path, &w.ann, json!({ "dueDate": "" })).send().await?).await?;
    assert!(cleared["dueDate"].is_null());

    let (status, same) = read(w.server.put(&path, &w.ann, json!({})).send().await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(same, cleared);
    Ok(())
}

#[tokio::test]
async fn delete_removes_only_that_task() -> Result<()> {
    let w = world().await?;
    let gone = id_of(&w.server.create_task(&w.ann, &w.project, json!({ "title": "gone" })).await?);
    let kept = id_of(&w.server.create_task(&w.ann, &w.project, json!({ "title": "kept" })).await?);
    let path = format!("/api/projects/{}/tasks/{}", w.project, gone);

    let (status, body) = read(w.server.delete(&path, &w.ann).send().await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Task deleted" }));

    let (status, _) = read(w.server.delete(&path, &w.ann).send().await?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = read(w.server.get(&format!("/api/projects/{}/tasks", w.project), &w.ann).send().await?).await?;
    let ids: Vec<String> = list
        .as_array()
        .map(|items| items.iter().map(id_of).collect())
        .unwrap_or_default();
    assert_eq!(ids, vec![kept]);
    Ok(())
}
