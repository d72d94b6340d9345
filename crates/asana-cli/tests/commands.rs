mod support;

use asana_cli::commands::auth::{self, LoginArgs};
use asana_cli::{EXIT_AUTH, EXIT_CANCELLED, EXIT_ERROR, exit_code};
use asana_common::ConfigError;
use asana_secrets::{CredentialError, CredentialStore};
use httpmock::Method::{GET, POST, PUT};
use serde_json::json;
use support::{Answer, Harness, TOKEN, parse};

fn my_tasks_mock<'a>(harness: &'a Harness, tasks: serde_json::Value) -> httpmock::Mock<'a> {
    harness.server.mock(|when, then| {
        when.method(GET)
            .path("/api/1.0/tasks")
            .query_param("assignee", "me")
            .query_param("workspace", "7")
            .query_param("completed_since", "now")
            .header("authorization", format!("Bearer {TOKEN}"));
        then.status(200).json_body(json!({"data": tasks, "next_page": null}));
    })
}

#[test]
fn tasks_list_sorts_by_due_date() {
    let harness = Harness::logged_in();
    let mock = my_tasks_mock(
        &harness,
        json!([
            {"gid": "1", "name": "Someday", "due_on": null},
            {"gid": "2", "name": "Quarterly report", "due_on": "2025-02-20"},
            {"gid": "3", "name": "Standup notes", "due_on": "2025-01-08"},
            {"gid": "4", "name": "Book flights", "due_on": "2025-01-10"}
        ]),
    );

    let out = harness
        .run(parse(&["tasks", "list", "--sort", "due"]))
        .expect("tasks list");
    mock.assert();
    assert!(out.contains("Tasks for Ada Lovelace:"), "{out}");
    let lines: Vec<&str> = out.lines().filter(|l| l.contains(". [")).collect();
    assert_eq!(
        lines,
        [
            "1. [Today] Standup notes",
            "2. [Fri] Book flights",
            "3. [Feb 20, 2025] Quarterly report",
            "4. [None] Someday",
        ]
    );
}

#[test]
fn commands_fail_fast_without_a_token() {
    let harness = Harness::empty();
    let any = harness.server.mock(|when, then| {
        when.any_request();
        then.status(200).json_body(json!({"data": []}));
    });

    let err = harness
        .run(parse(&["tasks", "list"]))
        .expect_err("not logged in");
    assert_eq!(exit_code(&err), EXIT_AUTH);
    assert_eq!(any.hits(), 0);
}

#[test]
fn login_with_piped_token_saves_config_then_token() {
    let harness = Harness::empty();
    let workspaces = harness.server.mock(|when, then| {
        when.method(GET)
            .path("/api/1.0/workspaces")
            .header("authorization", "Bearer fresh-token-123");
        then.status(200).json_body(json!({
            "data": [{"gid": "7", "name": "Acme"}, {"gid": "8", "name": "Side project"}]
        }));
    });
    let me = harness.server.mock(|when, then| {
        when.method(GET).path("/api/1.0/users/me");
        then.status(200)
            .json_body(json!({"data": {"gid": "42", "name": "Ada Lovelace"}}));
    });

    let args = LoginArgs {
        workspace: Some("side PROJECT".to_string()),
        with_token: true,
    };
    let mut out = Vec::new();
    auth::login(
        &harness.context(),
        &args,
        Some("fresh-token-123".to_string()),
        &mut out,
    )
    .expect("login");
    workspaces.assert();
    me.assert();

    let config = harness.store().load().expect("config saved");
    assert_eq!(config.username.as_deref(), Some("Ada Lovelace"));
    let workspace = config.workspace.expect("default workspace");
    assert_eq!(workspace.gid, "8");
    assert_eq!(harness.credentials.get().expect("token stored"), "fresh-token-123");
    assert!(harness.prompter.asked().is_empty());

    let out = String::from_utf8(out).expect("utf8");
    assert!(out.contains("Default workspace set to Side project"), "{out}");
}

#[test]
fn rejected_login_persists_nothing() {
    let harness = Harness::empty().answers([Answer::Text("bad-token-000".to_string())]);
    harness.server.mock(|when, then| {
        when.method(GET).path("/api/1.0/workspaces");
        then.status(401).json_body(json!({
            "errors": [{"status_code": 401, "type": "not_authorized", "message": "Not Authorized"}]
        }));
    });

    let err = harness
        .run(parse(&["auth", "login"]))
        .expect_err("unauthorized");
    assert_eq!(exit_code(&err), EXIT_AUTH);
    assert!(format!("{err:#}").contains("Not Authorized"));
    assert_eq!(harness.credentials.get(), Err(CredentialError::NoToken));
    assert!(matches!(
        harness.store().load(),
        Err(ConfigError::NotFound { .. })
    ));
}

#[test]
fn login_rejects_malformed_token_before_any_request() {
    let harness = Harness::empty().answers([Answer::Text("abc".to_string())]);
    let any = harness.server.mock(|when, then| {
        when.any_request();
        then.status(200).json_body(json!({"data": []}));
    });

    let err = harness
        .run(parse(&["auth", "login"]))
        .expect_err("too short");
    assert_eq!(exit_code(&err), EXIT_ERROR);
    assert_eq!(any.hits(), 0);
}

#[test]
fn logout_respects_the_confirmation() {
    let harness = Harness::logged_in().answers([Answer::Confirm(false)]);
    let out = harness.run(parse(&["auth", "logout"])).expect("abort");
    assert!(out.contains("Logout aborted."));
    assert!(harness.credentials.get().is_ok());

    let harness = Harness::logged_in().answers([Answer::Confirm(true)]);
    let out = harness.run(parse(&["auth", "logout"])).expect("logout");
    assert!(out.contains("Successfully logged out."));
    assert_eq!(harness.credentials.get(), Err(CredentialError::NoToken));
}

#[test]
fn logout_without_session_does_not_prompt() {
    let harness = Harness::empty();
    let out = harness.run(parse(&["auth", "logout"])).expect("logout");
    assert!(out.contains("You are not logged in."));
    assert!(harness.prompter.asked().is_empty());
}

#[test]
fn status_reports_user_and_workspace() {
    let harness = Harness::logged_in();
    harness.server.mock(|when, then| {
        when.method(GET).path("/api/1.0/users/me");
        then.status(200)
            .json_body(json!({"data": {"gid": "42", "name": "Ada Lovelace"}}));
    });

    let out = harness.run(parse(&["auth", "status"])).expect("status");
    assert!(out.contains("API is operational."), "{out}");
    assert!(out.contains("Logged in as Ada Lovelace (42)"), "{out}");
    assert!(out.contains("Default workspace is Acme (7)"), "{out}");
}

#[test]
fn status_reports_config_even_when_api_fails() {
    let harness = Harness::logged_in();
    harness.server.mock(|when, then| {
        when.method(GET).path("/api/1.0/users/me");
        then.status(500).body("");
    });

    let mut out = Vec::new();
    let err = auth::status(&harness.context(), &mut out).expect_err("api down");
    assert_eq!(exit_code(&err), EXIT_ERROR);
    let out = String::from_utf8(out).expect("utf8");
    assert!(out.contains("Internal Server Error"), "{out}");
    assert!(out.contains("Default workspace is Acme (7)"), "{out}");
}

#[test]
fn cancelled_selection_exits_with_cancel_code() {
    let harness = Harness::logged_in().answers([Answer::Cancel]);
    my_tasks_mock(&harness, json!([{"gid": "1", "name": "Anything"}]));

    let err = harness
        .run(parse(&["tasks", "view"]))
        .expect_err("cancelled");
    assert_eq!(exit_code(&err), EXIT_CANCELLED);
}

#[test]
fn view_shows_details_of_selected_task() {
    let harness = Harness::logged_in().answers([Answer::Select(1)]);
    my_tasks_mock(
        &harness,
        json!([{"gid": "1", "name": "First"}, {"gid": "2", "name": "Second"}]),
    );
    let detail = harness.server.mock(|when, then| {
        when.method(GET).path("/api/1.0/tasks/2");
        then.status(200).json_body(json!({"data": {
            "gid": "2",
            "name": "Second",
            "due_on": "2025-01-09",
            "notes": "Bring the slides",
            "projects": [{"gid": "p1", "name": "Launch"}],
            "tags": []
        }}));
    });

    let out = harness.run(parse(&["tasks", "view"])).expect("view");
    detail.assert();
    assert!(out.contains("Second | Due: Tomorrow | Projects: Launch"), "{out}");
    assert!(out.contains("Tags: None"), "{out}");
    assert!(out.contains("\n  Bring the slides"), "{out}");
}

#[test]
fn update_flags_send_partial_body() {
    let harness = Harness::logged_in();
    let update = harness.server.mock(|when, then| {
        when.method(PUT)
            .path("/api/1.0/tasks/55")
            .json_body(json!({"data": {"completed": true}, "options": {}}));
        then.status(200)
            .json_body(json!({"data": {"gid": "55", "name": "Ship", "completed": true}}));
    });

    let out = harness
        .run(parse(&["tasks", "update", "55", "--complete"]))
        .expect("update");
    update.assert();
    assert!(out.contains("Task completed: Ship"), "{out}");
}

#[test]
fn create_from_flags_targets_default_workspace() {
    let harness = Harness::logged_in();
    let create = harness.server.mock(|when, then| {
        when.method(POST).path("/api/1.0/tasks").json_body(json!({
            "data": {"name": "Plan offsite", "due_on": "2025-01-20", "assignee": "me", "workspace": "7"},
            "options": {}
        }));
        then.status(201).json_body(json!({"data": {
            "gid": "99", "name": "Plan offsite", "due_on": "2025-01-20"
        }}));
    });

    let out = harness
        .run(parse(&[
            "tasks", "create", "--name", "Plan offsite", "--due", "2025-01-20", "--assignee", "me",
        ]))
        .expect("create");
    create.assert();
    assert!(out.contains("Created task \"Plan offsite\" with due date Jan 20, 2025"), "{out}");
}

#[test]
fn time_status_groups_entries_by_day() {
    let harness = Harness::logged_in();
    harness.server.mock(|when, then| {
        when.method(GET).path("/api/1.0/tasks/5");
        then.status(200).json_body(json!({"data": {"gid": "5", "name": "Audit"}}));
    });
    harness.server.mock(|when, then| {
        when.method(GET).path("/api/1.0/tasks/5/time_tracking_entries");
        then.status(200).json_body(json!({"data": [
            {"gid": "a", "duration_minutes": 30, "entered_on": "2025-01-07", "created_by": {"gid": "1", "name": "Ada"}},
            {"gid": "b", "duration_minutes": 90, "entered_on": "2025-01-08", "created_by": {"gid": "2", "name": "Grace"}},
            {"gid": "c", "duration_minutes": 15, "entered_on": "2025-01-07", "created_by": {"gid": "1", "name": "Ada"}},
            {"gid": "d", "duration_minutes": 20, "entered_on": null, "created_by": {"gid": "3", "name": "Linus"}}
        ]}));
    });

    let out = harness
        .run(parse(&["time", "status", "--task", "5"]))
        .expect("time status");
    let today = out.find("[Today]").expect("today group");
    let yesterday = out.find("[Yesterday]").expect("yesterday group");
    let undated = out.find("[Undated]").expect("undated group");
    assert!(today < yesterday && yesterday < undated, "{out}");
    assert!(out.contains("Grace - 1h 30m"), "{out}");
    assert!(out.contains("Linus - 20m"), "{out}");
    assert!(out.contains("Total: 2h 35m"), "{out}");
}

#[test]
fn config_set_default_workspace_by_prompt() {
    let harness = Harness::logged_in().answers([Answer::Select(1)]);
    harness.server.mock(|when, then| {
        when.method(GET).path("/api/1.0/workspaces");
        then.status(200).json_body(json!({
            "data": [{"gid": "7", "name": "Acme"}, {"gid": "8", "name": "Side project"}]
        }));
    });

    let out = harness
        .run(parse(&["config", "set", "dw"]))
        .expect("config set");
    assert!(out.contains("Default workspace set to Side project"), "{out}");
    let config = harness.store().load().expect("config");
    assert_eq!(config.workspace.expect("workspace").gid, "8");
    assert_eq!(config.username.as_deref(), Some("Ada Lovelace"));
    assert_eq!(harness.prompter.remaining(), 0);
}

#[test]
fn config_get_reports_missing_workspace_and_unknown_keys() {
    let harness = Harness::empty();
    let err = harness
        .run(parse(&["config", "get", "dw"]))
        .expect_err("no workspace");
    assert!(err.to_string().contains("no default workspace"), "{err}");

    let err = harness
        .run(parse(&["config", "get", "colour"]))
        .expect_err("unknown key");
    assert!(err.to_string().contains("default-workspace (dw)"), "{err}");
}

#[test]
fn config_set_log_level_validates_value() {
    let harness = Harness::empty();
    harness
        .run(parse(&["config", "set", "log-level", "DEBUG"]))
        .expect("set level");
    assert_eq!(harness.store().load().expect("config").log_level, "debug");

    let err = harness
        .run(parse(&["config", "set", "log-level", "loud"]))
        .expect_err("invalid");
    assert_eq!(exit_code(&err), EXIT_ERROR);
}

#[test]
fn project_tasks_grouped_by_section() {
    let harness = Harness::logged_in();
    harness.server.mock(|when, then| {
        when.method(GET).path("/api/1.0/projects/p1");
        then.status(200).json_body(json!({"data": {"gid": "p1", "name": "Launch"}}));
    });
    harness.server.mock(|when, then| {
        when.method(GET).path("/api/1.0/projects/p1/sections");
        then.status(200).json_body(json!({"data": [
            {"gid": "s1", "name": "Backlog"},
            {"gid": "s2", "name": "Done"}
        ]}));
    });
    harness.server.mock(|when, then| {
        when.method(GET).path("/api/1.0/sections/s1/tasks");
        then.status(200).json_body(json!({"data": [{"gid": "t1", "name": "Write copy"}]}));
    });
    harness.server.mock(|when, then| {
        when.method(GET).path("/api/1.0/sections/s2/tasks");
        then.status(200).json_body(json!({"data": []}));
    });

    let out = harness
        .run(parse(&["projects", "tasks", "p1", "--sections"]))
        .expect("project tasks");
    let backlog = out.find("Backlog").expect("backlog section");
    let done = out.find("Done").expect("done section");
    assert!(backlog < done, "{out}");
    assert!(out.contains("  1. Write copy"), "{out}");
    assert!(out.contains("  No tasks"), "{out}");
}
