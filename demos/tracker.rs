use std::{collections::HashMap, sync::Arc};

use pathway::{
    handler,
    http::{header, StatusCode},
    middleware::{around, AddData, BoxMiddleware, CatchPanic, MiddlewareExt, Next, Tracing},
    Context, EndpointExt, RouterGroup, Server,
};
use serde_json::json;

/// The authenticated user, inserted by the auth middleware.
#[derive(Debug, Clone)]
struct UserId(String);

#[derive(Default)]
struct Projects {
    owners: HashMap<String, String>,
}

fn auth() -> BoxMiddleware {
    around(|next: Next, mut ctx: Context| async move {
        let user = ctx
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .filter(|token| !token.is_empty())
            .map(ToString::to_string);

        match user {
            Some(user) => {
                ctx.request_mut().extensions_mut().insert(UserId(user));
                next.run(ctx).await
            }
            None => ctx.status(StatusCode::UNAUTHORIZED, Some("Unauthorized: no token provided")),
        }
    })
    .boxed()
}

fn ownership() -> BoxMiddleware {
    around(|next: Next, ctx: Context| async move {
        let owner = ctx
            .data::<Arc<Projects>>()
            .and_then(|projects| projects.owners.get(ctx.param("project_id")));
        let denied = match (owner, ctx.data::<UserId>()) {
            (Some(owner), Some(UserId(user))) if owner == user => None,
            (None, _) => Some((StatusCode::NOT_FOUND, "project not found")),
            _ => Some((StatusCode::FORBIDDEN, "not the project owner")),
        };

        match denied {
            None => next.run(ctx).await,
            Some((status, message)) => ctx.status(status, Some(message)),
        }
    })
    .boxed()
}

#[handler]
async fn health(ctx: Context) -> pathway::Response {
    ctx.json(
        StatusCode::OK,
        &json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "environment": std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }),
    )
}

/// Answers with the matched route and its captured parameters.
#[handler]
async fn stub(ctx: Context) -> pathway::Response {
    let params = ctx
        .params()
        .iter()
        .map(|(name, value)| (name.to_string(), json!(value)))
        .collect::<serde_json::Map<_, _>>();
    ctx.json(
        StatusCode::OK,
        &json!({
            "method": ctx.method().as_str(),
            "route": ctx.matched_pattern(),
            "params": params,
            "user": ctx.data::<UserId>().map(|user| user.0.clone()),
        }),
    )
}

#[handler]
async fn boom() -> StatusCode {
    panic!("stub handler panicked")
}

fn routes() -> RouterGroup {
    let mut root = RouterGroup::new();

    let users = root.group("/users");
    users
        .post("/register", stub)
        .post("/login", stub)
        .post("/forgot-password", stub)
        .post("/reset-password/{token}", stub);
    users
        .group_with("", vec![auth()])
        .get("/me", stub)
        .put("/me", stub)
        .post("/change-password", stub)
        .delete("/me", stub);

    root.get_with("/search", stub, vec![auth()]);

    // Routes that share a parameter position share its name: the first route
    // inserted names the position for all of them. Each position below uses
    // one name throughout (`project_id`, `ticket_id`, `comment_id`).
    let projects = root.group_with("/projects", vec![auth()]);
    projects
        .get("/", stub)
        .post("/", stub)
        .get("/{project_id}", stub)
        .put_with("/{project_id}", stub, vec![ownership()])
        .delete_with("/{project_id}", stub, vec![ownership()]);

    let tickets = projects.group("/{project_id}/tickets");
    tickets
        .get("/", stub)
        .post("/", stub)
        .get("/{ticket_id}", stub)
        .put("/{ticket_id}", stub)
        .delete("/{ticket_id}", stub)
        .post("/{ticket_id}/assign", stub);

    tickets
        .group("/{ticket_id}/comments")
        .get("/", stub)
        .post("/", stub)
        .put("/{comment_id}", stub)
        .delete("/{comment_id}", stub);

    projects
        .group("/{project_id}/tasks")
        .get("/{task_id}/comments", stub)
        .post("/{task_id}/comments", stub);

    root.get("/health", health).get("/debug/panic", boom);
    root.get("/files/{path...}", stub);
    root
}

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "pathway=debug,tracker=debug");
    }
    tracing_subscriber::fmt::init();

    let mut projects = Projects::default();
    projects.owners.insert("1".to_string(), "alice".to_string());

    let app = routes()
        .into_router()
        .with(AddData::new(Arc::new(projects)))
        .with(CatchPanic::new())
        .with(Tracing);

    let addr = std::env::var("ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let server = Server::bind(addr).await?;
    server.run(app).await
}
