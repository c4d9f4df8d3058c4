use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use setrack_core::{ActorContext, UserId};

/// Header carrying the acting user's id.
pub const ACTOR_HEADER: &str = "x-user-id";

/// Resolves the optional actor for every request.
///
/// A missing or unparseable header yields an anonymous context: mutating
/// endpoints still run, they just skip their audit and notification side
/// effects. Endpoints serving actor-scoped data reject anonymous contexts
/// themselves.
pub async fn resolve_actor(mut request: Request, next: Next) -> Response {
    let actor = request
        .headers()
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| UserId::parse(value).ok());

    let context = match actor {
        Some(user_id) => ActorContext::identified(user_id),
        None => ActorContext::anonymous(),
    };
    request.extensions_mut().insert(context);

    next.run(request).await
}
