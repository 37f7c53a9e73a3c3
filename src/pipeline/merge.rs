//! Folding session effects into the terminating stage's response.

use crate::http::cookie::CookieMutation;
use crate::pipeline::intent::ResponseIntent;

/// Prepend the session's cookie mutations to `stage`'s own.
///
/// Session mutations come first in their original order, then the stage's.
/// Status and headers are the stage's. A policy redirect arrives here as `stage` itself.
pub fn merge(session_mutations: &[CookieMutation], stage: ResponseIntent) -> ResponseIntent {
    let ResponseIntent {
        status,
        cookie_mutations: stage_mutations,
        headers,
    } = stage;

    let mut cookie_mutations = Vec::with_capacity(session_mutations.len() + stage_mutations.len());
    cookie_mutations.extend_from_slice(session_mutations);
    cookie_mutations.extend(stage_mutations);

    ResponseIntent {
        status,
        cookie_mutations,
        headers,
    }
}
