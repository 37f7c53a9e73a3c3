//! In-process scenarios for the interception pipeline.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use edge_gate::config::{GateConfig, PrefixStrategy};
use edge_gate::http::{encode_path, CookieMutation, GateRequest, RequestCookie, SameSite};
use edge_gate::pipeline::{IntentStatus, Interceptor, Outcome, X_LOCALE};
use edge_gate::session::{
    Identity, IdentityError, IdentityProvider, IdentityResult, RefreshOutcome,
};

/// Signs in requests carrying a `valid` or `rotated` token and rotates it.
#[derive(Default)]
struct TokenProvider {
    calls: AtomicUsize,
}

impl TokenProvider {
    fn rotated() -> CookieMutation {
        CookieMutation::new("sb-access-token", "rotated")
            .with_path("/")
            .http_only()
            .with_same_site(SameSite::Lax)
    }
}

impl IdentityProvider for TokenProvider {
    async fn refresh_session(&self, cookies: &[RequestCookie]) -> IdentityResult<RefreshOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let valid = cookies
            .iter()
            .any(|c| c.name == "sb-access-token" && (c.value == "valid" || c.value == "rotated"));
        if !valid {
            return Ok(RefreshOutcome::default());
        }
        Ok(RefreshOutcome {
            identity: Some(Identity::new("user-1")),
            cookies: vec![Self::rotated()],
        })
    }
}

struct DownProvider;

impl IdentityProvider for DownProvider {
    async fn refresh_session(&self, _cookies: &[RequestCookie]) -> IdentityResult<RefreshOutcome> {
        Err(IdentityError::Status(503))
    }
}

fn config() -> GateConfig {
    let mut config = GateConfig::default();
    config.identity.endpoint = "http://127.0.0.1:9/refresh".to_string();
    config
}

fn gate() -> Interceptor<TokenProvider> {
    Interceptor::new(&config(), TokenProvider::default())
}

fn signed_in(path: &str) -> GateRequest {
    GateRequest::new(path).with_cookie("sb-access-token", "valid")
}

#[tokio::test]
async fn test_anonymous_protected_page() {
    let result = gate().handle(&GateRequest::new("/dashboard")).await;

    assert_eq!(result.outcome, Outcome::LoginRedirect);
    assert_eq!(result.intent.status, IntentStatus::Redirect("/ru/auth/login".into()));
    assert!(result.intent.cookie_mutations.is_empty());
}

#[tokio::test]
async fn test_signed_in_auth_page() {
    let result = gate().handle(&signed_in("/en/auth/login")).await;

    assert_eq!(result.outcome, Outcome::HomeRedirect);
    assert_eq!(result.intent.location(), Some("/ru/dashboard"));
    assert_eq!(result.intent.cookie_mutations, vec![TokenProvider::rotated()]);
}

#[tokio::test]
async fn test_signed_in_protected_page_continues() {
    let result = gate().handle(&signed_in("/kk/dashboard")).await;

    assert_eq!(result.outcome, Outcome::Continue);
    assert_eq!(result.upstream_path(), Some("/kk/dashboard"));
    assert_eq!(result.intent.headers.get(X_LOCALE).map(String::as_str), Some("kk"));
    assert_eq!(result.intent.cookie_mutations[0], TokenProvider::rotated());
}

#[tokio::test]
async fn test_anonymous_public_page_uses_default_locale() {
    let result = gate().handle(&GateRequest::new("/about")).await;

    assert_eq!(result.outcome, Outcome::Continue);
    let locale = result.locale.expect("locale stage ran");
    assert_eq!(locale.resolved_locale, "ru");
    assert_eq!(locale.rewritten_path, "/ru/about");
    assert!(!locale.redirect_required());
}

#[tokio::test]
async fn test_provider_called_once_per_request() {
    let gate = gate();
    for path in ["/dashboard", "/auth/login", "/about", "/de/about", "/ru/about"] {
        gate.handle(&signed_in(path)).await;
    }
    assert_eq!(gate.provider().calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_provider_failure_is_signed_out() {
    let gate = Interceptor::new(&config(), DownProvider);

    let protected = gate.handle(&signed_in("/dashboard")).await;
    assert_eq!(protected.outcome, Outcome::LoginRedirect);
    assert!(protected.intent.cookie_mutations.is_empty());

    let public = gate.handle(&signed_in("/en/about")).await;
    assert_eq!(public.outcome, Outcome::Continue);
    assert!(!public.session.is_authenticated());
}

#[tokio::test]
async fn test_session_cookies_survive_every_outcome() {
    let gate = gate();
    let cases = [
        ("/auth/login", Outcome::HomeRedirect),
        ("/ru/about", Outcome::LocaleRedirect),
        ("/de/about", Outcome::NotFound),
        ("/kk/dashboard", Outcome::Continue),
    ];

    for (path, expected) in cases {
        let result = gate.handle(&signed_in(path)).await;
        assert_eq!(result.outcome, expected, "{}", path);
        assert_eq!(
            result.intent.effective_cookies().first().copied(),
            Some(&TokenProvider::rotated()),
            "{}",
            path
        );
        // At most one redirect, and only on redirect outcomes.
        let redirects = matches!(
            expected,
            Outcome::HomeRedirect | Outcome::LoginRedirect | Outcome::LocaleRedirect
        );
        assert_eq!(result.intent.is_redirect(), redirects, "{}", path);
    }
}

#[tokio::test]
async fn test_protected_paths_always_require_sign_in() {
    let gate = gate();
    let paths = [
        "/dashboard",
        "/dashboard/settings",
        "/kk/dashboard",
        "/en/dashboard/billing",
        "/de/dashboard",
        "/ru/dashboard",
    ];

    for path in paths {
        let result = gate.handle(&GateRequest::new(path)).await;
        assert_eq!(result.outcome, Outcome::LoginRedirect, "{}", path);
        assert_eq!(result.intent.location(), Some("/ru/auth/login"), "{}", path);
        assert!(result.locale.is_none(), "{}", path);
    }
}

#[tokio::test]
async fn test_encoded_marker_requires_sign_in() {
    let result = gate().handle(&GateRequest::new("/%64ashboard")).await;
    assert_eq!(result.outcome, Outcome::LoginRedirect);
    assert_eq!(result.intent.location(), Some("/ru/auth/login"));
}

#[tokio::test]
async fn test_non_canonical_protected_paths_require_sign_in() {
    let gate = gate();
    let paths = [
        "/dashboard/",
        "//dashboard",
        "/kk//dashboard",
        "/en/dashboard//",
        "/%64ashboard",
        "/kk/%64ashboard/x",
        "/%64%61%73%68%62%6F%61%72%64",
        "/%2Fdashboard",
        "/./dashboard",
        "/about/../dashboard",
        "/%2e%2e/dashboard",
        "/kk/%2E/dashboard/",
    ];

    for path in paths {
        let result = gate.handle(&GateRequest::new(path)).await;
        assert_eq!(result.outcome, Outcome::LoginRedirect, "{}", path);
        assert_eq!(result.intent.location(), Some("/ru/auth/login"), "{}", path);
    }
}

#[tokio::test]
async fn test_non_canonical_auth_paths_send_signed_in_users_home() {
    let gate = gate();
    for path in ["/auth/login/", "//auth/login", "/%61uth/login", "/kk/./auth//login"] {
        let result = gate.handle(&signed_in(path)).await;
        assert_eq!(result.outcome, Outcome::HomeRedirect, "{}", path);
    }
}

#[tokio::test]
async fn test_literal_percent_is_not_decoded_twice() {
    // `%25` is a literal `%`, so this is the page `/%64ashboard`, not `/dashboard`.
    let result = gate().handle(&GateRequest::new("/%2564ashboard")).await;
    assert_eq!(result.outcome, Outcome::Continue);
    let upstream = result.upstream_path().expect("continues");
    assert_eq!(encode_path(upstream), "/ru/%2564ashboard");
}

#[tokio::test]
async fn test_locale_redirects_stay_on_site() {
    let mut never = config();
    never.locales.prefix_strategy = PrefixStrategy::Never;
    let gates = [gate(), Interceptor::new(&never, TokenProvider::default())];
    let paths = [
        "/ru//evil.example/phish",
        "/ru///evil.example",
        "/ru/%2F%2Fevil.example",
        "/ru/%2Fevil.example",
        "/ru/./%2f/evil.example",
        "/ru/%5Cevil.example",
        "/ru/%5C%5Cevil.example",
        "/ru//%5Cevil.example",
        "/kk//evil.example",
        "/en/%2F/evil.example",
    ];

    for gate in &gates {
        for path in paths {
            let result = gate.handle(&GateRequest::new(path)).await;
            let Some(location) = result.intent.location() else {
                continue;
            };
            assert!(location.starts_with('/'), "{} -> {}", path, location);
            assert!(!location.starts_with("//"), "{} -> {}", path, location);
            assert!(!location.starts_with("/\\"), "{} -> {}", path, location);
        }
    }

    let result = gate().handle(&GateRequest::new("/ru//evil.example/phish")).await;
    assert_eq!(result.intent.location(), Some("/evil.example/phish"));
}

#[tokio::test]
async fn test_auth_paths_send_signed_in_users_home() {
    let gate = gate();
    for path in ["/auth/login", "/kk/auth/register", "/en/auth/reset", "/de/auth/login"] {
        let result = gate.handle(&signed_in(path)).await;
        assert_eq!(result.intent.location(), Some("/ru/dashboard"), "{}", path);
    }
}

#[tokio::test]
async fn test_prefixed_public_paths_keep_their_locale() {
    let gate = gate();
    for (path, locale) in [("/kk", "kk"), ("/en/about", "en"), ("/kk/blog/post-1", "kk")] {
        let result = gate.handle(&GateRequest::new(path)).await;
        let decision = result.locale.expect("resolved");
        assert_eq!(decision.resolved_locale, locale);
        assert_eq!(decision.rewritten_path, path);
        assert!(!decision.redirect_required());
    }
}

#[tokio::test]
async fn test_resolution_is_idempotent() {
    let gate = gate();
    for path in ["/", "/about", "/blog/a/b", "/ru/about", "/kk", "/de/x", "/en/about"] {
        let request = GateRequest::new(path);
        let first = gate.handle(&request).await;
        let second = gate.handle(&request).await;
        assert_eq!(first.intent, second.intent, "{}", path);
        assert_eq!(first.locale, second.locale, "{}", path);
    }
}

#[tokio::test]
async fn test_always_prefix_strategy() {
    let mut config = config();
    config.locales.prefix_strategy = PrefixStrategy::Always;
    let gate = Interceptor::new(&config, TokenProvider::default());

    let bare = gate.handle(&GateRequest::new("/about").with_query("a=1")).await;
    assert_eq!(bare.outcome, Outcome::LocaleRedirect);
    assert_eq!(bare.intent.location(), Some("/ru/about?a=1"));

    let prefixed = gate.handle(&GateRequest::new("/ru/about")).await;
    assert_eq!(prefixed.outcome, Outcome::Continue);
    assert_eq!(prefixed.upstream_path(), Some("/ru/about"));
}

/// Apply a response's cookies to the client's jar and follow its redirect.
fn follow(request: &GateRequest, result: &edge_gate::Interception) -> GateRequest {
    let mut jar = request.cookies().to_vec();
    for mutation in result.intent.effective_cookies() {
        jar.retain(|c| c.name != mutation.name);
        if !mutation.is_removal() {
            jar.push(RequestCookie::new(&mutation.name, &mutation.value));
        }
    }
    let location = result.intent.location().unwrap_or_default();
    let (path, query) = match location.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (location, None),
    };
    let mut next = GateRequest::new(path);
    if let Some(query) = query {
        next = next.with_query(query);
    }
    for cookie in &jar {
        next = next.with_cookie(&cookie.name, &cookie.value);
    }
    next
}

#[tokio::test]
async fn test_cookie_round_trip() {
    let gate = gate();
    let mut request = signed_in("/en/auth/login");
    let mut outcomes = Vec::new();

    let landed = loop {
        let result = gate.handle(&request).await;
        outcomes.push(result.outcome);
        if !result.intent.is_redirect() || outcomes.len() > 3 {
            break result;
        }
        request = follow(&request, &result);
    };

    assert_eq!(
        outcomes,
        vec![Outcome::HomeRedirect, Outcome::LocaleRedirect, Outcome::Continue]
    );
    assert_eq!(request.path(), "/dashboard");
    assert_eq!(request.cookie("sb-access-token"), Some("rotated"));
    assert!(landed.session.is_authenticated());
    assert_eq!(landed.upstream_path(), Some("/ru/dashboard"));
}

#[tokio::test]
async fn test_continue_cookies_reach_renderer() {
    let gate = gate();
    let request = signed_in("/kk/about");
    let result = gate.handle(&request).await;

    let forwarded = edge_gate::http::cookie::apply_mutations(
        request.cookies(),
        &result.session.cookie_mutations,
        request.path(),
    );
    assert_eq!(forwarded, vec![RequestCookie::new("sb-access-token", "rotated")]);

    let set: Vec<_> = result.intent.effective_cookies().iter().map(|c| c.name.clone()).collect();
    assert_eq!(set, vec!["sb-access-token", "NEXT_LOCALE"]);
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct HangingProvider {
    started: Arc<AtomicBool>,
    dropped: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

impl IdentityProvider for HangingProvider {
    async fn refresh_session(&self, _cookies: &[RequestCookie]) -> IdentityResult<RefreshOutcome> {
        let _guard = DropFlag(self.dropped.clone());
        self.started.store(true, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(30)).await;
        self.finished.store(true, Ordering::SeqCst);
        Ok(RefreshOutcome::default())
    }
}

#[tokio::test]
async fn test_abandoned_request_cancels_identity_call() {
    let mut config = config();
    config.identity.timeout_ms = 60_000;
    let gate = Interceptor::new(&config, HangingProvider::default());

    // The client goes away while the provider call is in flight.
    let request = GateRequest::new("/dashboard");
    let abandoned = tokio::time::timeout(Duration::from_millis(50), gate.handle(&request)).await;

    assert!(abandoned.is_err());
    let provider = gate.provider();
    assert!(provider.started.load(Ordering::SeqCst));
    assert!(provider.dropped.load(Ordering::SeqCst));
    assert!(!provider.finished.load(Ordering::SeqCst));
}
