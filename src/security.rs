use axum::{
	http::{HeaderName, HeaderValue},
	Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

/// Hardening headers added to every response that does not set them itself.
pub const HEADERS: [(&str, &str); 12] = [
	(
		"content-security-policy",
		"default-src 'self';base-uri 'self';font-src 'self' https: data:;\
		 form-action 'self';frame-ancestors 'self';img-src 'self' data:;\
		 object-src 'none';script-src 'self';script-src-attr 'none';\
		 style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests",
	),
	("cross-origin-opener-policy", "same-origin"),
	("cross-origin-resource-policy", "same-origin"),
	("origin-agent-cluster", "?1"),
	("referrer-policy", "no-referrer"),
	(
		"strict-transport-security",
		"max-age=15552000; includeSubDomains",
	),
	("x-content-type-options", "nosniff"),
	("x-dns-prefetch-control", "off"),
	("x-download-options", "noopen"),
	("x-frame-options", "SAMEORIGIN"),
	("x-permitted-cross-domain-policies", "none"),
	("x-xss-protection", "0"),
];

pub fn headers<S>(router: Router<S>) -> Router<S>
where
	S: Clone + Send + Sync + 'static,
{
	HEADERS.iter().fold(router, |router, &(name, value)| {
		router.layer(SetResponseHeaderLayer::if_not_present(
			HeaderName::from_static(name),
			HeaderValue::from_static(value),
		))
	})
}
