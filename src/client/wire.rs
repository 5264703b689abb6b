//! Wire shapes for the identity provider's introspection, token, and user endpoints.

// crates.io
use oauth2::{
	HttpRequest, HttpResponse,
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
	},
};
use serde::de::DeserializeOwned;
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{IntrospectionResult, UserRecord},
	error::{ConfigError, UpstreamError},
	obs::CallKind,
	provider::ProviderErrorContext,
};

const BODY_PREVIEW_LIMIT: usize = 256;
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";
const TENANT_HEADER: &str = "X-FusionAuth-TenantId";

/// `POST /oauth2/introspect` response.
#[derive(Debug, Deserialize)]
pub(crate) struct IntrospectResponse {
	#[serde(default)]
	pub active: bool,
	#[serde(default)]
	pub roles: Option<Vec<String>>,
	#[serde(default)]
	pub sub: Option<String>,
	#[serde(default)]
	pub exp: Option<i64>,
	#[serde(default)]
	pub error: Option<String>,
	#[serde(default)]
	pub error_description: Option<String>,
}
impl From<IntrospectResponse> for IntrospectionResult {
	fn from(response: IntrospectResponse) -> Self {
		Self {
			active: response.active,
			roles: response.roles.unwrap_or_default(),
			error_code: response.error,
			error_description: response.error_description,
			subject: response.sub,
			expires_at: response.exp.and_then(|exp| OffsetDateTime::from_unix_timestamp(exp).ok()),
		}
	}
}

/// `POST /oauth2/token` response for both the code and the refresh grant.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
	#[serde(default)]
	pub access_token: Option<String>,
	#[serde(default)]
	pub refresh_token: Option<String>,
	#[serde(default, rename = "userId")]
	pub user_id: Option<String>,
	#[serde(default)]
	pub error: Option<String>,
	#[serde(default)]
	pub error_reason: Option<String>,
	#[serde(default)]
	pub error_description: Option<String>,
}
impl TokenResponse {
	/// Reason surfaced to callers when the provider reported an error.
	pub fn rejection(&self) -> Option<String> {
		let error = self.error.as_ref()?;

		Some(self.error_description.clone().unwrap_or_else(|| error.clone()))
	}

	pub fn error_context(&self, status: u16) -> ProviderErrorContext {
		let mut ctx = ProviderErrorContext::new().with_http_status(status);

		ctx.oauth_error = self.error.clone();
		ctx.error_reason = self.error_reason.clone();
		ctx.error_description = self.error_description.clone();

		ctx
	}
}

/// `GET /api/user/{id}` response.
#[derive(Debug, Deserialize)]
pub(crate) struct UserResponse {
	pub user: UserRecord,
}

pub(crate) fn form_request(url: &Url, form: &BTreeMap<String, String>) -> Result<HttpRequest> {
	let body = form_urlencoded::Serializer::new(String::new()).extend_pairs(form.iter()).finish();

	Request::builder()
		.method(Method::POST)
		.uri(url.as_str())
		.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
		.header(ACCEPT, JSON_CONTENT_TYPE)
		.body(body.into_bytes())
		.map_err(|e| ConfigError::from(e).into())
}

pub(crate) fn user_request(
	url: &Url,
	api_key: Option<&str>,
	tenant_id: Option<&str>,
) -> Result<HttpRequest> {
	let mut builder =
		Request::builder().method(Method::GET).uri(url.as_str()).header(ACCEPT, JSON_CONTENT_TYPE);

	if let Some(key) = api_key {
		builder = builder.header(AUTHORIZATION, key);
	}
	if let Some(tenant) = tenant_id {
		builder = builder.header(TENANT_HEADER, tenant);
	}

	builder.body(Vec::new()).map_err(|e| ConfigError::from(e).into())
}

/// Decodes a JSON body, reporting non-JSON error pages as [`UpstreamError::UnexpectedStatus`].
pub(crate) fn decode<T>(call: CallKind, response: &HttpResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let status = response.status();
	let mut de = serde_json::Deserializer::from_slice(response.body());

	serde_path_to_error::deserialize(&mut de).map_err(|source| {
		if status.is_success() {
			UpstreamError::ResponseParse { call, source, status: Some(status.as_u16()) }.into()
		} else {
			unexpected_status(call, response).into()
		}
	})
}

/// Rejects non-success responses that were not explained by an OAuth error body.
pub(crate) fn ensure_success(call: CallKind, response: &HttpResponse) -> Result<()> {
	if response.status().is_success() {
		Ok(())
	} else {
		Err(unexpected_status(call, response).into())
	}
}

fn unexpected_status(call: CallKind, response: &HttpResponse) -> UpstreamError {
	UpstreamError::UnexpectedStatus {
		call,
		status: response.status().as_u16(),
		message: body_preview(response.body()),
	}
}

fn body_preview(body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);

	if text.chars().count() <= BODY_PREVIEW_LIMIT {
		return text.into_owned();
	}

	let mut buf: String = text.chars().take(BODY_PREVIEW_LIMIT).collect();

	buf.push('…');

	buf
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::http::StatusCode;
	// self
	use super::*;

	fn response(status: u16, body: &str) -> HttpResponse {
		let mut response = HttpResponse::new(body.as_bytes().to_vec());

		*response.status_mut() =
			StatusCode::from_u16(status).expect("Test status code should be valid.");

		response
	}

	#[test]
	fn form_request_is_url_encoded_post() {
		let url = Url::parse("https://auth.example.com/oauth2/token")
			.expect("Token URL fixture should parse.");
		let form = BTreeMap::from([
			("client_id".to_owned(), "client id".to_owned()),
			("grant_type".to_owned(), "refresh_token".to_owned()),
		]);
		let request = form_request(&url, &form).expect("Form request should build.");

		assert_eq!(request.method(), Method::POST);
		assert_eq!(request.headers()[CONTENT_TYPE], FORM_CONTENT_TYPE);
		assert_eq!(request.body().as_slice(), b"client_id=client+id&grant_type=refresh_token");
	}

	#[test]
	fn introspect_response_tolerates_null_roles() {
		let body = response(200, r#"{"active":true,"roles":null,"sub":"user-1","exp":1700000000}"#);
		let decoded: IntrospectResponse =
			decode(CallKind::Introspect, &body).expect("Introspection body should decode.");
		let result = IntrospectionResult::from(decoded);

		assert!(result.active);
		assert!(result.roles.is_empty());
		assert_eq!(result.subject.as_deref(), Some("user-1"));
		assert_eq!(result.expires_at.map(OffsetDateTime::unix_timestamp), Some(1_700_000_000));
	}

	#[test]
	fn html_error_pages_become_unexpected_status() {
		let body = response(502, "<html>Bad Gateway</html>");
		let err = decode::<TokenResponse>(CallKind::RefreshToken, &body)
			.expect_err("HTML bodies must not decode.");

		assert!(matches!(
			err,
			Error::Upstream(UpstreamError::UnexpectedStatus { status: 502, ref message, .. })
				if message.contains("Bad Gateway")
		));

		let body = response(200, "not json");
		let err = decode::<TokenResponse>(CallKind::RefreshToken, &body)
			.expect_err("Malformed success bodies must not decode.");

		assert!(matches!(err, Error::Upstream(UpstreamError::ResponseParse { .. })));
	}

	#[test]
	fn rejection_falls_back_to_error_code() {
		let body = TokenResponse {
			access_token: None,
			refresh_token: None,
			user_id: None,
			error: Some("invalid_grant".into()),
			error_reason: None,
			error_description: None,
		};

		assert_eq!(body.rejection().as_deref(), Some("invalid_grant"));
		assert_eq!(body.error_context(400).http_status, Some(400));
	}
}
