//! API Gateway event shapes
//!
//! Both shapes expose the same capability set through [`LambdaRequest`] and
//! [`LambdaResponse`], so the assembler is written once.

mod http;
mod proxy;

pub use http::{
    ApiGatewayV2HttpRequest, ApiGatewayV2HttpRequestContext, ApiGatewayV2HttpResponse,
    HttpAuthorizer, HttpCognitoIdentity, HttpDescription, HttpIamAuthorizer, HttpJwtAuthorizer,
};
pub use proxy::{
    ApiGatewayProxyRequest, ApiGatewayProxyRequestContext, ApiGatewayProxyResponse,
    ApiGatewayRequestIdentity,
};

use super::headers::HeaderMap;
use serde::{Deserialize, Deserializer};

/// Capabilities the assembler needs from a raw request
pub trait LambdaRequest {
    /// Header view used for URI reconstruction, client IP and the event
    fn headers(&self) -> HeaderMap;
    /// Reconstructed request URI
    fn uri(&self) -> String;
    fn method(&self) -> &str;
    fn body(&self) -> &str;
    fn is_base64_encoded(&self) -> bool;
    /// Caller address as seen by the platform
    fn source_ip(&self) -> Option<&str>;
    /// Identity id filled in by a Cognito/IAM authorizer
    fn platform_user_id(&self) -> Option<&str>;
}

/// Capabilities the assembler needs from a raw response
pub trait LambdaResponse {
    fn status_code(&self) -> u16;
    fn headers(&self) -> HeaderMap;
    fn body(&self) -> &str;
    fn is_base64_encoded(&self) -> bool;
}

/// API Gateway sends `null` for absent maps and bodies
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Treat an empty string as absent
pub(crate) fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() { None } else { Some(value) }
}
