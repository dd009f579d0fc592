//! Signed Session Cookie
//!
//! Carries the donor's first name from the checkout POST to the success page.
//! Value format: `hex(first_name).hex(hmac_sha256(secret, first_name))`.

use axum::http::{HeaderMap, HeaderValue, header};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const COOKIE_NAME: &str = "giving_session";

/// Issues and verifies the session cookie
#[derive(Clone)]
pub struct SessionCookies {
    secret: Vec<u8>,
    secure: bool,
}

impl SessionCookies {
    pub fn new(secret: impl AsRef<[u8]>, secure: bool) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            secure,
        }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key")
    }

    /// Signed cookie value for `first_name`
    pub fn sign(&self, first_name: &str) -> String {
        let mut mac = self.mac();
        mac.update(first_name.as_bytes());
        let signature = mac.finalize().into_bytes();
        format!("{}.{}", hex::encode(first_name), hex::encode(signature))
    }

    /// Recover the first name if the value was signed with our secret
    pub fn verify(&self, value: &str) -> Option<String> {
        let (payload, signature) = value.split_once('.')?;
        let payload = hex::decode(payload).ok()?;
        let signature = hex::decode(signature).ok()?;

        let mut mac = self.mac();
        mac.update(&payload);
        mac.verify_slice(&signature).ok()?;

        String::from_utf8(payload).ok()
    }

    /// `Set-Cookie` header storing `first_name`
    pub fn set_cookie(&self, first_name: &str) -> HeaderValue {
        let mut cookie = format!(
            "{COOKIE_NAME}={}; Path=/; HttpOnly; SameSite=Lax",
            self.sign(first_name)
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        // hex and fixed attributes only, always a valid header value
        HeaderValue::from_str(&cookie).expect("cookie is ASCII")
    }

    /// First name from the request's cookie, if present and untampered
    pub fn first_name(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == COOKIE_NAME)
            .and_then(|(_, value)| self.verify(value))
    }
}
