// SPDX-License-Identifier: GPL-3.0-only

use zbus::zvariant::{ObjectPath, OwnedObjectPath};

use crate::{DBUS_NAME, REQUEST_INTERFACE, RESPONSE_SIGNAL, Result, error::Error, token};

static REQUEST_PATH_PREFIX: &str = "/org/freedesktop/portal/desktop/request/";

/// The object path a portal request will be exported on, as predicted by the caller.
///
/// The portal builds `/org/freedesktop/portal/desktop/request/SENDER/TOKEN`
/// from our unique name and the `handle_token` option, so the path can be
/// known (and subscribed to) before `OpenFile` is called.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestHandle {
    path: OwnedObjectPath,
    token: String,
}

impl RequestHandle {
    /// Builds a handle with a freshly generated token.
    pub fn generate(unique_name: &str) -> Result<Self> {
        Self::with_token(unique_name, token::generate())
    }

    pub fn with_token(unique_name: &str, token: String) -> Result<Self> {
        let sender = unique_name.strip_prefix(':').unwrap_or(unique_name);
        let mut path = String::with_capacity(REQUEST_PATH_PREFIX.len() + sender.len() + 1 + token.len());
        path.push_str(REQUEST_PATH_PREFIX);
        path.extend(sender.chars().map(|c| if c == '.' { '_' } else { c }));
        path.push('/');
        path.push_str(&token);
        let path = OwnedObjectPath::try_from(path).map_err(Error::InvalidHandle)?;
        Ok(Self { path, token })
    }

    pub fn path(&self) -> &ObjectPath<'static> {
        &self.path
    }

    /// The value sent as the `handle_token` option.
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Match rule for the `Response` signal of the request at `path`, addressed to `destination`.
pub fn response_match_rule(path: &ObjectPath<'_>, destination: &str) -> String {
    format!(
        "type='signal',sender='{DBUS_NAME}',path='{path}',interface='{REQUEST_INTERFACE}',member='{RESPONSE_SIGNAL}',destination='{destination}'"
    )
}
