// SPDX-License-Identifier: GPL-3.0-only

//! Decoding of the portal's method reply and `Response` signal.

use std::collections::HashMap;

use zbus::{
    Message,
    message::Type as MessageType,
    zvariant::{OwnedObjectPath, OwnedValue, Value},
};

use crate::{
    PORTAL_RESPONSE_CANCELLED, PORTAL_RESPONSE_SUCCESS, REQUEST_INTERFACE, RESPONSE_SIGNAL, Result,
    error::Error,
};

/// Outcome carried by a `Response` signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PortalResponse<T> {
    Success(T),
    Cancelled,
    /// Interaction ended some other way; holds the response code
    Other(u32),
}

type Handler<'h> = Box<dyn FnMut(&Value<'_>) -> Result<()> + 'h>;

/// Walks an `a{sv}` dictionary, handing known entries to typed handlers.
///
/// Entries without a handler are skipped, so services may add keys freely.
/// The first handler error aborts the walk.
#[derive(Default)]
pub struct DictReader<'h> {
    handlers: Vec<(&'h str, Handler<'h>)>,
}

impl<'h> DictReader<'h> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `key`. If a key is registered twice the first handler wins.
    pub fn on<F>(mut self, key: &'h str, handler: F) -> Self
    where
        F: FnMut(&Value<'_>) -> Result<()> + 'h,
    {
        self.handlers.push((key, Box::new(handler)));
        self
    }

    pub fn read(mut self, dict: &HashMap<String, OwnedValue>) -> Result<()> {
        for (key, value) in dict {
            let Some((_, handler)) = self.handlers.iter_mut().find(|(k, _)| *k == key.as_str())
            else {
                log::trace!("ignoring response entry {key:?}");
                continue;
            };
            handler(unwrap_variant(value))?;
        }
        Ok(())
    }
}

fn unwrap_variant<'v, 'a>(value: &'v Value<'a>) -> &'v Value<'a> {
    match value {
        Value::Value(inner) => unwrap_variant(inner),
        value => value,
    }
}

/// First entry of the `uris` array, `None` if the array is empty.
fn first_uri(value: &Value<'_>) -> Result<Option<String>> {
    let Value::Array(uris) = value else {
        return Err(Error::MalformedReply(
            "D-Bus response signal URI iter is not an array.",
        ));
    };
    match uris.iter().next() {
        None => Ok(None),
        Some(Value::Str(uri)) => Ok(Some(uri.as_str().to_owned())),
        Some(_) => Err(Error::MalformedReply(
            "D-Bus response signal URI sub iter is not a string.",
        )),
    }
}

/// Interprets a response code and its results, extracting the selected URI.
///
/// The results are only looked at on success.
pub fn read_results(
    code: u32,
    results: &HashMap<String, OwnedValue>,
) -> Result<PortalResponse<String>> {
    match code {
        PORTAL_RESPONSE_SUCCESS => {
            let mut uri = None;
            DictReader::new()
                .on("uris", |value| {
                    uri = first_uri(value)?;
                    Ok(())
                })
                .read(results)?;
            uri.map(PortalResponse::Success).ok_or(Error::NoFile)
        }
        PORTAL_RESPONSE_CANCELLED => Ok(PortalResponse::Cancelled),
        code => Ok(PortalResponse::Other(code)),
    }
}

/// Whether `message` is an `org.freedesktop.portal.Request.Response` signal.
pub fn is_response_signal(message: &Message) -> bool {
    let header = message.header();
    message.message_type() == MessageType::Signal
        && header
            .interface()
            .is_some_and(|interface| interface.as_str() == REQUEST_INTERFACE)
        && header
            .member()
            .is_some_and(|member| member.as_str() == RESPONSE_SIGNAL)
}

/// Decodes a `Response(u, a{sv})` signal.
pub fn read_response(message: &Message) -> Result<PortalResponse<String>> {
    let (code, results): (u32, HashMap<String, OwnedValue>) =
        message.body().deserialize().map_err(|err| {
            log::debug!("bad Response body: {err}");
            Error::MalformedReply("D-Bus response signal arguments are not (uint32, dict).")
        })?;
    read_results(code, &results)
}

/// The request handle returned by `OpenFile`.
pub fn read_request_handle(reply: &Message) -> Result<OwnedObjectPath> {
    reply.body().deserialize().map_err(|err| {
        log::debug!("bad OpenFile reply body: {err}");
        Error::MalformedReply("D-Bus reply is not an object path.")
    })
}
