// SPDX-License-Identifier: GPL-3.0-only

//! The bus connection the file chooser talks through.

use std::collections::VecDeque;

use futures::{FutureExt, StreamExt};
use zbus::{
    Connection, MatchRule, Message, MessageStream, fdo::DBusProxy, zvariant::OwnedObjectPath,
};

use crate::{
    DBUS_NAME, DBUS_PATH, FILE_CHOOSER_INTERFACE, OPEN_FILE_METHOD, Result, error::Error,
    request::OpenFileRequest, response,
};

#[cfg(test)]
pub(crate) mod mock;

/// Operations the file chooser needs from a bus connection.
///
/// Messages must be delivered exactly once and in order.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Our unique bus name, e.g. `:1.42`.
    fn unique_name(&self) -> &str;

    async fn add_match(&mut self, rule: &str) -> Result<()>;

    async fn remove_match(&mut self, rule: &str) -> Result<()>;

    /// Calls `OpenFile` and waits, without timeout, for the request handle it returns.
    async fn open_file(&mut self, request: &OpenFileRequest) -> Result<OwnedObjectPath>;

    /// Takes one already received message, if any, without waiting.
    fn pop_message(&mut self) -> Option<Message>;

    /// Waits for more incoming traffic. Returns `false` once nothing more can arrive.
    async fn read_write(&mut self) -> bool;
}

/// [`Transport`] over a zbus connection.
pub struct BusTransport {
    connection: Connection,
    dbus: DBusProxy<'static>,
    // Created up front so signals sent before we start waiting are kept.
    stream: MessageStream,
    unique_name: String,
    received: VecDeque<Message>,
}

impl BusTransport {
    /// Connects to the session bus.
    pub async fn session() -> Result<Self> {
        let connection = Connection::session().await.map_err(Error::Connect)?;
        Self::new(connection).await
    }

    pub async fn new(connection: Connection) -> Result<Self> {
        let unique_name = connection
            .unique_name()
            .ok_or(Error::NoUniqueName)?
            .to_string();
        let dbus = DBusProxy::new(&connection).await.map_err(Error::Connect)?;
        let stream = MessageStream::from(&connection);
        log::debug!("connected to session bus as {unique_name}");
        Ok(Self {
            connection,
            dbus,
            stream,
            unique_name,
            received: VecDeque::new(),
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

impl Transport for BusTransport {
    fn unique_name(&self) -> &str {
        &self.unique_name
    }

    async fn add_match(&mut self, rule: &str) -> Result<()> {
        let rule = MatchRule::try_from(rule).map_err(Error::Subscribe)?;
        self.dbus
            .add_match_rule(rule)
            .await
            .map_err(|err| Error::Subscribe(err.into()))
    }

    async fn remove_match(&mut self, rule: &str) -> Result<()> {
        let rule = MatchRule::try_from(rule).map_err(Error::Subscribe)?;
        self.dbus
            .remove_match_rule(rule)
            .await
            .map_err(|err| Error::Subscribe(err.into()))
    }

    async fn open_file(&mut self, request: &OpenFileRequest) -> Result<OwnedObjectPath> {
        let reply = self
            .connection
            .call_method(
                Some(DBUS_NAME),
                DBUS_PATH,
                Some(FILE_CHOOSER_INTERFACE),
                OPEN_FILE_METHOD,
                &request.body(),
            )
            .await
            .map_err(Error::Call)?;
        response::read_request_handle(&reply)
    }

    fn pop_message(&mut self) -> Option<Message> {
        if let Some(message) = self.received.pop_front() {
            return Some(message);
        }
        loop {
            match self.stream.next().now_or_never()? {
                Some(Ok(message)) => return Some(message),
                Some(Err(err)) => log::debug!("skipping unreadable message: {err}"),
                None => return None,
            }
        }
    }

    async fn read_write(&mut self) -> bool {
        match self.stream.next().await {
            Some(Ok(message)) => {
                self.received.push_back(message);
                true
            }
            Some(Err(err)) => {
                log::debug!("skipping unreadable message: {err}");
                true
            }
            None => false,
        }
    }
}
