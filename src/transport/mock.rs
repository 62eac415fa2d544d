// SPDX-License-Identifier: GPL-3.0-only

//! Scripted in-memory transport for exercising the file chooser without a bus.

use std::collections::{HashMap, VecDeque};

use zbus::{
    Message,
    zvariant::{OwnedObjectPath, OwnedValue, Value},
};

use super::Transport;
use crate::{
    REQUEST_INTERFACE, RESPONSE_SIGNAL, Result, error::Error, handle::RequestHandle,
    request::OpenFileRequest,
};

/// Where a scripted signal is emitted.
#[derive(Clone, Debug)]
pub(crate) enum Target {
    /// The path the client predicted from its handle token
    Guessed,
    /// The path the portal returned from `OpenFile`
    Returned,
}

/// Traffic the mock bus delivers after `OpenFile` returns.
pub(crate) enum Incoming {
    Response {
        target: Target,
        status: u32,
        results: HashMap<String, OwnedValue>,
    },
    /// A fully built message, delivered unfiltered.
    Raw(Message),
}

impl Incoming {
    pub(crate) fn response(target: Target, status: u32, uris: &[&str]) -> Self {
        let mut results = HashMap::new();
        if !uris.is_empty() {
            results.insert(
                "uris".to_string(),
                OwnedValue::try_from(Value::from(uris.to_vec())).unwrap(),
            );
        }
        Self::Response {
            target,
            status,
            results,
        }
    }

    pub(crate) fn unrelated() -> Self {
        let message = Message::signal(
            "/org/freedesktop/portal/desktop",
            "org.freedesktop.portal.Settings",
            "SettingChanged",
        )
        .unwrap()
        .build(&("org.freedesktop.appearance", "color-scheme"))
        .unwrap();
        Self::Raw(message)
    }
}

pub(crate) enum Reply {
    /// Return the path the client predicted
    Guessed,
    /// Return a different path
    Path(&'static str),
    Fail,
}

pub(crate) struct MockTransport {
    unique_name: String,
    reply: Reply,
    pub fail_add_match: bool,
    pub fail_remove_match: bool,
    /// Rules in the order `add_match` was called
    pub added: Vec<String>,
    /// Rules in the order `remove_match` was called
    pub removed: Vec<String>,
    pub requests: Vec<OpenFileRequest>,
    active: Vec<String>,
    guessed: Option<OwnedObjectPath>,
    returned: Option<OwnedObjectPath>,
    queued: VecDeque<Incoming>,
    /// Batches released one per `read_write`
    rounds: VecDeque<Vec<Incoming>>,
    pub read_writes: usize,
}

impl MockTransport {
    pub(crate) fn new(reply: Reply) -> Self {
        Self {
            unique_name: ":1.42".to_string(),
            reply,
            fail_add_match: false,
            fail_remove_match: false,
            added: Vec::new(),
            removed: Vec::new(),
            requests: Vec::new(),
            active: Vec::new(),
            guessed: None,
            returned: None,
            queued: VecDeque::new(),
            rounds: VecDeque::new(),
            read_writes: 0,
        }
    }

    /// Delivered as soon as `OpenFile` has returned.
    pub(crate) fn queue(mut self, incoming: Incoming) -> Self {
        self.queued.push_back(incoming);
        self
    }

    /// Delivered only after the client waits for more traffic.
    pub(crate) fn round(mut self, incoming: Vec<Incoming>) -> Self {
        self.rounds.push_back(incoming);
        self
    }

    pub(crate) fn returned_path(&self) -> Option<&str> {
        self.returned.as_ref().map(|path| path.as_str())
    }

    pub(crate) fn guessed_path(&self) -> Option<&str> {
        self.guessed.as_ref().map(|path| path.as_str())
    }

    /// Whether the bus would route a signal at `path` to us.
    fn subscribed_to(&self, path: &str) -> bool {
        let needle = format!("path='{path}'");
        self.active.iter().any(|rule| rule.contains(&needle))
    }
}

impl Transport for MockTransport {
    fn unique_name(&self) -> &str {
        &self.unique_name
    }

    async fn add_match(&mut self, rule: &str) -> Result<()> {
        if self.fail_add_match {
            return Err(Error::Subscribe(zbus::Error::Failure(
                "org.freedesktop.DBus.Error.LimitsExceeded".to_string(),
            )));
        }
        self.added.push(rule.to_string());
        self.active.push(rule.to_string());
        Ok(())
    }

    async fn remove_match(&mut self, rule: &str) -> Result<()> {
        self.removed.push(rule.to_string());
        self.active.retain(|active| active != rule);
        if self.fail_remove_match {
            return Err(Error::Subscribe(zbus::Error::Failure(
                "org.freedesktop.DBus.Error.MatchRuleNotFound".to_string(),
            )));
        }
        Ok(())
    }

    async fn open_file(&mut self, request: &OpenFileRequest) -> Result<OwnedObjectPath> {
        self.requests.push(request.clone());
        let handle = RequestHandle::with_token(
            &self.unique_name,
            request.options.handle_token().to_string(),
        )?;
        let guessed = OwnedObjectPath::from(handle.path().clone());
        let returned = match self.reply {
            Reply::Guessed => guessed.clone(),
            Reply::Path(path) => OwnedObjectPath::try_from(path).unwrap(),
            Reply::Fail => {
                return Err(Error::Call(zbus::Error::Failure(
                    "org.freedesktop.DBus.Error.ServiceUnknown".to_string(),
                )));
            }
        };
        self.guessed = Some(guessed);
        self.returned = Some(returned.clone());
        Ok(returned)
    }

    fn pop_message(&mut self) -> Option<Message> {
        while let Some(incoming) = self.queued.pop_front() {
            let (target, status, results) = match incoming {
                Incoming::Raw(message) => return Some(message),
                Incoming::Response {
                    target,
                    status,
                    results,
                } => (target, status, results),
            };
            let path = match target {
                Target::Guessed => self.guessed.clone(),
                Target::Returned => self.returned.clone(),
            }
            .expect("signals are only delivered after OpenFile");
            if !self.subscribed_to(path.as_str()) {
                continue;
            }
            let message = Message::signal(path.as_str(), REQUEST_INTERFACE, RESPONSE_SIGNAL)
                .unwrap()
                .build(&(status, results))
                .unwrap();
            return Some(message);
        }
        None
    }

    async fn read_write(&mut self) -> bool {
        self.read_writes += 1;
        match self.rounds.pop_front() {
            Some(round) => {
                self.queued.extend(round);
                true
            }
            None => false,
        }
    }
}
