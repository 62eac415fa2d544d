// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use crate::{
    Result,
    config::Config,
    error::Error,
    handle::RequestHandle,
    request::{FileFilter, OpenFileRequest},
    response::{self, PortalResponse},
    subscription::Subscription,
    transport::{BusTransport, Transport},
    uri,
};

/// What the user did with the dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogResult {
    Open(PathBuf),
    Cancel,
}

/// A file chooser session on one bus connection.
///
/// Holds the message of the last failure until [`FileChooser::clear_error`].
/// `open_file` takes `&mut self`, so only one request can be in flight per
/// session; while waiting it discards every unrelated message it receives.
pub struct FileChooser<T = BusTransport> {
    transport: T,
    config: Config,
    last_error: Option<String>,
}

impl FileChooser<BusTransport> {
    /// Connects to the session bus.
    pub async fn connect(config: Config) -> Result<Self> {
        Ok(Self::new(BusTransport::session().await?, config))
    }
}

impl<T: Transport> FileChooser<T> {
    pub fn new(transport: T, config: Config) -> Self {
        Self {
            transport,
            config,
            last_error: None,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Message of the last failed operation.
    pub fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Asks the portal to let the user pick one file.
    ///
    /// Waits as long as the dialog stays open. Cancelling is not an error.
    pub async fn open_file(&mut self, filters: &[FileFilter]) -> Result<DialogResult> {
        let result = self.open_file_inner(filters).await;
        if let Err(err) = &result {
            log::warn!("open file request failed: {err}");
            self.last_error = Some(err.to_string());
        }
        result
    }

    async fn open_file_inner(&mut self, filters: &[FileFilter]) -> Result<DialogResult> {
        let handle = RequestHandle::generate(self.transport.unique_name())?;
        let mut subscription = Subscription::new();
        let result = self.request(&handle, &mut subscription, filters).await;
        subscription.unsubscribe(&mut self.transport).await;
        result
    }

    async fn request(
        &mut self,
        handle: &RequestHandle,
        subscription: &mut Subscription,
        filters: &[FileFilter],
    ) -> Result<DialogResult> {
        subscription
            .subscribe(&mut self.transport, handle.path())
            .await?;

        let request =
            OpenFileRequest::new(&self.config.open_file.title, handle.token()).filters(filters)?;
        log::debug!("OpenFile {request:?}");
        let returned = self.transport.open_file(&request).await?;
        if returned.as_str() != handle.path().as_str() {
            log::debug!(
                "portal moved request from {} to {}",
                handle.path(),
                returned
            );
            subscription.subscribe(&mut self.transport, &returned).await?;
        }

        match self.wait_for_response().await? {
            PortalResponse::Success(uri) => {
                log::debug!("portal selected {uri}");
                uri::file_uri_to_path(&uri, self.config.open_file.decode_uris)
                    .map(DialogResult::Open)
            }
            PortalResponse::Cancelled => Ok(DialogResult::Cancel),
            PortalResponse::Other(code) => Err(Error::Ended(code)),
        }
    }

    /// Takes the first `Response` signal that arrives.
    ///
    /// The match rule already limits delivery to our request handle.
    async fn wait_for_response(&mut self) -> Result<PortalResponse<String>> {
        loop {
            while let Some(message) = self.transport.pop_message() {
                if response::is_response_signal(&message) {
                    return response::read_response(&message);
                }
                log::trace!("discarding {message:?}");
            }
            if !self.transport.read_write().await {
                return Err(Error::NoReply);
            }
        }
    }
}
