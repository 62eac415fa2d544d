// SPDX-License-Identifier: GPL-3.0-only

use zbus::zvariant;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to connect to the D-Bus session bus: {0}")]
    Connect(#[source] zbus::Error),
    #[error("Unable to get the unique name of our D-Bus connection.")]
    NoUniqueName,
    #[error("failed to subscribe to the portal response: {0}")]
    Subscribe(#[source] zbus::Error),
    #[error("D-Bus OpenFile call failed: {0}")]
    Call(#[source] zbus::Error),
    /// The portal sent something that does not have the expected wire shape
    #[error("{0}")]
    MalformedReply(&'static str),
    #[error("D-Bus file dialog interaction was ended abruptly (response code {0}).")]
    Ended(u32),
    #[error("D-Bus freedesktop portal replied without giving us a file.")]
    NoFile,
    #[error("D-Bus freedesktop portal did not give us a reply.")]
    NoReply,
    #[error("D-Bus freedesktop portal returned a URI that is not a file URI: {0}")]
    NotFileUri(String),
    #[error("D-Bus freedesktop portal returned an unusable file URI: {0}")]
    InvalidPath(String),
    #[error("filter {name:?} has an empty extension in {spec:?}")]
    InvalidFilter { name: String, spec: String },
    #[error("failed to build the request handle path: {0}")]
    InvalidHandle(#[source] zvariant::Error),
}
