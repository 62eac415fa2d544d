// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use crate::{Result, error::Error};

static FILE_URI_PREFIX: &str = "file://";

/// Converts a `file://` URI returned by the portal into a local path.
///
/// By default the scheme is stripped and the rest is used verbatim, escapes
/// included. With `decode` the URI is parsed and percent-escapes are decoded;
/// URIs naming a remote host are then rejected.
pub fn file_uri_to_path(uri: &str, decode: bool) -> Result<PathBuf> {
    let Some(path) = uri.strip_prefix(FILE_URI_PREFIX) else {
        return Err(Error::NotFileUri(uri.to_owned()));
    };
    if decode {
        let url = url::Url::parse(uri).map_err(|err| {
            log::debug!("failed to parse {uri:?}: {err}");
            Error::InvalidPath(uri.to_owned())
        })?;
        let path = url
            .to_file_path()
            .map_err(|()| Error::InvalidPath(uri.to_owned()))?;
        return checked(path, uri);
    }
    checked(PathBuf::from(path), uri)
}

// The result has to stay usable as a C string.
fn checked(path: PathBuf, uri: &str) -> Result<PathBuf> {
    if path.as_os_str().as_encoded_bytes().contains(&0) {
        return Err(Error::InvalidPath(uri.to_owned()));
    }
    Ok(path)
}
